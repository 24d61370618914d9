use super::types::Message;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared transcript of the conversation.
///
/// Cloned between the UI thread (which renders it) and the intake worker
/// (which appends staged responses); cheap to clone, all clones share the
/// same entries.
#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: Arc<RwLock<Vec<Message>>>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self {
            messages: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn push(&self, message: Message) {
        self.messages.write().push(message);
    }

    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.read().clone()
    }

    pub fn clear(&self) {
        self.messages.write().clear();
    }

    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::types::Message;

    #[test]
    fn test_clones_share_entries() {
        let log = MessageLog::new();
        let other = log.clone();

        log.push(Message::user("hi"));
        assert_eq!(other.len(), 1);
        assert_eq!(other.snapshot()[0].content.text(), "hi");

        other.clear();
        assert!(log.is_empty());
    }
}
