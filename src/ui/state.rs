//! Application state management
//!
//! Central UI-side state: the shared transcript, the text input, the
//! recorder, and the handle into the intake worker. All backend effects go
//! through the handle; events come back once per frame via `poll_events`.

use crate::api::InputSource;
use crate::intake::{IntakeEvent, IntakeHandle};
use crate::messages::{Message, MessageLog};
use crate::transcribe::{Recorder, RecordingState};
use tracing::debug;

/// Central application state
pub struct AppState {
    /// Shared transcript (also written by the intake worker)
    pub log: MessageLog,

    /// Current text input
    pub input_text: String,

    /// Voice recorder state machine
    pub recorder: Recorder,

    /// Handle into the intake worker
    pub intake: IntakeHandle,

    /// Type of the current contract, once one exists. Arms the
    /// download affordance.
    pub contract_type: Option<String>,

    /// A document render request is outstanding; the download button is
    /// disabled until it resolves
    pub download_in_progress: bool,

    /// Whether microphone capture is available in this build/config
    pub audio_enabled: bool,
}

impl AppState {
    pub fn new(intake: IntakeHandle, log: MessageLog, audio_enabled: bool) -> Self {
        Self {
            log,
            input_text: String::new(),
            recorder: Recorder::new(),
            intake,
            contract_type: None,
            download_in_progress: false,
            audio_enabled,
        }
    }

    /// Whether the download action is currently available
    pub fn can_download(&self) -> bool {
        self.contract_type.is_some() && !self.download_in_progress
    }

    /// Send the typed chat input down the field-extraction path
    pub fn send_message(&mut self) {
        let text = self.input_text.trim().to_string();
        if text.is_empty() {
            return;
        }
        if self.intake.extract_fields(&text) {
            self.input_text.clear();
        }
    }

    /// Submit a contract-type shortcut
    pub fn select_shortcut(&mut self, contract_type: &str) {
        self.intake.submit_turn(contract_type, InputSource::Button);
    }

    /// Submit the launch query, routed exactly like the original
    /// query-string navigation
    pub fn submit_launch_query(&mut self, query: &str, source: InputSource) {
        self.intake.submit_turn(query, source);
    }

    /// Record button pressed: start, or stop-and-upload
    pub fn toggle_recording(&mut self) {
        match self.recorder.state() {
            RecordingState::Idle => {
                if let Err(e) = self.recorder.start() {
                    // One remediation message per failed attempt; the button
                    // itself is the retry affordance
                    self.log.push(Message::failure(e.user_message()));
                }
            }
            RecordingState::Recording => {
                if let Some(clip) = self.recorder.stop() {
                    if !self.intake.transcribe(clip) {
                        self.recorder.finish_upload();
                    }
                }
            }
            RecordingState::Uploading => {}
        }
    }

    /// Request a document render of the current contract
    pub fn request_download(&mut self) {
        if !self.can_download() {
            return;
        }
        if self.intake.download() {
            self.download_in_progress = true;
        }
    }

    /// Drain recorder chunks and worker events. Called once per frame.
    pub fn poll_events(&mut self) {
        self.recorder.drain();

        while let Some(event) = self.intake.try_recv_event() {
            match event {
                IntakeEvent::ContractReady { contract_type } => {
                    debug!("Contract ready: {}", contract_type);
                    self.contract_type = Some(contract_type);
                }
                IntakeEvent::DownloadFinished { path } => {
                    debug!("Download finished: {:?}", path);
                    self.download_in_progress = false;
                }
                IntakeEvent::DownloadFailed => {
                    self.download_in_progress = false;
                }
                IntakeEvent::TranscriptionFinished => {
                    self.recorder.finish_upload();
                }
                IntakeEvent::Shutdown => {
                    debug!("Intake worker shut down");
                }
            }
        }
    }

    /// Clear the transcript
    pub fn clear_messages(&mut self) {
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackendConfig;
    use crate::intake::IntakePipeline;

    fn test_state() -> (IntakePipeline, AppState) {
        let log = MessageLog::new();
        let pipeline = IntakePipeline::new(BackendConfig::default(), log.clone());
        let state = AppState::new(pipeline.handle(), log, false);
        (pipeline, state)
    }

    #[test]
    fn test_download_needs_contract() {
        let (_pipeline, mut state) = test_state();
        assert!(!state.can_download());

        // Refused without a contract; nothing is queued
        state.request_download();
        assert!(!state.download_in_progress);
    }

    #[test]
    fn test_download_disabled_while_in_progress() {
        let (_pipeline, mut state) = test_state();
        state.contract_type = Some("Lease".to_string());
        assert!(state.can_download());

        state.request_download();
        assert!(state.download_in_progress);
        assert!(!state.can_download());
    }

    #[test]
    fn test_send_message_clears_input() {
        let (_pipeline, mut state) = test_state();
        state.input_text = "The landlord is Alice".to_string();
        state.send_message();
        assert!(state.input_text.is_empty());
        assert_eq!(state.log.len(), 2);
    }

    // Without the audio-io feature, Recorder::start always fails, which
    // makes the remediation path deterministic.
    #[cfg(not(feature = "audio-io"))]
    #[test]
    fn test_failed_recording_start_logs_one_message_per_attempt() {
        let (_pipeline, mut state) = test_state();

        state.toggle_recording();
        assert_eq!(state.recorder.state(), RecordingState::Idle);
        let messages = state.log.snapshot();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].metadata.is_error);

        // Each retry produces exactly one more remediation entry
        state.toggle_recording();
        assert_eq!(state.recorder.state(), RecordingState::Idle);
        assert_eq!(state.log.len(), 2);
    }

    #[test]
    fn test_empty_input_not_sent() {
        let (_pipeline, mut state) = test_state();
        state.input_text = "   ".to_string();
        state.send_message();
        assert!(state.log.is_empty());
    }
}
