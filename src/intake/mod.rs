//! Intake orchestration
//!
//! Everything a user submission triggers: validation, the optimistic
//! transcript entry, the single backend exchange, and the ordered reveal
//! of its results.

pub mod orchestrator;

pub use orchestrator::{IntakeCommand, IntakeEvent, IntakeHandle, IntakePipeline};

/// Shortest launch/search query forwarded to the backend
pub const MIN_SEARCH_LEN: usize = 3;

/// Fixed validation message for short search input
pub const SEARCH_TOO_SHORT: &str = "Please enter at least 3 characters to search.";

/// Warning shown when a submission overlaps an exchange already in flight
pub const PLEASE_WAIT: &str = "Please wait, your previous request is still being processed.";

/// Working notice staged while a search or voice turn is outstanding
pub const SEARCHING_NOTICE: &str = "Looking for relevant contracts…";

/// Working notice staged while a shortcut-button turn is outstanding
pub const ANALYZING_NOTICE: &str =
    "Analyzing the information required for this contract…";

/// Reject search queries that are too short to mean anything.
///
/// Rejected input never reaches the backend.
pub fn validate_search_query(query: &str) -> Result<(), &'static str> {
    if query.trim().chars().count() < MIN_SEARCH_LEN {
        Err(SEARCH_TOO_SHORT)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_queries_rejected() {
        assert_eq!(validate_search_query(""), Err(SEARCH_TOO_SHORT));
        assert_eq!(validate_search_query("ab"), Err(SEARCH_TOO_SHORT));
        assert_eq!(validate_search_query("  a  "), Err(SEARCH_TOO_SHORT));
        assert!(validate_search_query("abc").is_ok());
        assert!(validate_search_query("Draft a lease").is_ok());
    }

    #[test]
    fn test_length_counts_chars_not_bytes() {
        // Three Hangul characters are nine bytes but a valid query
        assert!(validate_search_query("계약서").is_ok());
    }
}
