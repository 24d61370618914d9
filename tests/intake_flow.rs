//! Integration tests for the intake flow
//!
//! These exercise the public seams without a live backend: the submission
//! guard, the contract preconditions, and language persistence.

use pactum::api::{ExtractedFields, InputSource};
use pactum::config::BackendConfig;
use pactum::intake::{IntakePipeline, PLEASE_WAIT, SEARCHING_NOTICE, SEARCH_TOO_SHORT};
use pactum::messages::MessageLog;
use pactum::session::Session;
use pactum::storage::Store;
use pactum::ui::AppState;
use pactum::PactumError;

fn pipeline_and_log() -> (IntakePipeline, MessageLog) {
    let log = MessageLog::new();
    let pipeline = IntakePipeline::new(BackendConfig::default(), log.clone());
    (pipeline, log)
}

#[test]
fn rapid_submissions_keep_one_exchange_in_flight() {
    let (pipeline, log) = pipeline_and_log();
    let handle = pipeline.handle();

    // No worker consumes the queue, so the first submission stays in flight
    assert!(handle.submit_turn("Draft a lease agreement", InputSource::Search));
    assert!(handle.is_in_flight());

    for _ in 0..5 {
        assert!(!handle.submit_turn("Draft a will", InputSource::Search));
    }

    let messages = log.snapshot();
    // One optimistic entry, its working notice, then one warning per
    // rejected attempt
    assert_eq!(messages.len(), 7);
    assert_eq!(messages[0].content.text(), "Draft a lease agreement");
    assert_eq!(messages[1].content.text(), SEARCHING_NOTICE);
    for warning in &messages[2..] {
        assert_eq!(warning.content.text(), PLEASE_WAIT);
        assert!(warning.metadata.is_error);
    }
}

#[test]
fn short_search_input_is_rejected_locally() {
    let (pipeline, log) = pipeline_and_log();
    let handle = pipeline.handle();

    assert!(!handle.submit_turn("ab", InputSource::Search));
    assert!(!handle.is_in_flight());

    let messages = log.snapshot();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content.text(), SEARCH_TOO_SHORT);
}

#[test]
fn update_without_contract_short_circuits() {
    // User types "Draft a lease" as chat input, fields come back, but no
    // sample was ever generated: the update step must refuse before any
    // network call.
    let session = Session::new();

    let mut fields = ExtractedFields::new();
    fields.insert("party_a".to_string(), serde_json::json!("Alice"));

    let err = session.update_request(fields).unwrap_err();
    assert!(matches!(err, PactumError::PreconditionError(_)));
    assert!(err.user_message().contains("no contract details"));
}

#[test]
fn update_body_carries_state_exactly() {
    let mut session = Session::new();
    session.set_contract("Lease", "This lease agreement is made...");

    let mut fields = ExtractedFields::new();
    fields.insert("party_a".to_string(), serde_json::json!("Alice"));

    let request = session.update_request(fields.clone()).unwrap();
    assert_eq!(request.current_contract, "This lease agreement is made...");
    assert_eq!(request.contract_type, "Lease");
    assert_eq!(request.extracted_fields, fields);

    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["extracted_fields"]["party_a"], "Alice");
}

#[test]
fn detected_language_survives_a_restart() {
    let root = std::env::temp_dir().join(format!("pactum-lang-{}", uuid::Uuid::new_v4()));
    let store = Store::open(&root).unwrap();

    // A language tag from any endpoint overwrites the stored preference
    let mut session = Session::new();
    assert!(session.note_language(Some("ko")));
    store.save_language(session.language()).unwrap();

    // Next run restores it as the default
    let prefs = Store::open(&root).unwrap().load_prefs();
    let restored = Session::new().with_language(prefs.language.unwrap_or_default());
    assert_eq!(restored.language(), "ko");

    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn download_is_gated_on_contract_state() {
    let (pipeline, log) = pipeline_and_log();
    let mut state = AppState::new(pipeline.handle(), log, false);

    // Nothing generated yet: refused without queuing a request
    assert!(!state.can_download());
    state.request_download();
    assert!(!state.download_in_progress);

    // A contract arms the affordance; one click disables it until resolved
    state.contract_type = Some("Lease".to_string());
    state.request_download();
    assert!(state.download_in_progress);
    assert!(!state.can_download());
}
