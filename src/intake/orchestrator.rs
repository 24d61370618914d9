//! Intake worker pipeline
//!
//! A single worker thread owns the session state, the backend client, and a
//! tokio runtime; the UI talks to it over crossbeam channels. Serializing
//! every mutation through this one thread preserves the last-writer-wins
//! semantics the contract state relies on.

use crate::api::{BackendClient, ExtractedFields, InputSource, TurnRequest, TurnResponse};
use crate::audio::clip;
use crate::config::BackendConfig;
use crate::download;
use crate::intake::{validate_search_query, ANALYZING_NOTICE, PLEASE_WAIT, SEARCHING_NOTICE};
use crate::messages::{Message, MessageLog};
use crate::session::Session;
use crate::storage::Store;
use crate::transcribe::RecordedClip;
use crate::{PactumError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, info, warn};

/// Commands sent from the UI to the intake worker
#[derive(Debug, Clone)]
pub enum IntakeCommand {
    /// One conversational turn (shortcut button, launch query, or a
    /// transcribed voice message resubmitted internally)
    Turn { message: String, source: InputSource },

    /// Extract contract fields from free-form chat input
    Extract { text: String },

    /// Transcribe a recorded clip, then run a voice-sourced turn
    Transcribe { clip: RecordedClip },

    /// Render and save the current contract
    Download,

    /// Shut the worker down
    Shutdown,
}

/// Events emitted back to the UI
#[derive(Debug, Clone)]
pub enum IntakeEvent {
    /// A contract sample or update landed; the download affordance is armed
    ContractReady { contract_type: String },

    /// A rendered document was saved
    DownloadFinished { path: PathBuf },

    /// Document rendering or saving failed; the button may be retried
    DownloadFailed,

    /// The transcription request resolved (success or failure); the
    /// recorder returns to idle
    TranscriptionFinished,

    /// Worker has shut down
    Shutdown,
}

/// The ordered reveal steps derived from one turn response.
///
/// This replaces the wall-clock staging of the original client: the
/// sequence is fixed and driven entirely by response arrival.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Reveal {
    Language(String),
    BackendError(String),
    Suggestions(Vec<String>),
    RequiredFields(Vec<String>),
    Contract { contract_type: String, text: String },
}

/// Plan the reveal sequence for a turn response.
///
/// `fallback_type` names the contract type when the response omits one
/// (button shortcuts carry the type in the message itself). A backend error
/// ends the sequence; required fields are suppressed on the voice path.
pub(crate) fn plan_reveals(
    turn: &TurnResponse,
    source: InputSource,
    fallback_type: &str,
) -> Vec<Reveal> {
    let mut reveals = Vec::new();

    if let Some(lang) = turn.language.as_deref() {
        if !lang.is_empty() {
            reveals.push(Reveal::Language(lang.to_string()));
        }
    }

    if let Some(error) = turn.error.as_deref() {
        if !error.is_empty() {
            reveals.push(Reveal::BackendError(error.to_string()));
            return reveals;
        }
    }

    if let Some(suggestions) = &turn.suggested_contracts {
        if !suggestions.is_empty() {
            reveals.push(Reveal::Suggestions(suggestions.clone()));
        }
    }

    if source != InputSource::Voice {
        if let Some(fields) = &turn.required_fields {
            if !fields.is_empty() {
                reveals.push(Reveal::RequiredFields(fields.clone()));
            }
        }
    }

    if let Some(sample) = turn.contract_sample.as_deref() {
        if !sample.is_empty() {
            let contract_type = turn
                .contract_type
                .as_deref()
                .filter(|t| !t.is_empty())
                .unwrap_or(fallback_type)
                .to_string();
            reveals.push(Reveal::Contract {
                contract_type,
                text: sample.to_string(),
            });
        }
    }

    reveals
}

/// The staged "working" notice shown while a turn is outstanding
fn working_notice(source: InputSource) -> &'static str {
    match source {
        InputSource::Button => ANALYZING_NOTICE,
        _ => SEARCHING_NOTICE,
    }
}

/// Handle the UI keeps for driving the intake worker
#[derive(Clone)]
pub struct IntakeHandle {
    command_tx: Sender<IntakeCommand>,
    event_rx: Receiver<IntakeEvent>,
    in_flight: Arc<AtomicBool>,
    log: MessageLog,
}

impl IntakeHandle {
    /// Submit one conversational turn.
    ///
    /// The in-flight flag is taken here, before the command is queued, so a
    /// rapid second submission is rejected rather than deferred. Returns
    /// whether the turn was accepted.
    pub fn submit_turn(&self, message: &str, source: InputSource) -> bool {
        let message = message.trim();
        if message.is_empty() {
            return false;
        }

        if source == InputSource::Search {
            if let Err(notice) = validate_search_query(message) {
                self.log.push(Message::failure(notice));
                return false;
            }
        }

        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.log.push(Message::failure(PLEASE_WAIT));
            return false;
        }

        // Optimistic transcript entry before any network round trip
        let entry = match source {
            InputSource::Button => {
                Message::user(format!("Selected contract type: {}", message)).with_source(source)
            }
            _ => Message::user(message).with_source(source),
        };
        self.log.push(entry);
        self.log.push(Message::assistant(working_notice(source)));

        if self
            .command_tx
            .send(IntakeCommand::Turn {
                message: message.to_string(),
                source,
            })
            .is_err()
        {
            self.in_flight.store(false, Ordering::SeqCst);
            self.log
                .push(Message::failure(PactumError::ChannelError("intake worker gone".into()).user_message()));
            return false;
        }
        true
    }

    /// Submit free-form chat input for field extraction.
    ///
    /// This is the independent second path: it is serialized by the worker
    /// but not guarded by the conversational in-flight flag.
    pub fn extract_fields(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.log.push(Message::user(text));
        self.log
            .push(Message::assistant("Extracting contract details…"));

        self.command_tx
            .send(IntakeCommand::Extract {
                text: text.to_string(),
            })
            .is_ok()
    }

    /// Hand a recorded clip to the worker for transcription
    pub fn transcribe(&self, clip: RecordedClip) -> bool {
        self.command_tx
            .send(IntakeCommand::Transcribe { clip })
            .is_ok()
    }

    /// Request a document render of the current contract
    pub fn download(&self) -> bool {
        self.command_tx.send(IntakeCommand::Download).is_ok()
    }

    pub fn shutdown(&self) {
        let _ = self.command_tx.send(IntakeCommand::Shutdown);
    }

    /// Whether a conversational exchange is currently outstanding
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn try_recv_event(&self) -> Option<IntakeEvent> {
        self.event_rx.try_recv().ok()
    }
}

/// Channel-based intake pipeline, one worker thread
pub struct IntakePipeline {
    config: BackendConfig,
    command_tx: Sender<IntakeCommand>,
    command_rx: Receiver<IntakeCommand>,
    event_tx: Sender<IntakeEvent>,
    event_rx: Receiver<IntakeEvent>,
    in_flight: Arc<AtomicBool>,
    log: MessageLog,
}

impl IntakePipeline {
    pub fn new(config: BackendConfig, log: MessageLog) -> Self {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        Self {
            config,
            command_tx,
            command_rx,
            event_tx,
            event_rx,
            in_flight: Arc::new(AtomicBool::new(false)),
            log,
        }
    }

    pub fn handle(&self) -> IntakeHandle {
        IntakeHandle {
            command_tx: self.command_tx.clone(),
            event_rx: self.event_rx.clone(),
            in_flight: Arc::clone(&self.in_flight),
            log: self.log.clone(),
        }
    }

    /// Spawn the worker thread, consuming the pipeline.
    ///
    /// The worker owns the session and the store; nothing else mutates them.
    pub fn start_worker(self, mut session: Session, store: Store) -> Result<()> {
        let client = BackendClient::new(&self.config)?;
        let command_rx = self.command_rx;
        let event_tx = self.event_tx;
        let in_flight = self.in_flight;
        let log = self.log;

        std::thread::Builder::new()
            .name("intake-worker".to_string())
            .spawn(move || {
                let runtime = match Runtime::new() {
                    Ok(rt) => rt,
                    Err(e) => {
                        warn!("Failed to create tokio runtime: {}", e);
                        log.push(Message::failure(
                            PactumError::ChannelError(e.to_string()).user_message(),
                        ));
                        let _ = event_tx.send(IntakeEvent::Shutdown);
                        return;
                    }
                };

                let mut worker = Worker {
                    runtime,
                    client,
                    session: &mut session,
                    store,
                    log,
                    event_tx,
                    in_flight,
                };

                info!("Intake worker started");
                loop {
                    match command_rx.recv() {
                        Ok(IntakeCommand::Turn { message, source }) => {
                            worker.run_turn(&message, source);
                        }
                        Ok(IntakeCommand::Extract { text }) => {
                            worker.run_extraction(&text);
                        }
                        Ok(IntakeCommand::Transcribe { clip }) => {
                            worker.run_transcription(clip);
                        }
                        Ok(IntakeCommand::Download) => {
                            worker.run_download();
                        }
                        Ok(IntakeCommand::Shutdown) | Err(_) => {
                            info!("Intake worker stopping");
                            let _ = worker.event_tx.send(IntakeEvent::Shutdown);
                            break;
                        }
                    }
                }
            })
            .map_err(|e| PactumError::ChannelError(format!("Failed to spawn worker: {}", e)))?;

        Ok(())
    }
}

/// Worker-side state, only ever touched on the intake thread
struct Worker<'a> {
    runtime: Runtime,
    client: BackendClient,
    session: &'a mut Session,
    store: Store,
    log: MessageLog,
    event_tx: Sender<IntakeEvent>,
    in_flight: Arc<AtomicBool>,
}

impl Worker<'_> {
    /// One conversational exchange plus its reveal sequence.
    ///
    /// The in-flight flag is cleared on every exit path.
    fn run_turn(&mut self, message: &str, source: InputSource) {
        debug!("Turn ({}): {}", source, message);

        // Search input gets a language detection pass first, like the
        // original search box; a failure here never blocks the turn.
        if source == InputSource::Search {
            if let Ok(response) = self.runtime.block_on(self.client.detect_language(message)) {
                if let Some(lang) = response.language.as_deref() {
                    self.note_language(lang);
                }
            }
        }

        let request = TurnRequest {
            message: message.to_string(),
            source,
        };

        match self.runtime.block_on(self.client.send_turn(&request)) {
            Ok(turn) => {
                let fallback_type = if source == InputSource::Button { message } else { "" };
                let reveals = plan_reveals(&turn, source, fallback_type);
                self.apply_reveals(reveals);
            }
            Err(e) => {
                warn!("Turn failed: {}", e);
                self.log.push(Message::failure(e.user_message()));
            }
        }

        self.in_flight.store(false, Ordering::SeqCst);
    }

    fn apply_reveals(&mut self, reveals: Vec<Reveal>) {
        for reveal in reveals {
            match reveal {
                Reveal::Language(lang) => self.note_language(&lang),
                Reveal::BackendError(error) => {
                    self.log.push(Message::failure(error));
                }
                Reveal::Suggestions(list) => {
                    self.log.push(Message::assistant(format!(
                        "These contract types may fit your request:\n• {}",
                        list.join("\n• ")
                    )));
                }
                Reveal::RequiredFields(fields) => {
                    self.log.push(Message::assistant(format!(
                        "The contract needs the following details:\n• {}",
                        fields.join("\n• ")
                    )));
                }
                Reveal::Contract {
                    contract_type,
                    text,
                } => {
                    self.session.set_contract(&contract_type, &text);
                    self.log.push(Message::contract(&contract_type, text));
                    let _ = self
                        .event_tx
                        .send(IntakeEvent::ContractReady { contract_type });
                }
            }
        }
    }

    /// Field extraction followed by the contract update step
    fn run_extraction(&mut self, text: &str) {
        match self.runtime.block_on(self.client.extract_fields(text)) {
            Ok(response) => {
                if let Some(error) = response.error.filter(|e| !e.is_empty()) {
                    self.log.push(Message::failure(error));
                    return;
                }
                match response.extracted_fields {
                    Some(fields) if !fields.is_empty() => {
                        // Audit trail only; a failed write never blocks the update
                        if let Err(e) = self.store.record_extraction(&fields) {
                            warn!("Failed to record extraction: {}", e);
                        }
                        self.session.remember_fields(fields.clone());
                        self.run_update(fields);
                    }
                    _ => {
                        self.log.push(Message::failure(
                            "No contract details could be extracted from that. \
                             Please try rephrasing.",
                        ));
                    }
                }
            }
            Err(e) => {
                warn!("Extraction failed: {}", e);
                self.log.push(Message::failure(e.user_message()));
            }
        }
    }

    /// Apply extracted fields to the current contract
    fn run_update(&mut self, fields: ExtractedFields) {
        // Fails fast before any network call when no contract exists
        let request = match self.session.update_request(fields) {
            Ok(request) => request,
            Err(e) => {
                self.log.push(Message::failure(e.user_message()));
                return;
            }
        };

        match self.runtime.block_on(self.client.update_contract(&request)) {
            Ok(response) => {
                if let Some(error) = response.error.filter(|e| !e.is_empty()) {
                    self.log.push(Message::failure(error));
                    return;
                }
                match response.contract.filter(|c| !c.is_empty()) {
                    Some(contract) => {
                        self.session.apply_update(&contract);
                        let contract_type = self.session.contract().contract_type.clone();
                        self.log.push(Message::contract(&contract_type, contract));
                        let _ = self
                            .event_tx
                            .send(IntakeEvent::ContractReady { contract_type });
                    }
                    None => {
                        self.log.push(Message::failure(
                            PactumError::DecodeError("update returned no contract".into())
                                .user_message(),
                        ));
                    }
                }
            }
            Err(e) => {
                warn!("Update failed: {}", e);
                self.log.push(Message::failure(e.user_message()));
            }
        }
    }

    /// Render the current contract and save it to disk
    fn run_download(&mut self) {
        let request = match self.session.download_request() {
            Ok(request) => request,
            Err(e) => {
                self.log.push(Message::failure(e.user_message()));
                let _ = self.event_tx.send(IntakeEvent::DownloadFailed);
                return;
            }
        };

        match self.runtime.block_on(self.client.render_document(&request)) {
            Ok(bytes) => match download::save_document(&bytes, &request.contract_type) {
                Ok(path) => {
                    self.log.push(Message::assistant(format!(
                        "Saved \"{}\" to {}",
                        request.contract_type,
                        path.display()
                    )));
                    let _ = self.event_tx.send(IntakeEvent::DownloadFinished { path });
                }
                Err(e) => {
                    self.log.push(Message::failure(e.user_message()));
                    let _ = self.event_tx.send(IntakeEvent::DownloadFailed);
                }
            },
            Err(e) => {
                warn!("Document render failed: {}", e);
                self.log.push(Message::failure(e.user_message()));
                let _ = self.event_tx.send(IntakeEvent::DownloadFailed);
            }
        }
    }

    /// Transcribe a clip, then resubmit the transcript as a voice turn
    fn run_transcription(&mut self, clip: RecordedClip) {
        debug!(
            "Transcribing {:.1}s clip",
            clip::duration_secs(&clip.samples, clip.sample_rate)
        );
        let result = clip::encode_wav(&clip.samples, clip.sample_rate)
            .and_then(|wav| self.runtime.block_on(self.client.transcribe(wav)));

        match result {
            Ok(response) => {
                if let Some(lang) = response.language.as_deref() {
                    self.note_language(lang);
                }

                if let Some(error) = response.error.filter(|e| !e.is_empty()) {
                    self.log.push(Message::failure(error));
                } else {
                    match response.text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
                        Some(text) => self.forward_voice_turn(text),
                        None => {
                            self.log.push(Message::failure(
                                "Nothing was heard in that recording. Please try again.",
                            ));
                        }
                    }
                }
            }
            Err(e) => {
                warn!("Transcription failed: {}", e);
                self.log.push(Message::failure(e.user_message()));
            }
        }

        let _ = self.event_tx.send(IntakeEvent::TranscriptionFinished);
    }

    /// A transcript enters the same turn path as typed input, voice-tagged
    /// and subject to the same in-flight guard.
    fn forward_voice_turn(&mut self, text: String) {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.log.push(Message::failure(PLEASE_WAIT));
            return;
        }
        self.log
            .push(Message::user(text.clone()).with_source(InputSource::Voice));
        self.log
            .push(Message::assistant(working_notice(InputSource::Voice)));
        self.run_turn(&text, InputSource::Voice);
    }

    fn note_language(&mut self, lang: &str) {
        if self.session.note_language(Some(lang)) {
            debug!("Detected language updated to {}", lang);
            if let Err(e) = self.store.save_language(lang) {
                warn!("Failed to persist language preference: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intake::SEARCH_TOO_SHORT;

    fn test_pipeline() -> (IntakePipeline, MessageLog) {
        let log = MessageLog::new();
        let pipeline = IntakePipeline::new(BackendConfig::default(), log.clone());
        (pipeline, log)
    }

    #[test]
    fn test_overlapping_turns_rejected() {
        let (pipeline, log) = test_pipeline();
        let handle = pipeline.handle();

        // No worker is running, so the first turn stays in flight
        assert!(handle.submit_turn("Draft a lease", InputSource::Search));
        assert!(handle.is_in_flight());

        assert!(!handle.submit_turn("Draft a will", InputSource::Search));

        let messages = log.snapshot();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content.text(), "Draft a lease");
        assert_eq!(messages[1].content.text(), SEARCHING_NOTICE);
        assert_eq!(messages[2].content.text(), PLEASE_WAIT);
        assert!(messages[2].metadata.is_error);

        // Exactly one command was queued for the backend
        assert_eq!(pipeline.command_rx.len(), 1);
    }

    #[test]
    fn test_short_search_never_queued() {
        let (pipeline, log) = test_pipeline();
        let handle = pipeline.handle();

        assert!(!handle.submit_turn("ab", InputSource::Search));
        assert!(!handle.is_in_flight());
        assert_eq!(pipeline.command_rx.len(), 0);

        let messages = log.snapshot();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].content.text(), SEARCH_TOO_SHORT);
    }

    #[test]
    fn test_button_turn_logs_selection_notice() {
        let (pipeline, log) = test_pipeline();
        let handle = pipeline.handle();

        assert!(handle.submit_turn("Power of attorney", InputSource::Button));
        let messages = log.snapshot();
        assert_eq!(
            messages[0].content.text(),
            "Selected contract type: Power of attorney"
        );
        assert_eq!(messages[0].metadata.source, Some(InputSource::Button));
        assert_eq!(messages[1].content.text(), ANALYZING_NOTICE);
        assert_eq!(pipeline.command_rx.len(), 1);
    }

    #[test]
    fn test_turn_paths_stage_working_notice() {
        let (pipeline, log) = test_pipeline();
        let handle = pipeline.handle();

        assert!(handle.submit_turn("Draft a lease", InputSource::Search));
        let messages = log.snapshot();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content.text(), SEARCHING_NOTICE);
        assert_eq!(messages[1].speaker, crate::messages::Speaker::Assistant);
        assert!(!messages[1].metadata.is_error);

        assert_eq!(working_notice(InputSource::Button), ANALYZING_NOTICE);
        assert_eq!(working_notice(InputSource::Voice), SEARCHING_NOTICE);
    }

    #[test]
    fn test_extract_logs_text_and_placeholder() {
        let (pipeline, log) = test_pipeline();
        let handle = pipeline.handle();

        assert!(handle.extract_fields("The landlord is Alice"));
        let messages = log.snapshot();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content.text(), "The landlord is Alice");
        assert_eq!(messages[1].content.text(), "Extracting contract details…");

        // Extraction is not gated by the conversational flag
        assert!(!handle.is_in_flight());
        assert_eq!(pipeline.command_rx.len(), 1);
    }

    #[test]
    fn test_empty_input_ignored() {
        let (pipeline, log) = test_pipeline();
        let handle = pipeline.handle();

        assert!(!handle.submit_turn("   ", InputSource::Button));
        assert!(!handle.extract_fields(""));
        assert!(log.is_empty());
        assert_eq!(pipeline.command_rx.len(), 0);
    }

    #[test]
    fn test_reveal_order_is_fixed() {
        let turn = TurnResponse {
            language: Some("ko".to_string()),
            suggested_contracts: Some(vec!["Lease".to_string()]),
            required_fields: Some(vec!["Landlord name".to_string()]),
            contract_sample: Some("LEASE AGREEMENT...".to_string()),
            contract_type: Some("Lease".to_string()),
            error: None,
        };

        let reveals = plan_reveals(&turn, InputSource::Search, "");
        assert_eq!(reveals.len(), 4);
        assert!(matches!(reveals[0], Reveal::Language(_)));
        assert!(matches!(reveals[1], Reveal::Suggestions(_)));
        assert!(matches!(reveals[2], Reveal::RequiredFields(_)));
        assert!(matches!(reveals[3], Reveal::Contract { .. }));
    }

    #[test]
    fn test_required_fields_suppressed_for_voice() {
        let turn = TurnResponse {
            required_fields: Some(vec!["Landlord name".to_string()]),
            contract_sample: Some("LEASE AGREEMENT...".to_string()),
            contract_type: Some("Lease".to_string()),
            ..Default::default()
        };

        let reveals = plan_reveals(&turn, InputSource::Voice, "");
        assert_eq!(reveals.len(), 1);
        assert!(matches!(reveals[0], Reveal::Contract { .. }));
    }

    #[test]
    fn test_backend_error_ends_sequence() {
        let turn = TurnResponse {
            language: Some("en".to_string()),
            error: Some("No relevant contracts found.".to_string()),
            contract_sample: Some("should not be revealed".to_string()),
            ..Default::default()
        };

        let reveals = plan_reveals(&turn, InputSource::Search, "");
        assert_eq!(reveals.len(), 2);
        assert!(matches!(reveals[0], Reveal::Language(_)));
        assert_eq!(
            reveals[1],
            Reveal::BackendError("No relevant contracts found.".to_string())
        );
    }

    #[test]
    fn test_contract_type_falls_back_to_button_label() {
        let turn = TurnResponse {
            contract_sample: Some("COMPLAINT...".to_string()),
            ..Default::default()
        };

        let reveals = plan_reveals(&turn, InputSource::Button, "Complaint");
        assert_eq!(
            reveals[0],
            Reveal::Contract {
                contract_type: "Complaint".to_string(),
                text: "COMPLAINT...".to_string(),
            }
        );
    }
}
