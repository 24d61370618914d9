//! Session state for the drafting conversation
//!
//! All of the mutable conversation state lives here and is owned by the
//! intake worker thread, which keeps the last-writer-wins semantics of the
//! original single-threaded design without ambient globals.

use crate::api::{ExtractedFields, RenderDocumentRequest, UpdateContractRequest};
use crate::{PactumError, Result};

/// Fallback language when nothing has been detected yet
pub const DEFAULT_LANGUAGE: &str = "en";

/// The current contract text and type, always set together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractState {
    pub text: String,
    pub contract_type: String,
}

impl ContractState {
    /// Download and update are only meaningful once both halves are set
    pub fn is_ready(&self) -> bool {
        !self.text.is_empty() && !self.contract_type.is_empty()
    }
}

/// Per-run conversation state
#[derive(Debug, Clone)]
pub struct Session {
    contract: ContractState,
    language: String,
    last_fields: Option<ExtractedFields>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            contract: ContractState::default(),
            language: DEFAULT_LANGUAGE.to_string(),
            last_fields: None,
        }
    }

    /// Restore the persisted language preference
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !language.is_empty() {
            self.language = language;
        }
        self
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Record a language tag from any backend response. Last writer wins;
    /// returns true when the stored value changed.
    pub fn note_language(&mut self, language: Option<&str>) -> bool {
        match language {
            Some(lang) if !lang.is_empty() && lang != self.language => {
                self.language = lang.to_string();
                true
            }
            _ => false,
        }
    }

    pub fn contract(&self) -> &ContractState {
        &self.contract
    }

    pub fn contract_ready(&self) -> bool {
        self.contract.is_ready()
    }

    /// Overwrite the contract wholesale with a freshly generated sample
    pub fn set_contract(&mut self, contract_type: impl Into<String>, text: impl Into<String>) {
        self.contract = ContractState {
            text: text.into(),
            contract_type: contract_type.into(),
        };
    }

    /// Replace the contract text after a successful update; the type is kept
    pub fn apply_update(&mut self, text: impl Into<String>) {
        self.contract.text = text.into();
    }

    /// Keep the most recent extraction for traceability
    pub fn remember_fields(&mut self, fields: ExtractedFields) {
        self.last_fields = Some(fields);
    }

    pub fn last_fields(&self) -> Option<&ExtractedFields> {
        self.last_fields.as_ref()
    }

    /// Build the update request body, or fail fast when no contract exists
    pub fn update_request(&self, fields: ExtractedFields) -> Result<UpdateContractRequest> {
        if !self.contract.is_ready() {
            return Err(PactumError::PreconditionError(
                "There are no contract details yet. Generate a contract sample first."
                    .to_string(),
            ));
        }
        Ok(UpdateContractRequest {
            current_contract: self.contract.text.clone(),
            contract_type: self.contract.contract_type.clone(),
            extracted_fields: fields,
        })
    }

    /// Build the document render request body, or fail fast
    pub fn download_request(&self) -> Result<RenderDocumentRequest> {
        if !self.contract.is_ready() {
            return Err(PactumError::PreconditionError(
                "There is no contract to download yet.".to_string(),
            ));
        }
        Ok(RenderDocumentRequest {
            contract_type: self.contract.contract_type.clone(),
            contract_text: self.contract.text.clone(),
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
