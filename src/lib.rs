pub mod api;
pub mod audio;
pub mod config;
pub mod download;
pub mod intake;
pub mod messages;
pub mod session;
pub mod storage;
pub mod transcribe;
pub mod ui;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PactumError {
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Audio device error: {0}")]
    AudioDeviceError(String),

    #[error("Transcription error: {0}")]
    TranscriptionError(String),

    #[error("Precondition error: {0}")]
    PreconditionError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Channel error: {0}")]
    ChannelError(String),
}

impl From<std::io::Error> for PactumError {
    fn from(e: std::io::Error) -> Self {
        PactumError::StorageError(e.to_string())
    }
}

impl From<reqwest::Error> for PactumError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            PactumError::DecodeError(e.to_string())
        } else {
            PactumError::TransportError(e.to_string())
        }
    }
}

impl PactumError {
    /// Check if this error is recoverable by simply trying again
    pub fn is_recoverable(&self) -> bool {
        match self {
            PactumError::TransportError(_) => true,
            PactumError::DecodeError(_) => true,
            PactumError::BackendError(_) => true,
            PactumError::InputError(_) => true,
            // Requires the user to grant microphone access first
            PactumError::AudioDeviceError(_) => false,
            PactumError::TranscriptionError(_) => true,
            // Requires a contract to exist first
            PactumError::PreconditionError(_) => false,
            PactumError::StorageError(_) => false,
            PactumError::ChannelError(_) => false,
        }
    }

    /// Get a user-friendly description for the transcript
    pub fn user_message(&self) -> String {
        match self {
            PactumError::TransportError(_) => {
                "Could not reach the drafting service. Please try again.".to_string()
            }
            PactumError::DecodeError(_) => {
                "The drafting service returned an unexpected response. Please try again."
                    .to_string()
            }
            // Backend error text is echoed verbatim
            PactumError::BackendError(msg) => msg.clone(),
            PactumError::InputError(msg) => msg.clone(),
            PactumError::AudioDeviceError(_) => {
                "Microphone access failed. Please allow microphone access in your \
                 system settings, then press the record button to try again."
                    .to_string()
            }
            PactumError::TranscriptionError(_) => {
                "Speech recognition failed. Please try again.".to_string()
            }
            PactumError::PreconditionError(msg) => msg.clone(),
            PactumError::StorageError(_) => "File system error occurred.".to_string(),
            PactumError::ChannelError(_) => {
                "Internal communication error. Please restart the application.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PactumError>;
