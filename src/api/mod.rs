//! Backend HTTP contract
//!
//! Request/response types and the reqwest client for the drafting service.

pub mod client;
pub mod types;

pub use client::BackendClient;
pub use types::{
    DetectLanguageRequest, DetectLanguageResponse, ExtractFieldsRequest, ExtractFieldsResponse,
    ExtractedFields, InputSource, RenderDocumentRequest, TranscribeResponse, TurnRequest,
    TurnResponse, UpdateContractRequest, UpdateContractResponse,
};
