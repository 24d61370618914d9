//! Wire types for the drafting service
//!
//! One canonical schema; field names that drifted across backend revisions
//! (`contract` vs `contract_sample`) are accepted as deprecated aliases on
//! decode and never produced on encode.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structured key/value fields extracted from free-form user text.
///
/// Values may be strings or nested mappings; the client never validates
/// them, it only carries them through to the update endpoint.
pub type ExtractedFields = serde_json::Map<String, serde_json::Value>;

/// Where a conversational turn originated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    /// A contract-type shortcut button
    Button,
    /// The launch search query
    Search,
    /// A transcribed voice recording
    Voice,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InputSource::Button => "button",
            InputSource::Search => "search",
            InputSource::Voice => "voice",
        };
        f.write_str(s)
    }
}

impl InputSource {
    /// Parse a source tag from launch arguments; unknown tags fall back to search
    pub fn parse(tag: &str) -> Self {
        match tag {
            "button" => InputSource::Button,
            "voice" => InputSource::Voice,
            _ => InputSource::Search,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DetectLanguageRequest {
    pub text: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectLanguageResponse {
    pub language: Option<String>,
    pub error: Option<String>,
}

/// One conversational exchange with the drafting service
#[derive(Debug, Clone, Serialize)]
pub struct TurnRequest {
    pub message: String,
    pub source: InputSource,
}

/// Response to a conversational turn.
///
/// All fields are optional; the reveal sequence in the intake orchestrator
/// decides what to surface and in what order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TurnResponse {
    /// Language detected from the user's message
    pub language: Option<String>,

    /// Contract types the backend suggests for this request
    #[serde(alias = "suggested_contract")]
    pub suggested_contracts: Option<Vec<String>>,

    /// Input items the user must still provide
    pub required_fields: Option<Vec<String>>,

    /// A generated contract sample (older backends called this `contract`)
    #[serde(alias = "contract")]
    pub contract_sample: Option<String>,

    /// Type of the generated sample
    pub contract_type: Option<String>,

    /// Free-text backend error, echoed verbatim to the user
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractFieldsRequest {
    pub user_input: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExtractFieldsResponse {
    pub extracted_fields: Option<ExtractedFields>,
    pub error: Option<String>,
}

/// Body for the contract update endpoint.
///
/// Carries the session's current contract text and type unmodified, plus
/// the extracted mapping exactly as the extraction endpoint returned it.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateContractRequest {
    pub current_contract: String,
    pub contract_type: String,
    pub extracted_fields: ExtractedFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContractResponse {
    pub contract: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderDocumentRequest {
    pub contract_type: String,
    pub contract_text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TranscribeResponse {
    pub text: Option<String>,
    pub language: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_serializes_lowercase() {
        let req = TurnRequest {
            message: "lease".to_string(),
            source: InputSource::Voice,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["source"], "voice");
        assert_eq!(json["message"], "lease");
    }

    #[test]
    fn test_turn_response_canonical_field() {
        let turn: TurnResponse = serde_json::from_str(
            r#"{"contract_sample": "LEASE AGREEMENT...", "contract_type": "Lease"}"#,
        )
        .unwrap();
        assert_eq!(turn.contract_sample.as_deref(), Some("LEASE AGREEMENT..."));
        assert_eq!(turn.contract_type.as_deref(), Some("Lease"));
    }

    #[test]
    fn test_turn_response_accepts_deprecated_contract_alias() {
        let turn: TurnResponse =
            serde_json::from_str(r#"{"contract": "POWER OF ATTORNEY..."}"#).unwrap();
        assert_eq!(turn.contract_sample.as_deref(), Some("POWER OF ATTORNEY..."));
    }

    #[test]
    fn test_turn_response_unknown_fields_ignored() {
        let turn: TurnResponse =
            serde_json::from_str(r#"{"language": "ko", "contract_details": [{"a": 1}]}"#).unwrap();
        assert_eq!(turn.language.as_deref(), Some("ko"));
        assert!(turn.contract_sample.is_none());
    }

    #[test]
    fn test_update_request_carries_fields_unmodified() {
        let mut fields = ExtractedFields::new();
        fields.insert("party_a".to_string(), serde_json::json!("Alice"));

        let req = UpdateContractRequest {
            current_contract: "This agreement...".to_string(),
            contract_type: "Lease".to_string(),
            extracted_fields: fields,
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["current_contract"], "This agreement...");
        assert_eq!(json["contract_type"], "Lease");
        assert_eq!(json["extracted_fields"]["party_a"], "Alice");
    }

    #[test]
    fn test_source_parse_fallback() {
        assert_eq!(InputSource::parse("button"), InputSource::Button);
        assert_eq!(InputSource::parse("voice"), InputSource::Voice);
        assert_eq!(InputSource::parse("bogus"), InputSource::Search);
    }
}
