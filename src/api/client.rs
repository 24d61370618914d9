//! HTTP client for the drafting service
//!
//! One `reqwest` client shared by all endpoints, built once with the
//! configured timeouts. Requests are single-shot: no retry, no cancellation.

use crate::api::types::{
    DetectLanguageRequest, DetectLanguageResponse, ExtractFieldsRequest, ExtractFieldsResponse,
    RenderDocumentRequest, TranscribeResponse, TurnRequest, TurnResponse, UpdateContractRequest,
    UpdateContractResponse,
};
use crate::config::BackendConfig;
use crate::{PactumError, Result};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Client for the drafting service backend
#[derive(Clone)]
pub struct BackendClient {
    client: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client from the given configuration
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| PactumError::TransportError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R> {
        let url = self.url(path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            // Error bodies are still JSON with a free-text `error` field when
            // the backend produced them itself; surface that text if present.
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
                    return Err(PactumError::BackendError(error.to_string()));
                }
            }
            return Err(PactumError::TransportError(format!(
                "{} returned status {}",
                path, status
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| PactumError::DecodeError(format!("{}: {}", path, e)))
    }

    /// Detect the language of a piece of text
    pub async fn detect_language(&self, text: impl Into<String>) -> Result<DetectLanguageResponse> {
        let body = DetectLanguageRequest { text: text.into() };
        self.post_json("/detect-language", &body).await
    }

    /// Run one conversational turn
    pub async fn send_turn(&self, request: &TurnRequest) -> Result<TurnResponse> {
        self.post_json("/chatbot-response", request).await
    }

    /// Extract structured contract fields from free-form user text
    pub async fn extract_fields(&self, user_input: impl Into<String>) -> Result<ExtractFieldsResponse> {
        let body = ExtractFieldsRequest {
            user_input: user_input.into(),
        };
        self.post_json("/extract-fields", &body).await
    }

    /// Fill the current contract with extracted fields
    pub async fn update_contract(
        &self,
        request: &UpdateContractRequest,
    ) -> Result<UpdateContractResponse> {
        self.post_json("/update-contract", request).await
    }

    /// Render the current contract as a downloadable document
    pub async fn render_document(&self, request: &RenderDocumentRequest) -> Result<Vec<u8>> {
        let url = self.url("/download-contract");
        debug!("POST {} (document render)", url);

        let response = self.client.post(&url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
                    return Err(PactumError::BackendError(error.to_string()));
                }
            }
            return Err(PactumError::TransportError(format!(
                "Document render returned status {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(PactumError::DecodeError(
                "Document render returned an empty body".to_string(),
            ));
        }
        Ok(bytes.to_vec())
    }

    /// Send a WAV clip to the speech-to-text endpoint
    pub async fn transcribe(&self, wav_data: Vec<u8>) -> Result<TranscribeResponse> {
        let url = self.url("/stt");
        debug!("POST {} ({} bytes of audio)", url, wav_data.len());

        let part = Part::bytes(wav_data)
            .file_name("recording.wav")
            .mime_str("audio/wav")
            .map_err(|e| PactumError::TranscriptionError(format!("Invalid audio part: {}", e)))?;
        let form = Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
                    return Err(PactumError::BackendError(error.to_string()));
                }
            }
            return Err(PactumError::TranscriptionError(format!(
                "Speech-to-text returned status {}",
                status
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| PactumError::DecodeError(format!("/stt: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_url_joining() {
        let config = BackendConfig::default().with_base_url("http://localhost:5000/");
        let client = BackendClient::new(&config).unwrap();
        assert_eq!(client.url("/stt"), "http://localhost:5000/stt");
    }
}
