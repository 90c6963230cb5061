//! HTTP text extraction for non-image documents

use crate::contract::TextExtractor;
use crate::error::AiError;
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Extractor that posts raw bytes to a conversion endpoint and reads the
/// plain-text body back
pub struct HttpTextExtractor {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTextExtractor {
    /// Build an extractor pointing at the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| AiError::Http(e.to_string()))?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl TextExtractor for HttpTextExtractor {
    async fn extract_text(&self, payload: &[u8]) -> Result<String, AiError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(payload.to_vec())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.text().await?)
    }
}
