//! Error types for the AI collaborators
//!
//! Document validation never surfaces these: transport and parse failures
//! are synthesized into invalid outcomes so the entry is marked rather than
//! left pending. The summarizer and text extractor do return them.

/// AI collaborator errors
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// No API key configured
    #[error("API key is not configured")]
    MissingApiKey,

    /// Transport-level failure
    #[error("http error: {0}")]
    Http(String),

    /// Endpoint answered with a non-success status
    #[error("api error {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// Response arrived but its shape is not what the contract promises
    #[error("response shape error: {0}")]
    ResponseShape(String),

    /// Inner JSON payload could not be parsed
    #[error("response parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = AiError::Api {
            status: 429,
            body: "quota".into(),
        };
        assert_eq!(err.to_string(), "api error 429: quota");
        assert!(AiError::MissingApiKey.to_string().contains("API key"));
    }
}
