use thiserror::Error;

/// Errors returned by the generation API client.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 429.
    #[error("generation API rate limited: {0}")]
    RateLimited(String),

    /// The API answered 402 — account credit/quota exhausted.
    #[error("generation API quota exhausted: {0}")]
    QuotaExhausted(String),

    /// Any other non-2xx status.
    #[error("generation API returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The response parsed but lacked the expected payload (no tool call,
    /// no image, empty content).
    #[error("response missing expected payload: {0}")]
    MissingPayload(String),

    /// The payload parsed but failed semantic validation.
    #[error("model response failed validation: {0}")]
    Invalid(String),
}

impl GenAiError {
    /// Returns `true` for failures worth a back-off delay before the next
    /// attempt: rate limiting, server-side 5xx, network-level trouble, and
    /// responses missing the expected payload.
    ///
    /// Quota exhaustion and malformed/invalid payloads are not worth
    /// sleeping over — the caller's retry budget still applies to them.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            GenAiError::RateLimited(_) | GenAiError::MissingPayload(_) => true,
            GenAiError::Http(e) => {
                e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
            }
            GenAiError::Api { status, .. } => *status >= 500,
            GenAiError::QuotaExhausted(_)
            | GenAiError::Deserialize { .. }
            | GenAiError::Invalid(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deserialize_err() -> GenAiError {
        let src = serde_json::from_str::<()>("invalid").unwrap_err();
        GenAiError::Deserialize {
            context: "test".to_owned(),
            source: src,
        }
    }

    #[test]
    fn rate_limited_is_retryable() {
        assert!(GenAiError::RateLimited("slow down".to_owned()).is_retryable());
    }

    #[test]
    fn missing_payload_is_retryable() {
        assert!(GenAiError::MissingPayload("no image".to_owned()).is_retryable());
    }

    #[test]
    fn server_error_status_is_retryable() {
        assert!(GenAiError::Api {
            status: 503,
            message: "unavailable".to_owned()
        }
        .is_retryable());
    }

    #[test]
    fn client_error_status_is_not_retryable() {
        assert!(!GenAiError::Api {
            status: 400,
            message: "bad request".to_owned()
        }
        .is_retryable());
    }

    #[test]
    fn quota_exhausted_is_not_retryable() {
        assert!(!GenAiError::QuotaExhausted("out of credit".to_owned()).is_retryable());
    }

    #[test]
    fn deserialize_error_is_not_retryable() {
        assert!(!deserialize_err().is_retryable());
    }
}
