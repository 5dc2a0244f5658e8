//! Error types for the Kelifax client.

use thiserror::Error;

/// Result type for Kelifax client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Kelifax client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection refused, DNS, timeout). No response was received.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response, with the parsed message or the raw body.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API reported no resource for the requested slug.
    #[error("Resource not found: {slug}")]
    NotFound { slug: String },

    /// Response did not match the `{success, data, message}` envelope, or reported `success: false`.
    #[error("Unexpected response: {0}")]
    Envelope(String),

    /// Admin call attempted without a live session.
    #[error("Admin session required")]
    Unauthorized,

    /// Configuration error (missing base URL, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Logo rejected before or during upload.
    #[error("Upload error: {0}")]
    Upload(String),

    /// Local session file could not be read or written.
    #[error("Session store error: {0}")]
    SessionStore(String),
}

impl ClientError {
    /// Whether a retry with the same request could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Network(_) => true,
            ClientError::Api { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Envelope(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ClientError::Network("refused".into()).is_transient());
        assert!(ClientError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_transient());
        assert!(ClientError::Api {
            status: 429,
            message: "slow down".into()
        }
        .is_transient());
        assert!(!ClientError::Api {
            status: 400,
            message: "bad".into()
        }
        .is_transient());
        assert!(!ClientError::Unauthorized.is_transient());
    }

    #[test]
    fn test_api_error_display() {
        let err = ClientError::Api {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "API error (502): Bad Gateway");
    }
}
