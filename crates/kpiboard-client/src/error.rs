//! Client error types.
//!
//! Every failure that reaches the dashboard displays as the same user-safe
//! text. The underlying cause stays attached for logging via
//! [`ClientError::detail`] and `std::error::Error::source`.

use thiserror::Error;

/// Message shown to the viewer for any failed KPI fetch.
pub const NETWORK_ERROR: &str = "Network Error";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("Invalid KPI endpoint URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, TLS, or timeout failure.
    #[error("Network Error")]
    Transport {
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-2xx status.
    #[error("Network Error")]
    Status { status: u16, body: String },

    /// 2xx response whose body is not a JSON object.
    #[error("Network Error")]
    Decode {
        #[source]
        source: reqwest::Error,
    },
}

impl ClientError {
    /// Text that is safe to show in the dashboard.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Internal diagnostic, for logs only.
    pub fn detail(&self) -> String {
        match self {
            Self::Build(e) => format!("client build failed: {e}"),
            Self::InvalidUrl { url, reason } => format!("invalid url {url}: {reason}"),
            Self::Transport { source } => format!("HTTP request failed: {source}"),
            Self::Status { status, body } => format!("HTTP {status}: {body}"),
            Self::Decode { source } => format!("Failed to parse response: {source}"),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_hides_body_from_display() {
        let err = ClientError::Status {
            status: 500,
            body: "Traceback (most recent call last)".to_string(),
        };
        assert_eq!(err.to_string(), NETWORK_ERROR);
        assert_eq!(err.user_message(), NETWORK_ERROR);
        assert!(err.detail().contains("HTTP 500"));
        assert!(err.detail().contains("Traceback"));
    }

    #[test]
    fn test_setup_errors_are_descriptive() {
        let err = ClientError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert!(err.to_string().contains("nope"));
    }
}
