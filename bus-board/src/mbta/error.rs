//! MBTA client error types.

/// Errors from the MBTA HTTP client.
///
/// Every variant is a failed fetch; none are retried here.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MbtaError {
    /// Connection-level failure: timeout, DNS, refused, broken body.
    #[error("connection error: {0}")]
    Transport(String),

    /// The API answered 429.
    #[error("rate limited by MBTA")]
    RateLimited,

    /// The API answered with some other non-success status.
    #[error("MBTA returned {status}")]
    Status { status: u16 },

    /// The body was not the expected JSON document.
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The client could not be set up from its configuration.
    #[error("not configured: {0}")]
    NotConfigured(String),
}

impl MbtaError {
    /// The HTTP status behind this error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MbtaError::RateLimited => Some(429),
            MbtaError::Status { status } => Some(*status),
            MbtaError::Transport(_) | MbtaError::Json { .. } | MbtaError::NotConfigured(_) => None,
        }
    }

    /// Whether the upstream asked us to slow down.
    pub fn is_rate_limited(&self) -> bool {
        self.status_code() == Some(429)
    }
}

impl From<reqwest::Error> for MbtaError {
    fn from(err: reqwest::Error) -> Self {
        MbtaError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = MbtaError::RateLimited;
        assert_eq!(err.to_string(), "rate limited by MBTA");

        let err = MbtaError::Status { status: 503 };
        assert_eq!(err.to_string(), "MBTA returned 503");

        let err = MbtaError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "connection error: connection refused");
    }

    #[test]
    fn status_codes() {
        assert_eq!(MbtaError::RateLimited.status_code(), Some(429));
        assert_eq!(
            MbtaError::Status { status: 500 }
            .status_code(),
            Some(500)
        );
        assert_eq!(MbtaError::Transport("x".into()).status_code(), None);
        assert_eq!(
            MbtaError::Json {
                message: "x".into()
            }
            .status_code(),
            None
        );
    }

    #[test]
    fn only_429_is_rate_limited() {
        assert!(MbtaError::RateLimited.is_rate_limited());
        assert!(
            MbtaError::Status { status: 429 }
            .is_rate_limited()
        );
        assert!(
            !MbtaError::Status { status: 500 }
            .is_rate_limited()
        );
        assert!(!MbtaError::Transport("x".into()).is_rate_limited());
    }
}
