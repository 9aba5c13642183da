use thiserror::Error;

/// Message shown when a failed request carries no server `detail`.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Error, Debug)]
pub enum LuxeError {
    #[error("HTTP error {status}: {}", .detail.as_deref().unwrap_or("<no detail>"))]
    Http { status: u16, detail: Option<String> },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("configuration error: {0}")]
    Config(String),

    /// The server answered 2xx but reported `success: false` or omitted a
    /// required field.
    #[error("request rejected: {}", .0.as_deref().unwrap_or("<no message>"))]
    Rejected(Option<String>),

    #[error("a submission is already in flight")]
    Busy,

    #[error("flow was closed before the request completed")]
    Cancelled,

    #[error("invalid flow state: {0}")]
    InvalidState(&'static str),

    #[error("payment method {0} is handled by the hosted payment widget")]
    HostedPaymentOnly(&'static str),
}

pub type Result<T> = std::result::Result<T, LuxeError>;

/// Coarse classification of a failure, used to decide whether a retry
/// without changing the input makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No response reached us (connect, timeout, TLS).
    Transport,
    /// The server refused the input (4xx or `success: false`).
    Validation,
    /// The server failed (5xx).
    Server,
    /// Local misuse: bad config, wrong flow state, decode failures.
    Client,
}

impl LuxeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LuxeError::Http { status, .. } if *status >= 500 => ErrorKind::Server,
            LuxeError::Http { .. } | LuxeError::Rejected(_) => ErrorKind::Validation,
            LuxeError::Request(e) if e.is_decode() => ErrorKind::Client,
            LuxeError::Request(_) => ErrorKind::Transport,
            LuxeError::Json(_)
            | LuxeError::Io(_)
            | LuxeError::Url(_)
            | LuxeError::Config(_)
            | LuxeError::Busy
            | LuxeError::Cancelled
            | LuxeError::InvalidState(_)
            | LuxeError::HostedPaymentOnly(_) => ErrorKind::Client,
        }
    }

    /// Transient failures the user may retry with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Transport | ErrorKind::Server)
    }

    /// The server-provided message when there is one, otherwise the generic
    /// fallback.
    pub fn user_message(&self) -> String {
        match self {
            LuxeError::Http {
                detail: Some(detail),
                ..
            } => detail.clone(),
            LuxeError::Rejected(Some(message)) => message.clone(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_4xx_is_validation_and_not_retryable() {
        let err = LuxeError::Http {
            status: 400,
            detail: Some("Email already registered".into()),
        };
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.is_retryable());
        assert_eq!(err.user_message(), "Email already registered");
    }

    #[test]
    fn test_http_5xx_is_server_and_retryable() {
        let err = LuxeError::Http {
            status: 502,
            detail: None,
        };
        assert_eq!(err.kind(), ErrorKind::Server);
        assert!(err.is_retryable());
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_rejected_uses_message_or_fallback() {
        assert_eq!(
            LuxeError::Rejected(Some("nope".into())).user_message(),
            "nope"
        );
        assert_eq!(LuxeError::Rejected(None).user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_local_errors_are_client_kind() {
        assert_eq!(LuxeError::Busy.kind(), ErrorKind::Client);
        assert_eq!(LuxeError::Cancelled.kind(), ErrorKind::Client);
        assert!(!LuxeError::Config("x".into()).is_retryable());
    }
}
