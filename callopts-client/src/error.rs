//! Client-side error types.
//!
//! [`ClientError`] is what a [`ClientCall`](crate::ClientCall) resolves to
//! when a call fails. Configuring a call never fails, apart from the opt-in
//! validation in [`CallOptions::try_with_authority`](crate::CallOptions::try_with_authority).

use callopts_core::Code;

/// Errors surfaced by a channel for a single call.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ClientError {
    /// A status reported for the call, with code and optional message.
    #[error("{code}: {}", .message.as_deref().unwrap_or(""))]
    Status {
        code: Code,
        message: Option<String>,
    },

    /// Transport-level error (connection failed, stream reset, etc.).
    #[error("transport error: {0}")]
    Transport(String),
}

impl ClientError {
    /// Create a new status error with a code and message.
    pub fn new<S: Into<String>>(code: Code, message: S) -> Self {
        ClientError::Status {
            code,
            message: Some(message.into()),
        }
    }

    /// Create a new status error with just a code.
    pub fn from_code(code: Code) -> Self {
        ClientError::Status {
            code,
            message: None,
        }
    }

    /// Get the error code.
    ///
    /// Transport errors report `Unavailable`.
    pub fn code(&self) -> Code {
        match self {
            ClientError::Status { code, .. } => *code,
            ClientError::Transport(_) => Code::Unavailable,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } => message.as_deref(),
            ClientError::Transport(msg) => Some(msg),
        }
    }

    /// Whether the call may succeed if issued again.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClientError::Status { code, .. } => code.is_retryable(),
            ClientError::Transport(_) => true,
        }
    }

    /// Create a deadline exceeded error.
    pub fn deadline_exceeded<S: Into<String>>(message: S) -> Self {
        Self::new(Code::DeadlineExceeded, message)
    }

    /// Create a canceled error.
    pub fn canceled<S: Into<String>>(message: S) -> Self {
        Self::new(Code::Canceled, message)
    }

    /// Create an unavailable error.
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::new(Code::Unavailable, message)
    }

    /// Create an unimplemented error.
    pub fn unimplemented<S: Into<String>>(message: S) -> Self {
        Self::new(Code::Unimplemented, message)
    }
}

/// Returned by [`CallOptions::try_with_authority`](crate::CallOptions::try_with_authority)
/// when the value is not a valid `host[:port]` authority.
#[derive(Debug, thiserror::Error)]
#[error("invalid authority {authority:?}: {source}")]
pub struct InvalidAuthority {
    authority: String,
    #[source]
    source: http::uri::InvalidUri,
}

impl InvalidAuthority {
    pub(crate) fn new(authority: &str, source: http::uri::InvalidUri) -> Self {
        Self {
            authority: authority.to_string(),
            source,
        }
    }

    /// The rejected value.
    pub fn authority(&self) -> &str {
        &self.authority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error() {
        let err = ClientError::deadline_exceeded("deadline passed before the call started");
        assert_eq!(err.code(), Code::DeadlineExceeded);
        assert_eq!(
            err.message(),
            Some("deadline passed before the call started")
        );
        assert!(!err.is_retryable());
        assert_eq!(
            err.to_string(),
            "deadline_exceeded: deadline passed before the call started"
        );
    }

    #[test]
    fn test_from_code() {
        let err = ClientError::from_code(Code::Canceled);
        assert_eq!(err.message(), None);
        assert_eq!(err.to_string(), "canceled: ");
    }

    #[test]
    fn test_transport_error() {
        let err = ClientError::Transport("connection refused".into());
        assert_eq!(err.code(), Code::Unavailable);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "transport error: connection refused");
    }
}
