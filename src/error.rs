//! Error types for podpoint-client.

use thiserror::Error;

/// The main error type for podpoint-client.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ───────────────────────────────────────────────────────
    /// Identity exchange returned a non-2xx, or a 2xx body that could not be
    /// decoded (missing field, non-numeric expiry). Carries the HTTP status
    /// actually observed - 200 for decode failures.
    #[error("Auth Error ({status}) - {message}")]
    Auth {
        /// HTTP status code observed on the identity endpoint.
        status: u16,
        /// Response body or decode failure description.
        message: String,
    },

    /// Session exchange returned a non-2xx, or a 2xx body missing an expected
    /// key.
    #[error("Session Error ({status}) - {message}")]
    Session {
        /// HTTP status code observed on the session endpoint.
        status: u16,
        /// Response body or decode failure description.
        message: String,
    },

    // ── API ──────────────────────────────────────────────────────────────────
    /// A domain endpoint returned a status outside the accepted window.
    #[error("API Error ({status}) - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        message: String,
    },

    // ── Infrastructure ───────────────────────────────────────────────────────
    /// Timeout or transport/DNS failure reaching an endpoint. The message
    /// always names the target URL and the underlying cause.
    #[error("Connection Error: {0}")]
    Connection(String),

    /// Caller-supplied input rejected before any network call.
    #[error("Validation Error: {0}")]
    Validation(String),

    /// Client construction error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON decode error on a domain response body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates an authentication error.
    #[must_use]
    pub fn auth(status: u16, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    /// Creates a session error.
    #[must_use]
    pub fn session(status: u16, message: impl Into<String>) -> Self {
        Self::Session {
            status,
            message: message.into(),
        }
    }

    /// Creates a generic API error.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// The HTTP status carried by this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. }
            | Error::Session { status, .. }
            | Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Selects which error variant the transport wrapper raises when a response
/// status falls outside the accepted window. Each call site picks its kind
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raise [`Error::Auth`].
    Auth,
    /// Raise [`Error::Session`].
    Session,
    /// Raise [`Error::Api`].
    Api,
}

impl ErrorKind {
    pub(crate) fn with_status(self, status: u16, message: String) -> Error {
        match self {
            ErrorKind::Auth => Error::Auth { status, message },
            ErrorKind::Session => Error::Session { status, message },
            ErrorKind::Api => Error::Api { status, message },
        }
    }
}

/// Convenience type alias.
pub type Result<T> = std::result::Result<T, Error>;
