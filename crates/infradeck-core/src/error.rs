// ── Core error types ──
//
// User-facing errors from infradeck-core. The `From<infradeck_api::Error>`
// impl folds transport-layer failures into two buckets: the call never got
// a response (`Transport`), or the backend answered with a failure status
// (`Backend`). Nothing is swallowed on the way up.

use infradeck_api::Backend;
use thiserror::Error;

use crate::action::ActionKey;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Call failures ────────────────────────────────────────────────
    /// The request never produced a response: DNS failure, refused
    /// connection, transport timeout, broken TLS.
    #[error("Cannot reach backend: {reason}")]
    Transport { reason: String },

    /// The backend answered with a non-success status. `message` is the
    /// backend's own `error` text, or `"HTTP <status>"` when it sent none.
    #[error("{message}")]
    Backend { status: u16, message: String },

    // ── Client-side refusals ─────────────────────────────────────────
    /// A mutation with the same action key is already in flight.
    #[error("Action already in progress: {key}")]
    Busy { key: ActionKey },

    /// The console has no base URL for this backend.
    #[error("Backend not configured: {backend}")]
    BackendNotConfigured { backend: Backend },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// A response decoded as JSON but not into the expected shape.
    #[error("Unexpected response shape: {message}")]
    Decode { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// HTTP status for backend rejections.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy { .. })
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }

    pub(crate) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<infradeck_api::Error> for CoreError {
    fn from(err: infradeck_api::Error) -> Self {
        match err {
            infradeck_api::Error::Backend { status, message } => {
                CoreError::Backend { status, message }
            }
            infradeck_api::Error::Transport(e) => CoreError::Transport {
                reason: e.to_string(),
            },
            infradeck_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid URL: {e}"),
            },
            infradeck_api::Error::Tls(message) => CoreError::Transport { reason: message },
            infradeck_api::Error::Deserialization { message, .. } => CoreError::Decode { message },
        }
    }
}
