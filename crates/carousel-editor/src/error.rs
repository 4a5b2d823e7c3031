//! Error type shared by the editor state machine and the API client.

use thiserror::Error;

/// Failures surfaced to the editor.
///
/// None of these are retried. The draft that produced them is left intact so
/// the user can correct it and submit again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// The draft is incomplete; nothing was sent.
    #[error("{message}")]
    Validation {
        /// What needs fixing.
        message: String,
    },

    /// A slide index outside the current list was targeted.
    #[error("slide index {index} is out of range for {len} slides")]
    IndexOutOfRange {
        /// Rejected index.
        index: usize,
        /// List length at the time of the call.
        len: usize,
    },

    /// `submit` was called while an earlier submission was still pending.
    #[error("a submission is already in progress")]
    SubmitInFlight,

    /// The server answered with a non-success status.
    #[error("server responded with {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or the status reason.
        message: String,
    },

    /// The request never produced a usable response.
    #[error("transport error: {message}")]
    Transport {
        /// Underlying client error.
        message: String,
    },
}

impl EditorError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// HTTP status for [`EditorError::Api`], `None` otherwise.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for EditorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport {
            message: err.to_string(),
        }
    }
}
