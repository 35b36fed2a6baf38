//! Upload life-cycle errors.

use thiserror::Error;

use crate::blockchain::explorer::ExplorerError;
use crate::controller::state::StateKind;

/// Everything that can end a submission, plus the controller's guards.
///
/// `Display` is the user-facing message stored on the `Error` state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Chain or credential missing. Raised before any I/O.
    #[error("{0}")]
    Validation(String),

    /// Transport failure (connect, reset, timeout, body read).
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status, with the server's `detail` if it sent one.
    #[error("{}", server_message(*status, detail.as_deref()))]
    Server { status: u16, detail: Option<String> },

    /// Response body missing required fields or of unexpected shape.
    #[error("Unexpected response from service: {0}")]
    Decode(String),

    /// Link resolution requested for an unmapped chain.
    #[error("No transaction explorer for chain {0}")]
    UnsupportedChain(String),

    /// `submit` called with no file selected.
    #[error("No file selected")]
    NoFileSelected,

    /// `submit` called while a request is already in flight.
    #[error("An upload is already in progress")]
    AlreadyUploading,

    /// `submit` called from a state that does not allow it.
    #[error("Cannot submit from the {0} state")]
    InvalidState(StateKind),
}

impl UploadError {
    /// Short label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "validation",
            UploadError::Network(_) => "network",
            UploadError::Server { .. } => "server",
            UploadError::Decode(_) => "decode",
            UploadError::UnsupportedChain(_) => "unsupported_chain",
            UploadError::NoFileSelected => "no_file",
            UploadError::AlreadyUploading => "already_uploading",
            UploadError::InvalidState(_) => "invalid_state",
        }
    }

    /// Guard errors leave the session untouched; the rest move it to `Error`.
    pub fn is_guard(&self) -> bool {
        matches!(
            self,
            UploadError::NoFileSelected | UploadError::AlreadyUploading | UploadError::InvalidState(_)
        )
    }
}

fn server_message(status: u16, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!("Server error ({}): {}", status, detail),
        None => format!("Server error ({}). Please check server logs or try again.", status),
    }
}

impl From<ExplorerError> for UploadError {
    fn from(err: ExplorerError) -> Self {
        match err {
            ExplorerError::UnsupportedChain(chain) => UploadError::UnsupportedChain(chain),
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(err: reqwest::Error) -> Self {
        UploadError::Network(err.to_string())
    }
}
