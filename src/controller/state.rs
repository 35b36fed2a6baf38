//! Upload session states.
//!
//! ```text
//!            select_file            submit              ok
//!   Idle ──────────────▶ Selected ─────────▶ Uploading ─────▶ Success
//!    ▲                      ▲                    │
//!    │ reset                │ select_file        │ err
//!    └──── (any) ───────────┴──── (any)          ▼
//!                               Error ◀──────────┘
//!                                 │ submit (retry)
//!                                 └────────▶ Uploading
//! ```

use std::fmt;

use uuid::Uuid;

use crate::client::types::{ImageFile, UploadResult};
use crate::controller::preview::PreviewHandle;
use crate::error::UploadError;

/// A selected file and its preview, alive until the next selection or reset.
#[derive(Debug)]
pub struct UploadSession {
    pub(crate) id: Uuid,
    pub(crate) file: ImageFile,
    pub(crate) preview: PreviewHandle,
}

impl UploadSession {
    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    pub fn preview_uri(&self) -> &str {
        self.preview.uri()
    }
}

/// Controller state. Each variant carries only what is valid in it.
#[derive(Debug, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Selected {
        session: UploadSession,
    },
    Uploading {
        session: UploadSession,
    },
    Success {
        session: UploadSession,
        result: UploadResult,
    },
    Error {
        session: UploadSession,
        error: UploadError,
    },
}

impl UploadState {
    pub fn kind(&self) -> StateKind {
        match self {
            UploadState::Idle => StateKind::Idle,
            UploadState::Selected { .. } => StateKind::Selected,
            UploadState::Uploading { .. } => StateKind::Uploading,
            UploadState::Success { .. } => StateKind::Success,
            UploadState::Error { .. } => StateKind::Error,
        }
    }

    pub fn session(&self) -> Option<&UploadSession> {
        match self {
            UploadState::Idle => None,
            UploadState::Selected { session }
            | UploadState::Uploading { session }
            | UploadState::Success { session, .. }
            | UploadState::Error { session, .. } => Some(session),
        }
    }

    /// Move the session out, leaving `Idle` behind.
    pub(crate) fn take_session(&mut self) -> Option<UploadSession> {
        match std::mem::take(self) {
            UploadState::Idle => None,
            UploadState::Selected { session }
            | UploadState::Uploading { session }
            | UploadState::Success { session, .. }
            | UploadState::Error { session, .. } => Some(session),
        }
    }

    pub fn snapshot(&self) -> UploadSnapshot {
        let session = self.session();
        UploadSnapshot {
            status: self.kind(),
            file_name: session.map(|s| s.file.name.clone()),
            preview_uri: session.map(|s| s.preview_uri().to_string()),
            result: match self {
                UploadState::Success { result, .. } => Some(result.clone()),
                _ => None,
            },
            error: match self {
                UploadState::Error { error, .. } => Some(error.clone()),
                _ => None,
            },
            in_flight: matches!(self, UploadState::Uploading { .. }),
        }
    }
}

/// Discriminant of [`UploadState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKind {
    Idle,
    Selected,
    Uploading,
    Success,
    Error,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StateKind::Idle => "idle",
            StateKind::Selected => "selected",
            StateKind::Uploading => "uploading",
            StateKind::Success => "success",
            StateKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// Owned view of the state for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSnapshot {
    pub status: StateKind,
    pub file_name: Option<String>,
    pub preview_uri: Option<String>,
    pub result: Option<UploadResult>,
    pub error: Option<UploadError>,
    /// A request is on the wire; may outlive the session that sent it.
    pub in_flight: bool,
}

impl UploadSnapshot {
    pub fn is_uploading(&self) -> bool {
        self.in_flight
    }

    /// Message to show the user, if the last submission failed.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}

impl Default for UploadSnapshot {
    fn default() -> Self {
        UploadState::Idle.snapshot()
    }
}
