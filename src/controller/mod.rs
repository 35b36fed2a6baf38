//! Upload life-cycle subsystem.
//!
//! # Data Flow
//! ```text
//! select_file(file)
//!     → preview.rs (register preview, release the previous one)
//!     → state.rs (Selected)
//!
//! submit()
//!     → SettingsStore::load + is_complete (embed only)
//!     → state.rs (Uploading)          ← lock released here
//!     → WatermarkService::submit      ← sole suspension point
//!     → state.rs (Success | Error)    ← ignored if the session changed
//! ```
//!
//! # Design Decisions
//! - One tagged state instead of loose flags
//! - At most one request in flight per controller
//! - No retries, no cancellation

pub mod preview;
pub mod state;
pub mod upload;

pub use preview::{PreviewHandle, PreviewRegistry};
pub use state::{StateKind, UploadSession, UploadSnapshot, UploadState};
pub use upload::{UploadController, INCOMPLETE_SETTINGS_MESSAGE};
