//! Watermark service client.
//!
//! # Data Flow
//! ```text
//! UploadRequest (file + chain + key, or file only)
//!     → http.rs (multipart POST via reqwest)
//!     → non-2xx: wire::error_detail → UploadError::Server
//!     → 2xx: wire.rs (JSON → UploadResult, base64 decoded)
//! ```
//!
//! # Design Decisions
//! - The controller depends on the `WatermarkService` trait, not on reqwest
//! - No retries and no default request deadline
//! - The wallet key is sent in the form but never logged

pub mod http;
pub mod service;
pub mod types;
pub mod wire;

pub use http::HttpWatermarkService;
pub use service::WatermarkService;
pub use types::{Artifact, ImageFile, SubmitMode, UploadRequest, UploadResult};
