//! Result presentation helpers.
//!
//! `renderer.rs` turns an `UploadResult` into data URIs and explorer links;
//! `export.rs` writes the raw artifacts to files for the CLI.

pub mod export;
pub mod renderer;

pub use export::write_artifacts;
pub use renderer::{RenderedResult, ResultRenderer};
