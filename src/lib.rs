//! PixelProof client library.
//!
//! Selects an image, submits it to the watermark service with the user's
//! chain settings, and renders the returned artifacts and explorer links.

pub mod blockchain;
pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod observability;
pub mod render;
pub mod settings;

pub use client::{HttpWatermarkService, ImageFile, SubmitMode, UploadResult, WatermarkService};
pub use config::ClientConfig;
pub use controller::UploadController;
pub use error::UploadError;
pub use settings::{ChainSettings, FileSettingsStore, SettingsStore};
