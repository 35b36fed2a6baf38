//! Chain settings subsystem.
//!
//! # Data Flow
//! ```text
//! process start
//!     → SettingsStore::load (file or memory; empty on any failure)
//!     → ChainSettings
//!     → UploadController reads it on every submit
//!
//! explicit save
//!     → SettingsStore::save (full overwrite, last write wins)
//! ```

pub mod file;
pub mod memory;
pub mod model;
pub mod store;

pub use file::FileSettingsStore;
pub use memory::InMemorySettingsStore;
pub use model::{ChainSettings, WalletKey};
pub use store::{is_complete, SettingsError, SettingsStore};
