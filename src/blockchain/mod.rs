//! Chain-specific helpers.
//!
//! # Data Flow
//! ```text
//! ChainSettings (chain + wallet key)
//!     → types.rs (chain identifiers sent to the service)
//!     → wallet.rs (derive a display address, never log the key)
//!
//! UploadResult (tx hash)
//!     → explorer.rs (chain + hash → explorer URL)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - No RPC access: registration happens on the service side

pub mod explorer;
pub mod types;
pub mod wallet;

pub use explorer::{ChainLinkResolver, ExplorerError};
pub use types::{BlockchainError, Chain};
