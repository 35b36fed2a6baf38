//! Chain identifiers and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Target blockchain network for on-chain registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    /// Ethereum (Sepolia testnet on the service side).
    #[serde(rename = "ETH")]
    Eth,
    /// Sui.
    #[serde(rename = "SUI")]
    Sui,
    /// Solana (devnet on the service side).
    #[serde(rename = "SOL")]
    Sol,
}

impl Chain {
    /// All chains the service accepts.
    pub const ALL: [Chain; 3] = [Chain::Eth, Chain::Sui, Chain::Sol];

    /// Wire identifier sent in the `chain` multipart field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Chain::Eth => "ETH",
            Chain::Sui => "SUI",
            Chain::Sol => "SOL",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = BlockchainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ETH" => Ok(Chain::Eth),
            "SUI" => Ok(Chain::Sui),
            "SOL" => Ok(Chain::Sol),
            other => Err(BlockchainError::UnknownChain(other.to_string())),
        }
    }
}

/// Errors that can occur in chain-specific helpers.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// The identifier is not one of `ETH`, `SUI`, `SOL`.
    #[error("Unknown chain identifier: {0:?}")]
    UnknownChain(String),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),
}

/// Result type for blockchain helpers.
pub type BlockchainResult<T> = Result<T, BlockchainError>;
