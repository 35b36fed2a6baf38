//! Transaction explorer links.
//!
//! Maps a (chain, transaction hash) pair to a public explorer URL. The
//! templates are fixed; only the ETH profile is selectable, because older
//! deployments registered on Polygon Mumbai instead of Sepolia.

use thiserror::Error;

use crate::blockchain::types::Chain;
use crate::config::schema::EthExplorerProfile;

const SEPOLIA_TX_URL: &str = "https://sepolia.etherscan.io/tx/";
const MUMBAI_TX_URL: &str = "https://mumbai.polygonscan.com/tx/";
const SOLANA_TX_URL: &str = "https://explorer.solana.com/tx/";
const SOLANA_CLUSTER_SUFFIX: &str = "?cluster=devnet";

/// Link resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExplorerError {
    /// No explorer template exists for the chain (or no chain was set).
    #[error("No transaction explorer for chain {0}")]
    UnsupportedChain(String),
}

/// Pure mapping from chain and transaction hash to an explorer URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChainLinkResolver {
    eth_profile: EthExplorerProfile,
}

impl ChainLinkResolver {
    pub fn new(eth_profile: EthExplorerProfile) -> Self {
        Self { eth_profile }
    }

    /// Resolve the explorer URL for `tx_hash` on `chain`.
    ///
    /// The hash is substituted verbatim. `None` and chains without a
    /// template fail with [`ExplorerError::UnsupportedChain`].
    pub fn resolve(&self, chain: Option<Chain>, tx_hash: &str) -> Result<String, ExplorerError> {
        match chain {
            Some(Chain::Eth) => {
                let base = match self.eth_profile {
                    EthExplorerProfile::Sepolia => SEPOLIA_TX_URL,
                    EthExplorerProfile::PolygonMumbai => MUMBAI_TX_URL,
                };
                Ok(format!("{}{}", base, tx_hash))
            }
            Some(Chain::Sol) => Ok(format!("{}{}{}", SOLANA_TX_URL, tx_hash, SOLANA_CLUSTER_SUFFIX)),
            Some(other) => Err(ExplorerError::UnsupportedChain(other.to_string())),
            None => Err(ExplorerError::UnsupportedChain("<unset>".to_string())),
        }
    }
}
