//! Chain selection and wallet credential.

use std::fmt;

use crate::blockchain::types::Chain;

/// Opaque wallet credential.
///
/// `Debug` is redacted so the key never ends up in logs by accident.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct WalletKey(String);

impl WalletKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw secret, for the multipart request and persistence only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for WalletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("WalletKey(<empty>)")
        } else {
            f.write_str("WalletKey(<redacted>)")
        }
    }
}

impl From<&str> for WalletKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for WalletKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Per-user chain selection and credential.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSettings {
    /// Selected chain, `None` until the user picks one.
    pub chain: Option<Chain>,
    /// Credential used to authorize on-chain registration.
    pub wallet_key: WalletKey,
}

impl ChainSettings {
    pub fn new(chain: Chain, wallet_key: impl Into<WalletKey>) -> Self {
        Self {
            chain: Some(chain),
            wallet_key: wallet_key.into(),
        }
    }

    /// True when a submission may be made with these settings.
    pub fn is_complete(&self) -> bool {
        self.chain.is_some() && !self.wallet_key.is_empty()
    }
}
