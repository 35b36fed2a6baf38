//! Wallet credential inspection.
//!
//! # Security
//! - The credential is parsed only to derive a public address for display
//! - Keys are never logged or serialized from here

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{BlockchainError, BlockchainResult, Chain};

/// Derive the Ethereum address behind a hex-encoded private key.
///
/// Accepts the key with or without a `0x` prefix.
pub fn eth_address(private_key_hex: &str) -> BlockchainResult<Address> {
    let key_hex = private_key_hex.trim();
    let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

    let signer: PrivateKeySigner = key_hex
        .parse()
        .map_err(|e| BlockchainError::Wallet(format!("Invalid private key format: {}", e)))?;

    Ok(signer.address())
}

/// Public identity to show next to a saved credential.
///
/// Only ETH keys can be inspected locally; other chains return `None`.
/// A key that fails to parse is reported as an error so the caller can warn
/// before the service rejects it.
pub fn describe_credential(chain: Chain, key: &str) -> BlockchainResult<Option<String>> {
    match chain {
        Chain::Eth => eth_address(key).map(|address| Some(address.to_string())),
        Chain::Sui | Chain::Sol => Ok(None),
    }
}

/// Mask a secret for display, keeping only the last four characters.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}
