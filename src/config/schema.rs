//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the PixelProof client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ClientConfig {
    /// Remote watermark service location and contract.
    pub service: ServiceConfig,

    /// Transport timeouts.
    pub timeouts: TimeoutConfig,

    /// Explorer link templates.
    pub explorer: ExplorerConfig,

    /// Persisted chain settings location.
    pub settings: SettingsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Remote watermark service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the service (e.g., "http://localhost:8000").
    pub base_url: String,

    /// Path of the embed endpoint.
    pub upload_path: String,

    /// Path of the decode endpoint.
    pub decode_path: String,

    /// Response contract of the deployed decode endpoint.
    pub decode_contract: DecodeContract,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            upload_path: "/api/v1/upload".to_string(),
            decode_path: "/api/v1/workspace/decode".to_string(),
            decode_contract: DecodeContract::Link,
            use_system_proxy: true,
        }
    }
}

/// Shape of a successful decode response.
///
/// Service versions disagree; exactly one is expected per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DecodeContract {
    /// `{ "link": "..." }`
    #[default]
    Link,
    /// `{ "extracted": { "data": "...", "type": "..." } }`
    Extracted,
}

/// Timeout configuration for service calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total request timeout in seconds. Unset means the transport default
    /// (no deadline), so a hung request stays in flight.
    pub request_secs: Option<u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: None,
        }
    }
}

/// Explorer link configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Which explorer ETH transaction hashes resolve to.
    pub eth_profile: EthExplorerProfile,
}

/// Versioned ETH explorer template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum EthExplorerProfile {
    /// `https://sepolia.etherscan.io/tx/{hash}`
    #[default]
    Sepolia,
    /// `https://mumbai.polygonscan.com/tx/{hash}` (early deployments).
    PolygonMumbai,
}

/// Persisted settings configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SettingsConfig {
    /// Settings file override. Defaults to the platform config directory.
    pub path: Option<PathBuf>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
