//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for account sync.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the account sync service.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// RPC endpoint settings.
    pub rpc: RpcConfig,

    /// Balance and history refresh behaviour.
    pub sync: SyncConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Public clusters with a well-known endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
}

impl Cluster {
    /// Public RPC URL of the cluster.
    pub fn url(self) -> &'static str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
        }
    }
}

impl std::str::FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" => Ok(Cluster::MainnetBeta),
            other => Err(format!("unknown cluster '{}'", other)),
        }
    }
}

/// Commitment level passed with every query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}

/// RPC endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RpcConfig {
    /// Cluster whose public endpoint is used when `url` is empty.
    pub cluster: Cluster,

    /// Explicit endpoint URL (overrides `cluster`).
    pub url: String,

    /// Request deadline in seconds (0 = none).
    pub timeout_secs: u64,

    /// Commitment level for all queries.
    pub commitment: Commitment,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::Devnet,
            url: String::new(),
            timeout_secs: 0,
            commitment: Commitment::Confirmed,
        }
    }
}

impl RpcConfig {
    /// The URL queries are sent to.
    pub fn endpoint(&self) -> &str {
        if self.url.trim().is_empty() {
            self.cluster.url()
        } else {
            self.url.trim()
        }
    }
}

/// How a history refresh with failed detail lookups is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DetailCommit {
    /// Any failed lookup leaves the previous history in place.
    #[default]
    AllOrNothing,
    /// Successful lookups are committed, failures are reported.
    Partial,
}

/// Account sync configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SyncConfig {
    /// Maximum transaction detail lookups in flight per refresh.
    pub max_concurrent_details: usize,

    /// Signatures requested per history refresh (0 = RPC default page).
    pub signature_limit: usize,

    /// Commit policy for partially failed history refreshes.
    pub detail_commit: DetailCommit,

    /// Reset balance and history when the wallet disconnects.
    pub clear_on_disconnect: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrent_details: 8,
            signature_limit: 0,
            detail_commit: DetailCommit::AllOrNothing,
            clear_on_disconnect: false,
        }
    }
}

impl SyncConfig {
    /// Signature page size to request, if any.
    pub fn signature_limit(&self) -> Option<usize> {
        (self.signature_limit > 0).then_some(self.signature_limit)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
