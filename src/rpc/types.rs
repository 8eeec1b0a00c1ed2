//! Account identifiers, wire types and error definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Length in bytes of a decoded account address.
pub const ADDRESS_LEN: usize = 32;

/// Errors that can occur while querying the RPC endpoint.
///
/// Every variant is a flavour of "fetch failed"; the sync layer does not
/// branch on them, it only carries the message into the display state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RpcError {
    /// Connection, DNS or body read failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Endpoint answered with a non-success HTTP status.
    #[error("HTTP status {0}")]
    Status(u16),

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Response body did not match the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Request exceeded the configured deadline.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction lookup returned null.
    #[error("Transaction not found: {0}")]
    NotFound(String),

    /// Address is not a base58 encoded 32-byte key.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
}

/// Result type for RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;

/// Public identifier of an account, validated as base58 of a 32-byte key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = RpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match bs58::decode(trimmed).into_vec() {
            Ok(bytes) if bytes.len() == ADDRESS_LEN => Ok(Self(trimmed.to_string())),
            _ => Err(RpcError::InvalidAddress(s.to_string())),
        }
    }
}

impl TryFrom<String> for Address {
    type Error = RpcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a `getSignaturesForAddress` page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureInfo {
    pub signature: String,
    #[serde(default)]
    pub slot: u64,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub block_time: Option<i64>,
    #[serde(default)]
    pub confirmation_status: Option<String>,
}

/// The subset of a `jsonParsed` transaction the dashboard reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTransaction {
    pub slot: u64,
    #[serde(default)]
    pub block_time: Option<i64>,
    pub transaction: TransactionBody,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionBody {
    #[serde(default)]
    pub signatures: Vec<String>,
}

/// A resolved history entry, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub signature: String,
    pub slot: u64,
    pub block_time: Option<i64>,
}

impl TransactionRecord {
    /// Build a record from a parsed transaction.
    ///
    /// The first signature of the transaction identifies it; `requested`
    /// is used when the node returns none.
    pub fn from_parsed(requested: &str, tx: ParsedTransaction) -> Self {
        let signature = tx
            .transaction
            .signatures
            .into_iter()
            .next()
            .unwrap_or_else(|| requested.to_string());
        Self {
            signature,
            slot: tx.slot,
            block_time: tx.block_time,
        }
    }
}
