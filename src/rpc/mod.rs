//! RPC capability subsystem.
//!
//! # Data Flow
//! ```text
//! Address (base58, validated in types.rs)
//!     → client.rs (JSON-RPC request, optional deadline)
//!     → types.rs (wire types → TransactionRecord)
//!     → sync (balance / history commits)
//! ```
//!
//! # Design Decisions
//! - `RpcClient` is a trait so the sync engine never depends on HTTP
//! - One endpoint, no failover, no retries
//! - No deadline unless configured

pub mod client;
pub mod types;

pub use client::{HttpRpcClient, RpcClient};
pub use types::{
    Address, ParsedTransaction, RpcError, RpcResult, SignatureInfo, TransactionBody,
    TransactionRecord,
};
