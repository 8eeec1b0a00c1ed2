//! Solana account sync library.
//!
//! Keeps an account's balance and recent transaction history in step with a
//! wallet connection, reading from a JSON-RPC endpoint.

pub mod config;
pub mod display;
pub mod lifecycle;
pub mod observability;
pub mod rpc;
pub mod sync;
pub mod wallet;

pub use config::DashboardConfig;
pub use lifecycle::Shutdown;
pub use rpc::{Address, HttpRpcClient, RpcClient};
pub use sync::AccountSync;
pub use wallet::{WalletHandle, WalletSession};
