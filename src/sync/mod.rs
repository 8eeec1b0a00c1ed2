//! Account sync subsystem.
//!
//! # Data Flow
//! ```text
//! WalletSession change (wallet::SessionWatcher)
//!     → engine.rs (issue generation, mark cells syncing)
//!     → balance:  getBalance → Balance
//!     → history:  getSignaturesForAddress → fanout.rs (bounded lookups)
//!     → engine.rs commit (only if generation is still latest)
//!     → state.rs DisplayState (lock-free snapshots for readers)
//! ```
//!
//! # Design Decisions
//! - Balance and history refresh independently; either may fail alone
//! - Failures keep the last good value and are tagged on the cell
//! - In-flight refreshes are never cancelled; stale results are dropped
//! - Disconnecting keeps the last values unless configured otherwise

pub mod engine;
pub mod fanout;
pub mod generation;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{AccountSync, FetchOutcome, HistoryOutcome, RefreshOutcome};
pub use fanout::{DetailBatch, DetailFailure};
pub use state::{Balance, DisplayState, SyncCell, SyncStatus, LAMPORTS_PER_SOL};
