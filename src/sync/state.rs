//! Display state published by account sync.

use std::fmt;

use serde::Serialize;

use crate::rpc::TransactionRecord;

/// Lamports per native unit.
pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Account balance in lamports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub lamports: u64,
}

impl Balance {
    pub fn from_lamports(lamports: u64) -> Self {
        Self { lamports }
    }

    /// Balance in the native unit.
    pub fn sol(&self) -> f64 {
        self.lamports as f64 / LAMPORTS_PER_SOL as f64
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.sol())
    }
}

/// Last known outcome of a display cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncStatus {
    /// Nothing fetched for the current session yet.
    #[default]
    Idle,
    /// A refresh is in flight.
    Syncing,
    /// The value reflects the latest successful fetch.
    Synced,
    /// The latest fetch failed; the value is stale.
    Failed { reason: String },
}

/// A value plus the status and generation of the write that produced it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncCell<T> {
    pub value: T,
    pub status: SyncStatus,
    pub generation: u64,
}

impl<T> SyncCell<T> {
    pub(crate) fn set(&mut self, value: T, generation: u64) -> SyncStatus {
        self.value = value;
        self.status = SyncStatus::Synced;
        self.generation = generation;
        self.status.clone()
    }

    /// Record a failure, keeping the current value.
    pub(crate) fn fail(&mut self, reason: String, generation: u64) -> SyncStatus {
        self.status = SyncStatus::Failed { reason };
        self.generation = generation;
        self.status.clone()
    }

    pub(crate) fn begin(&mut self, generation: u64) {
        self.status = SyncStatus::Syncing;
        self.generation = generation;
    }

    /// Drop a `Syncing` status whose refresh will never commit and
    /// move the cell to `generation`.
    pub(crate) fn abandon(&mut self, generation: u64) {
        if self.status == SyncStatus::Syncing {
            self.status = SyncStatus::Idle;
        }
        self.generation = generation;
    }

    pub fn is_stale(&self) -> bool {
        matches!(self.status, SyncStatus::Failed { .. })
    }
}

/// Everything the dashboard shows for an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayState {
    pub balance: SyncCell<Balance>,
    pub transactions: SyncCell<Vec<TransactionRecord>>,
}

impl DisplayState {
    /// True while either refresh is still in flight.
    pub fn is_syncing(&self) -> bool {
        self.balance.status == SyncStatus::Syncing
            || self.transactions.status == SyncStatus::Syncing
    }
}
