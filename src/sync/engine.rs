//! Account sync engine.
//!
//! # Responsibilities
//! - React to wallet session changes
//! - Refresh balance and transaction history independently
//! - Commit results only when their generation is still the latest
//! - Surface failures as tagged status, keeping the last good value

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use tokio::sync::broadcast;

use crate::config::schema::{DetailCommit, SyncConfig};
use crate::observability::metrics;
use crate::rpc::RpcClient;
use crate::sync::fanout::{fetch_details, DetailFailure};
use crate::sync::generation::GenerationCounter;
use crate::sync::state::{Balance, DisplayState, SyncStatus};
use crate::wallet::{SessionWatcher, WalletSession};

const BALANCE: &str = "balance";
const HISTORY: &str = "history";

/// What happened to one refresh operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The session was not ready; no RPC call was made.
    Skipped,
    /// The result was written with the given status.
    Committed(SyncStatus),
    /// A newer generation was issued before this result arrived.
    Superseded,
}

/// Result of a history refresh, including per-signature failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryOutcome {
    pub outcome: FetchOutcome,
    pub failures: Vec<DetailFailure>,
}

impl HistoryOutcome {
    fn new(outcome: FetchOutcome) -> Self {
        Self {
            outcome,
            failures: Vec::new(),
        }
    }
}

/// Result of a combined balance + history refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshOutcome {
    /// Generation issued for this refresh, `None` when skipped.
    pub generation: Option<u64>,
    pub balance: FetchOutcome,
    pub history: HistoryOutcome,
}

struct Inner {
    client: Arc<dyn RpcClient>,
    config: SyncConfig,
    generation: GenerationCounter,
    state: ArcSwap<DisplayState>,
    /// Serializes generation check + write.
    commit_lock: Mutex<()>,
}

/// Keeps balance and transaction history in step with the connected wallet.
#[derive(Clone)]
pub struct AccountSync {
    inner: Arc<Inner>,
}

impl AccountSync {
    pub fn new(client: Arc<dyn RpcClient>, config: SyncConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                config,
                generation: GenerationCounter::new(),
                state: ArcSwap::from_pointee(DisplayState::default()),
                commit_lock: Mutex::new(()),
            }),
        }
    }

    /// Snapshot of the current display state.
    pub fn state(&self) -> Arc<DisplayState> {
        self.inner.state.load_full()
    }

    /// Latest generation issued.
    pub fn generation(&self) -> u64 {
        self.inner.generation.current()
    }

    /// Handle a session transition, launching both refreshes in the background.
    ///
    /// Returns the generation issued, or `None` when the session is not ready.
    pub fn on_session_change(&self, session: &WalletSession) -> Option<u64> {
        let generation = self.begin(session)?;

        let this = self.clone();
        let balance_session = session.clone();
        tokio::spawn(async move {
            this.refresh_balance(&balance_session, generation).await;
        });

        let this = self.clone();
        let history_session = session.clone();
        tokio::spawn(async move {
            this.refresh_history(&history_session, generation).await;
        });

        Some(generation)
    }

    /// Refresh balance and history and wait for both to settle.
    pub async fn refresh(&self, session: &WalletSession) -> RefreshOutcome {
        let Some(generation) = self.begin(session) else {
            return RefreshOutcome {
                generation: None,
                balance: FetchOutcome::Skipped,
                history: HistoryOutcome::new(FetchOutcome::Skipped),
            };
        };

        let (balance, history) = tokio::join!(
            self.refresh_balance(session, generation),
            self.refresh_history(session, generation),
        );

        RefreshOutcome {
            generation: Some(generation),
            balance,
            history,
        }
    }

    /// True once both cells hold the outcome of the latest generation.
    pub fn is_settled(&self) -> bool {
        let state = self.state();
        let generation = self.generation();
        state.balance.generation == generation
            && state.transactions.generation == generation
            && !state.is_syncing()
    }

    /// Issue a generation for `session` and mark the cells as syncing.
    ///
    /// Invalidates every refresh still in flight. Returns `None` when the
    /// session is not ready; values are kept unless `clear_on_disconnect`.
    pub fn begin(&self, session: &WalletSession) -> Option<u64> {
        let generation = self.inner.generation.advance();
        metrics::record_generation(generation);

        let Some(address) = session.ready_address() else {
            let clear = self.inner.config.clear_on_disconnect;
            self.commit(generation, "disconnect", |state| {
                if clear {
                    *state = DisplayState::default();
                }
                // Refreshes in flight were just invalidated
                state.balance.abandon(generation);
                state.transactions.abandon(generation);
                SyncStatus::Idle
            });
            tracing::debug!(generation, "Wallet not connected, skipping account sync");
            return None;
        };

        tracing::info!(address = %address, generation, "Syncing account");
        self.commit(generation, "begin", |state| {
            state.balance.begin(generation);
            state.transactions.begin(generation);
            SyncStatus::Syncing
        });
        Some(generation)
    }

    /// Fetch the balance and commit it under `generation`.
    pub async fn refresh_balance(&self, session: &WalletSession, generation: u64) -> FetchOutcome {
        let Some(address) = session.ready_address() else {
            return FetchOutcome::Skipped;
        };

        match self.inner.client.get_balance(address).await {
            Ok(lamports) => {
                metrics::record_fetch(BALANCE, "success");
                let balance = Balance::from_lamports(lamports);
                tracing::debug!(address = %address, lamports, sol = %balance, "Balance fetched");
                self.commit(generation, BALANCE, |state| state.balance.set(balance, generation))
            }
            Err(e) => {
                metrics::record_fetch(BALANCE, "failure");
                tracing::warn!(
                    address = %address,
                    error = %e,
                    "Error fetching balance, keeping previous value"
                );
                self.commit(generation, BALANCE, |state| {
                    state.balance.fail(e.to_string(), generation)
                })
            }
        }
    }

    /// Fetch the signature page, resolve details and commit under `generation`.
    pub async fn refresh_history(&self, session: &WalletSession, generation: u64) -> HistoryOutcome {
        let Some(address) = session.ready_address() else {
            return HistoryOutcome::new(FetchOutcome::Skipped);
        };

        let limit = self.inner.config.signature_limit();
        let signatures = match self
            .inner
            .client
            .get_signatures_for_address(address, limit)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                metrics::record_fetch(HISTORY, "failure");
                tracing::warn!(
                    address = %address,
                    error = %e,
                    "Error fetching transactions, keeping previous history"
                );
                let outcome = self.commit(generation, HISTORY, |state| {
                    state.transactions.fail(e.to_string(), generation)
                });
                return HistoryOutcome::new(outcome);
            }
        };

        let signatures: Vec<String> = signatures.into_iter().map(|s| s.signature).collect();
        metrics::record_detail_fanout(signatures.len());

        let batch = fetch_details(
            self.inner.client.as_ref(),
            signatures,
            self.inner.config.max_concurrent_details,
        )
        .await;

        if batch.is_complete() {
            metrics::record_fetch(HISTORY, "success");
            tracing::debug!(address = %address, count = batch.records.len(), "Transactions fetched");
            let outcome = self.commit(generation, HISTORY, |state| {
                state.transactions.set(batch.records, generation)
            });
            return HistoryOutcome::new(outcome);
        }

        let failed = batch.failures.len();
        let requested = batch.requested();
        let outcome = match self.inner.config.detail_commit {
            DetailCommit::AllOrNothing => {
                metrics::record_fetch(HISTORY, "failure");
                tracing::warn!(
                    address = %address,
                    failed,
                    requested,
                    "Error fetching transactions, keeping previous history"
                );
                let reason = format!("{failed} of {requested} transaction lookups failed");
                self.commit(generation, HISTORY, |state| {
                    state.transactions.fail(reason, generation)
                })
            }
            DetailCommit::Partial => {
                metrics::record_fetch(HISTORY, "partial");
                tracing::warn!(
                    address = %address,
                    failed,
                    requested,
                    "Some transaction lookups failed, committing the rest"
                );
                self.commit(generation, HISTORY, |state| {
                    state.transactions.set(batch.records, generation)
                })
            }
        };

        HistoryOutcome {
            outcome,
            failures: batch.failures,
        }
    }

    /// Apply `update` to a copy of the state if `generation` is still current.
    fn commit<F>(&self, generation: u64, op: &'static str, update: F) -> FetchOutcome
    where
        F: FnOnce(&mut DisplayState) -> SyncStatus,
    {
        let _guard = self
            .inner
            .commit_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !self.inner.generation.is_current(generation) {
            metrics::record_stale_commit(op);
            tracing::debug!(
                op,
                generation,
                latest = self.inner.generation.current(),
                "Dropping result of superseded refresh"
            );
            return FetchOutcome::Superseded;
        }

        let mut next = DisplayState::clone(&self.inner.state.load());
        let status = update(&mut next);
        self.inner.state.store(Arc::new(next));
        FetchOutcome::Committed(status)
    }

    /// Drive the engine from wallet session changes until shutdown.
    pub async fn run(self, mut sessions: SessionWatcher, mut shutdown: broadcast::Receiver<()>) {
        let mut last = sessions.current();
        self.on_session_change(&last);

        loop {
            tokio::select! {
                changed = sessions.changed() => {
                    let Some(session) = changed else {
                        tracing::info!("Wallet session closed, stopping account sync");
                        break;
                    };
                    if session == last {
                        continue;
                    }
                    self.on_session_change(&session);
                    last = session;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Account sync received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

impl std::fmt::Debug for AccountSync {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSync")
            .field("config", &self.inner.config)
            .field("generation", &self.inner.generation.current())
            .finish()
    }
}
