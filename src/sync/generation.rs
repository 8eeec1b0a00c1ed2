//! Monotonic generation tokens for stale-write protection.

use std::sync::atomic::{AtomicU64, Ordering};

/// Issues a new token per trigger; only the latest token may commit.
#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: AtomicU64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token, invalidating all earlier ones.
    pub fn advance(&self) -> u64 {
        self.current.fetch_add(1, Ordering::AcqRel) + 1
    }

    pub fn current(&self) -> u64 {
        self.current.load(Ordering::Acquire)
    }

    pub fn is_current(&self, token: u64) -> bool {
        self.current() == token
    }
}
