//! Connection gate.
//!
//! The wallet capability owns a `WalletHandle` and publishes
//! `(connected, address)`; account sync holds a `SessionWatcher` and is
//! notified on every change. Identical sessions are not re-published.

pub mod session;

pub use session::{SessionWatcher, WalletHandle, WalletSession};
