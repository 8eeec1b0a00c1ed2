//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     broadcast → AccountSync::run exits → CLI prints last state
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
