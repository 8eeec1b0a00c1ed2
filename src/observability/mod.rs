//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! sync / rpc produce:
//!     → logging.rs (structured tracing events on stderr)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → terminal / log aggregation
//!     → Prometheus scrape (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_tracing;
