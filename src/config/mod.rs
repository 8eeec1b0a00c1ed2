//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → DashboardConfig (validated, immutable)
//!     → CLI overrides (--url, --cluster)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; no file means devnet with no deadline
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    Cluster, Commitment, DashboardConfig, DetailCommit, ObservabilityConfig, RpcConfig,
    SyncConfig,
};
