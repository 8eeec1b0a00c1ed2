//! Display surface.
//!
//! Turns a `DisplayState` snapshot into the text the CLI prints. Balance is
//! shown with two decimals, block times in local time.

pub mod render;

pub use render::{format_balance, format_block_time, format_record, render_dashboard};
