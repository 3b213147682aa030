//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the bulk pipeline.
//! Business crates depend on this crate only; reverse dependencies are prohibited.
//!
//! ## Data Model
//! - `Command`: one opaque line of input, `"{"` and `"}"` are control tokens
//! - `Bulk`: an immutable, ordered batch of commands handed to every sink
//! - `SinkStat`: per-sink (or per-worker) counters, final once workers are joined

mod bulk;
mod config;
mod error;
mod sink;
mod stat;

pub use bulk::*;
pub use config::*;
pub use error::*;
pub use sink::*;
pub use stat::*;
