//! # Batcher
//!
//! Command batching state machine.
//!
//! Responsibilities:
//! - Sized mode: close a bulk every `threshold` commands
//! - Dynamic mode: `{ ... }` blocks of arbitrary size, nested braces allowed
//! - End-of-stream flush, with an explicit policy for unterminated blocks
//!
//! ## Example
//!
//! ```
//! use batcher::Batcher;
//!
//! let mut batcher = Batcher::with_threshold(2).unwrap();
//! assert!(batcher.push("a").is_none());
//! let bulk = batcher.push("b").unwrap();
//! assert_eq!(bulk.commands(), ["a", "b"]);
//! assert!(batcher.finish().bulk.is_none());
//! ```

mod engine;
mod state;

pub use contracts::{BatchingConfig, Bulk, Command, UnterminatedBlockPolicy};
pub use engine::{Batcher, EndOfStream};
pub use state::{BatcherState, Transition};
