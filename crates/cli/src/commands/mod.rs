//! Command implementations.

mod run;

pub use run::{resolve_config, run_pipeline};
