//! Sink implementations
//!
//! Contains StatSink, ConsoleSink, and FileSink.

mod console;
mod file;
mod stat;

pub use self::console::{ConsoleSink, ConsoleWriter};
pub use self::file::{FileSink, FileWriter};
pub use self::stat::StatSink;
