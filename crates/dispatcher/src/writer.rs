//! BulkWriter - the output work a sink worker performs for each bulk

use contracts::{Bulk, ContractError};

/// Per-worker output stage
///
/// Each worker thread owns exactly one writer, so implementations need no
/// internal synchronisation.
pub trait BulkWriter: Send + 'static {
    /// Worker name, reported in stats (`log`, `file1`, ...)
    fn name(&self) -> &str;

    /// Produce the output for one bulk
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, bulk: &Bulk) -> Result<(), ContractError>;

    /// Flush buffered output (called once when the worker stops)
    fn flush(&mut self) -> Result<(), ContractError> {
        Ok(())
    }
}
