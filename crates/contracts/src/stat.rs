//! SinkStat - counters reported by every sink at shutdown

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::Bulk;

/// Cumulative statistics for one sink, or one worker of a multi-worker sink
///
/// Owned by a single writer (the worker thread, or the synchronous sink) and
/// only read once that writer is done.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SinkStat {
    /// Sink or worker name (`main`, `log`, `file1`, ...)
    pub name: String,

    /// Bulks successfully processed
    pub bulk_count: u64,

    /// Commands contained in those bulks
    pub command_count: u64,

    /// Bulks whose output failed
    #[serde(default, skip_serializing_if = "is_zero")]
    pub failed_bulks: u64,

    /// Raw input lines observed, control tokens included (synchronous sink only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_count: Option<u64>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl SinkStat {
    /// Create zeroed stats
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Count a processed bulk
    pub fn record(&mut self, bulk: &Bulk) {
        self.bulk_count += 1;
        self.command_count += bulk.len() as u64;
    }

    /// Count a bulk whose output failed
    pub fn record_failure(&mut self) {
        self.failed_bulks += 1;
    }
}

impl fmt::Display for SinkStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} thread - ", self.name)?;
        if let Some(lines) = self.line_count {
            write!(f, "{lines} lines, ")?;
        }
        write!(f, "{} bulks, {} commands", self.bulk_count, self.command_count)?;
        if self.failed_bulks > 0 {
            write!(f, ", {} failed", self.failed_bulks)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_bulks_and_commands() {
        let mut stat = SinkStat::new("log");
        stat.record(&Bulk::new(vec!["a".into(), "b".into()]));
        stat.record(&Bulk::new(vec!["c".into()]));
        assert_eq!(stat.bulk_count, 2);
        assert_eq!(stat.command_count, 3);
        assert_eq!(stat.to_string(), "log thread - 2 bulks, 3 commands");
    }

    #[test]
    fn test_display_with_lines_and_failures() {
        let stat = SinkStat {
            name: "main".to_string(),
            bulk_count: 1,
            command_count: 2,
            failed_bulks: 1,
            line_count: Some(4),
        };
        assert_eq!(
            stat.to_string(),
            "main thread - 4 lines, 1 bulks, 2 commands, 1 failed"
        );
    }

    #[test]
    fn test_json_omits_empty_fields() {
        let json = serde_json::to_string(&SinkStat::new("file1")).unwrap();
        assert_eq!(json, r#"{"name":"file1","bulk_count":0,"command_count":0}"#);
    }
}
