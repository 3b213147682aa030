//! Pipeline metrics
//!
//! Thin wrappers over the `metrics` facade. They are no-ops until a recorder
//! is installed (see [`crate::init_metrics_only`]).

use metrics::{counter, gauge, histogram};

/// Record one input line
pub fn record_line_received(control: bool) {
    let kind = if control { "control" } else { "command" };
    counter!("bulk_lines_total", "kind" => kind).increment(1);
}

/// Record a bulk leaving the batcher
pub fn record_bulk_emitted(commands: usize) {
    counter!("bulk_bulks_emitted_total").increment(1);
    counter!("bulk_commands_total").increment(commands as u64);
    histogram!("bulk_size_commands").record(commands as f64);
}

/// Record commands lost to an unterminated block
pub fn record_commands_discarded(commands: usize) {
    counter!("bulk_commands_discarded_total").increment(commands as u64);
}

/// Record a bulk processed by a sink worker
pub fn record_bulk_written(sink_name: &str, worker: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "bulk_bulks_written_total",
        "sink" => sink_name.to_string(),
        "worker" => worker.to_string(),
        "status" => status
    )
    .increment(1);
}

/// Record a bulk refused by a stopped sink
pub fn record_bulk_rejected(sink_name: &str) {
    counter!("bulk_bulks_rejected_total", "sink" => sink_name.to_string()).increment(1);
}

/// Record the current depth of a sink queue
pub fn record_queue_depth(sink_name: &str, depth: usize) {
    gauge!("bulk_queue_depth", "sink" => sink_name.to_string()).set(depth as f64);
}
