//! Batcher - turns a command stream into bulks

use contracts::{BatchingConfig, Bulk, ContractError, Token, UnterminatedBlockPolicy};
use observability::metrics::{record_bulk_emitted, record_commands_discarded};
use tracing::{debug, instrument, trace, warn};

use crate::state::{BatcherState, Transition};

/// Outcome of [`Batcher::finish`]
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EndOfStream {
    /// Final bulk, if anything was pending
    pub bulk: Option<Bulk>,
    /// Commands dropped because a `{` block was never closed
    pub discarded: usize,
}

/// Command batching state machine
///
/// Consumes one line at a time and yields at most one bulk per line.
/// Empty bulks are never yielded.
#[derive(Debug)]
pub struct Batcher {
    threshold: usize,
    policy: UnterminatedBlockPolicy,
    state: BatcherState,
}

impl Batcher {
    /// Create a batcher from configuration
    ///
    /// # Errors
    /// `ContractError::ConfigValidation` if the threshold is zero
    pub fn new(config: BatchingConfig) -> Result<Self, ContractError> {
        if config.threshold == 0 {
            return Err(ContractError::config_validation(
                "batching.threshold",
                "must be a positive integer",
            ));
        }
        Ok(Self {
            threshold: config.threshold,
            policy: config.unterminated_block,
            state: BatcherState::default(),
        })
    }

    /// Create a batcher with the default end-of-stream policy
    pub fn with_threshold(threshold: usize) -> Result<Self, ContractError> {
        Self::new(BatchingConfig {
            threshold,
            unterminated_block: UnterminatedBlockPolicy::default(),
        })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn state(&self) -> &BatcherState {
        &self.state
    }

    /// Feed one input line
    pub fn push(&mut self, line: &str) -> Option<Bulk> {
        let token = Token::classify(line);
        let Transition {
            next,
            emitted,
            stray_close,
        } = std::mem::take(&mut self.state).next(token, self.threshold);
        self.state = next;

        if stray_close {
            warn!("Unmatched '}}' outside of a block, ignored");
        }
        trace!(?token, dynamic = self.state.is_dynamic(), "Token consumed");

        emitted.and_then(Self::seal)
    }

    /// Signal end of stream
    ///
    /// Flushes a pending sized buffer. A dynamic block that was never closed is
    /// handled according to the configured [`UnterminatedBlockPolicy`].
    /// The batcher is back in its initial state afterwards.
    #[instrument(name = "batcher_finish", skip(self), fields(policy = ?self.policy))]
    pub fn finish(&mut self) -> EndOfStream {
        match std::mem::take(&mut self.state) {
            BatcherState::Sized { buffer } => EndOfStream {
                bulk: Self::seal(buffer),
                discarded: 0,
            },
            BatcherState::Dynamic { buffer, depth } => match self.policy {
                UnterminatedBlockPolicy::Flush => {
                    debug!(
                        commands = buffer.len(),
                        depth, "Flushing unterminated block"
                    );
                    EndOfStream {
                        bulk: Self::seal(buffer),
                        discarded: 0,
                    }
                }
                UnterminatedBlockPolicy::Discard => {
                    if !buffer.is_empty() {
                        warn!(
                            commands = buffer.len(),
                            depth, "Stream ended inside a block, buffered commands discarded"
                        );
                        record_commands_discarded(buffer.len());
                    }
                    EndOfStream {
                        bulk: None,
                        discarded: buffer.len(),
                    }
                }
            },
        }
    }

    fn seal(commands: Vec<String>) -> Option<Bulk> {
        if commands.is_empty() {
            return None;
        }
        record_bulk_emitted(commands.len());
        debug!(commands = commands.len(), "Bulk emitted");
        Some(Bulk::new(commands))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run a whole stream through a fresh batcher, end-of-stream included
    fn run(threshold: usize, input: &[&str]) -> Vec<Vec<String>> {
        let mut batcher = Batcher::with_threshold(threshold).unwrap();
        let mut out: Vec<Vec<String>> = input
            .iter()
            .filter_map(|line| batcher.push(line))
            .map(|b| b.commands().to_vec())
            .collect();
        if let Some(bulk) = batcher.finish().bulk {
            out.push(bulk.commands().to_vec());
        }
        out
    }

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zero_threshold_rejected() {
        let err = Batcher::with_threshold(0).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_sized_batching_counts() {
        for threshold in 1..=5 {
            for m in 0..=12usize {
                let input: Vec<String> = (0..m).map(|i| format!("cmd{i}")).collect();
                let refs: Vec<&str> = input.iter().map(String::as_str).collect();
                let bulks = run(threshold, &refs);

                assert_eq!(bulks.len(), m.div_ceil(threshold), "k={threshold} m={m}");
                for bulk in bulks.iter().take(bulks.len().saturating_sub(1)) {
                    assert_eq!(bulk.len(), threshold);
                }
                assert_eq!(bulks.concat(), input);
            }
        }
    }

    #[test]
    fn test_dynamic_block_capture() {
        let bulks = run(3, &["a", "{", "b", "c", "d", "}"]);
        assert_eq!(bulks, vec![strs(&["a"]), strs(&["b", "c", "d"])]);
    }

    #[test]
    fn test_dynamic_block_longer_than_threshold() {
        let bulks = run(2, &["{", "a", "b", "c", "d", "e", "}", "f"]);
        assert_eq!(bulks, vec![strs(&["a", "b", "c", "d", "e"]), strs(&["f"])]);
    }

    #[test]
    fn test_nested_braces() {
        for threshold in 1..=4 {
            let bulks = run(threshold, &["{", "{", "x", "}", "y", "}"]);
            assert_eq!(bulks, vec![strs(&["x", "y"])]);
        }
    }

    #[test]
    fn test_end_of_stream_flush() {
        assert_eq!(run(3, &["p", "q"]), vec![strs(&["p", "q"])]);
    }

    #[test]
    fn test_empty_block_emits_nothing() {
        assert!(run(3, &["{", "}"]).is_empty());
        assert!(run(3, &[]).is_empty());
    }

    #[test]
    fn test_unterminated_block_discarded_by_default() {
        let mut batcher = Batcher::with_threshold(3).unwrap();
        assert!(batcher.push("a").is_none());
        assert_eq!(batcher.push("{").unwrap().commands(), ["a"]);
        batcher.push("b");
        batcher.push("c");

        let end = batcher.finish();
        assert_eq!(end.bulk, None);
        assert_eq!(end.discarded, 2);
        assert_eq!(batcher.state(), &BatcherState::default());
    }

    #[test]
    fn test_unterminated_block_flush_policy() {
        let mut batcher = Batcher::new(BatchingConfig {
            threshold: 3,
            unterminated_block: UnterminatedBlockPolicy::Flush,
        })
        .unwrap();
        for line in ["{", "b", "{", "c"] {
            assert!(batcher.push(line).is_none());
        }
        let end = batcher.finish();
        assert_eq!(end.bulk.unwrap().commands(), ["b", "c"]);
        assert_eq!(end.discarded, 0);
    }

    #[test]
    fn test_stray_close_never_reaches_bulk() {
        assert_eq!(run(2, &["a", "}", "b"]), vec![strs(&["a", "b"])]);
    }

    #[test]
    fn test_consecutive_blocks() {
        let bulks = run(5, &["{", "a", "}", "{", "b", "}", "c"]);
        assert_eq!(bulks, vec![strs(&["a"]), strs(&["b"]), strs(&["c"])]);
    }
}
