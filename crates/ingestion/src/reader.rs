//! CommandReader - line source for the batcher

use std::io::{self, BufRead, StdinLock};

use contracts::{Command, Token};
use observability::record_line_received;
use tracing::{debug, trace};

use crate::error::{IngestionError, Result};

/// Reads commands, one per line, from a buffered source
///
/// Yields lines in order until end of stream. Line terminators (`\n` or
/// `\r\n`) are stripped; nothing else is trimmed, so `" {"` is an ordinary
/// command.
pub struct CommandReader<R> {
    source: R,
    lines_read: u64,
    finished: bool,
}

impl CommandReader<StdinLock<'static>> {
    /// Reader over the process standard input
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> CommandReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            lines_read: 0,
            finished: false,
        }
    }

    /// Number of lines yielded so far
    pub fn lines_read(&self) -> u64 {
        self.lines_read
    }

    fn read_command(&mut self) -> Result<Option<Command>> {
        let mut line = String::new();
        let read = self
            .source
            .read_line(&mut line)
            .map_err(|source| IngestionError::Read {
                line: self.lines_read + 1,
                source,
            })?;
        if read == 0 {
            return Ok(None);
        }

        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.lines_read += 1;
        record_line_received(Token::classify(&line).is_control());
        trace!(line = self.lines_read, command = %line, "Line read");
        Ok(Some(line))
    }
}

impl<R: BufRead> Iterator for CommandReader<R> {
    type Item = Result<Command>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_command() {
            Ok(Some(command)) => Some(Ok(command)),
            Ok(None) => {
                self.finished = true;
                debug!(lines = self.lines_read, "End of command stream");
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
