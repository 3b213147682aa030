//! Command & Bulk - the units flowing from the batcher to the sinks

use std::fmt;
use std::sync::Arc;

/// One line of input
pub type Command = String;

/// Token opening a dynamic block
pub const BLOCK_OPEN: &str = "{";

/// Token closing a dynamic block
pub const BLOCK_CLOSE: &str = "}";

/// Classification of an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// `"{"`
    Open,
    /// `"}"`
    Close,
    /// Anything else
    Command(&'a str),
}

impl<'a> Token<'a> {
    /// Classify a line. Control tokens match exactly, no trimming.
    pub fn classify(line: &'a str) -> Self {
        match line {
            BLOCK_OPEN => Token::Open,
            BLOCK_CLOSE => Token::Close,
            other => Token::Command(other),
        }
    }

    /// Whether this is one of the two control tokens
    pub fn is_control(&self) -> bool {
        !matches!(self, Token::Command(_))
    }
}

/// A completed, ordered batch of commands
///
/// Immutable once built. Cloning shares the underlying storage, so fanning a
/// bulk out to several sinks never copies the commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bulk {
    commands: Arc<[Command]>,
}

impl Bulk {
    /// Build a bulk from the commands collected by the batcher
    pub fn new(commands: Vec<Command>) -> Self {
        Self {
            commands: commands.into(),
        }
    }

    /// Commands in arrival order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Number of commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Command> {
        self.commands.iter()
    }
}

impl<'a> IntoIterator for &'a Bulk {
    type Item = &'a Command;
    type IntoIter = std::slice::Iter<'a, Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Vec<Command>> for Bulk {
    fn from(commands: Vec<Command>) -> Self {
        Self::new(commands)
    }
}

/// Renders the console line: `bulk: c1, c2, ..., cN`
impl fmt::Display for Bulk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bulk: {}", self.commands.join(", "))
    }
}
