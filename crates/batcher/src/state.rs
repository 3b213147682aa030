//! Batcher state and its pure transition function.

use contracts::{Command, Token};

/// Current batching mode together with the commands collected so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatcherState {
    /// Fixed-size batching
    Sized { buffer: Vec<Command> },
    /// Inside a `{ ... }` block; `depth` counts nested `{` still open
    Dynamic { buffer: Vec<Command>, depth: usize },
}

impl Default for BatcherState {
    fn default() -> Self {
        Self::Sized { buffer: Vec::new() }
    }
}

/// Result of feeding one token
#[derive(Debug, PartialEq, Eq)]
pub struct Transition {
    /// State after the token
    pub next: BatcherState,
    /// Commands to emit as a bulk (possibly empty)
    pub emitted: Option<Vec<Command>>,
    /// The token was a `}` with no block open and got ignored
    pub stray_close: bool,
}

impl Transition {
    fn stay(next: BatcherState) -> Self {
        Self {
            next,
            emitted: None,
            stray_close: false,
        }
    }

    fn emit(next: BatcherState, emitted: Vec<Command>) -> Self {
        Self {
            next,
            emitted: Some(emitted),
            stray_close: false,
        }
    }
}

impl BatcherState {
    /// Apply one token. `threshold` only matters in sized mode.
    pub fn next(self, token: Token<'_>, threshold: usize) -> Transition {
        match (self, token) {
            (Self::Sized { buffer }, Token::Open) => Transition::emit(
                Self::Dynamic {
                    buffer: Vec::new(),
                    depth: 0,
                },
                buffer,
            ),
            (state @ Self::Sized { .. }, Token::Close) => Transition {
                next: state,
                emitted: None,
                stray_close: true,
            },
            (Self::Sized { mut buffer }, Token::Command(cmd)) => {
                buffer.push(cmd.to_string());
                if buffer.len() >= threshold {
                    Transition::emit(Self::Sized { buffer: Vec::new() }, buffer)
                } else {
                    Transition::stay(Self::Sized { buffer })
                }
            }
            (Self::Dynamic { buffer, depth }, Token::Open) => Transition::stay(Self::Dynamic {
                buffer,
                depth: depth + 1,
            }),
            (Self::Dynamic { buffer, depth: 0 }, Token::Close) => {
                Transition::emit(Self::Sized { buffer: Vec::new() }, buffer)
            }
            (Self::Dynamic { buffer, depth }, Token::Close) => Transition::stay(Self::Dynamic {
                buffer,
                depth: depth - 1,
            }),
            (Self::Dynamic { mut buffer, depth }, Token::Command(cmd)) => {
                buffer.push(cmd.to_string());
                Transition::stay(Self::Dynamic { buffer, depth })
            }
        }
    }

    /// Commands buffered but not yet emitted
    pub fn pending(&self) -> &[Command] {
        match self {
            Self::Sized { buffer } | Self::Dynamic { buffer, .. } => buffer,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic { .. })
    }
}
