#![forbid(unsafe_code)]

//! Runtime errors.

use std::fmt;
use std::io;

/// Errors that end playback.
#[derive(Debug)]
pub enum PlayerError {
    /// The terminal could not be set up or read from.
    Terminal(io::Error),
    /// Writing a frame or the final flush failed.
    Sink(io::Error),
}

impl fmt::Display for PlayerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(e) => write!(f, "terminal error: {e}"),
            Self::Sink(e) => write!(f, "output error: {e}"),
        }
    }
}

impl std::error::Error for PlayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Terminal(e) | Self::Sink(e) => Some(e),
        }
    }
}
