#![forbid(unsafe_code)]

//! termreel public facade crate.
//!
//! Re-exports the pieces needed to compile a markup corpus and play it, plus
//! a top-level [`Error`] that any stage can convert into.
//!
//! ```no_run
//! use reel::prelude::*;
//!
//! let corpus = vec![vec!["<color>hello</color>".to_string()]];
//! let animation = Animation::compile(&corpus, AnsiColor::Blue.sgr(), DEFAULT_CANVAS)?;
//! Player::new(PlayerConfig::default()).run(animation)?;
//! # Ok::<(), reel::Error>(())
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use reel_core::event::{Event, KeyCode, KeyEvent, KeyEventKind, Modifiers};
pub use reel_core::geometry::Size;
pub use reel_core::terminal_session::{SessionOptions, TerminalSession};

// --- Render re-exports -----------------------------------------------------

pub use reel_render::ansi::{AnsiColor, UnknownColor};
pub use reel_render::compiler::{
    Animation, CompileError, CompiledFrame, CompiledLine, DEFAULT_CANVAS,
};
pub use reel_render::layout::{Layout, compute_layout};
pub use reel_render::markup::{TextSpan, parse_line};
pub use reel_render::output::{FrameWriter, OutputBuffer};

// --- Runtime re-exports ----------------------------------------------------

#[cfg(feature = "runtime")]
pub use reel_runtime::{
    PlaybackScheduler, PlaybackSummary, Player, PlayerConfig, PlayerError, SchedulerConfig,
    StopReason, Tick,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for termreel.
#[derive(Debug)]
pub enum Error {
    /// The corpus could not be compiled.
    Compile(CompileError),
    /// Playback failed.
    #[cfg(feature = "runtime")]
    Player(PlayerError),
    /// Other I/O failure.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile(err) => write!(f, "{err}"),
            #[cfg(feature = "runtime")]
            Self::Player(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Compile(err) => Some(err),
            #[cfg(feature = "runtime")]
            Self::Player(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<CompileError> for Error {
    fn from(err: CompileError) -> Self {
        Self::Compile(err)
    }
}

#[cfg(feature = "runtime")]
impl From<PlayerError> for Error {
    fn from(err: PlayerError) -> Self {
        Self::Player(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

/// Standard result type for termreel APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Animation, AnsiColor, DEFAULT_CANVAS, Error, Event, Result, SessionOptions, Size,
    };

    #[cfg(feature = "runtime")]
    pub use crate::{PlaybackScheduler, Player, PlayerConfig, SchedulerConfig};

    pub use crate::{core, render};
    #[cfg(feature = "runtime")]
    pub use crate::runtime;
}

pub use reel_core as core;
pub use reel_render as render;
#[cfg(feature = "runtime")]
pub use reel_runtime as runtime;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_converts() {
        let empty: Vec<Vec<String>> = Vec::new();
        let err: Error = Animation::compile(&empty, AnsiColor::Blue.sgr(), DEFAULT_CANVAS)
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Compile(CompileError::EmptyCorpus)));
        assert_eq!(err.to_string(), "animation corpus contains no frames");
    }

    #[test]
    fn io_error_converts() {
        let err: Error = std::io::Error::other("boom").into();
        assert_eq!(err.to_string(), "boom");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[cfg(feature = "runtime")]
    #[test]
    fn player_error_converts() {
        let err: Error =
            PlayerError::Sink(std::io::Error::from(std::io::ErrorKind::BrokenPipe)).into();
        assert!(matches!(err, Error::Player(PlayerError::Sink(_))));
    }
}
