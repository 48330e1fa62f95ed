#![forbid(unsafe_code)]

//! reel-play: command-line front end for the termreel player.
//!
//! Split from `main.rs` so argument parsing, corpus loading, and the demo
//! corpus can be tested without a terminal.

pub mod cli;
pub mod corpus;
pub mod demo;
pub mod logging;

use std::fmt;

use reel_render::compiler::{Animation, CompileError};

use crate::cli::Opts;
use crate::corpus::CorpusError;

/// Errors raised before playback starts.
#[derive(Debug)]
pub enum SetupError {
    /// The corpus file could not be loaded.
    Corpus(CorpusError),
    /// The corpus could not be compiled.
    Compile(CompileError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corpus(e) => write!(f, "{e}"),
            Self::Compile(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Corpus(e) => Some(e),
            Self::Compile(e) => Some(e),
        }
    }
}

impl From<CorpusError> for SetupError {
    fn from(err: CorpusError) -> Self {
        Self::Corpus(err)
    }
}

impl From<CompileError> for SetupError {
    fn from(err: CompileError) -> Self {
        Self::Compile(err)
    }
}

/// Load the corpus named by `opts` (or the demo) and compile it.
///
/// # Errors
///
/// [`SetupError`] if loading or compiling fails.
pub fn build_animation(opts: &Opts) -> Result<Animation, SetupError> {
    let raw = match &opts.frames {
        Some(path) => corpus::load(path)?,
        None => demo::corpus(),
    };
    let animation = Animation::compile(&raw, opts.color.sgr(), opts.canvas)?;
    let source = opts
        .frames
        .as_ref()
        .map_or_else(|| "demo".to_string(), |p| p.display().to_string());
    tracing::info!(
        frames = animation.frame_count(),
        canvas = %animation.canvas(),
        color = %opts.color,
        source = %source,
        "animation ready"
    );
    Ok(animation)
}
