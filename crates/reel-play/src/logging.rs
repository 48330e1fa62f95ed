#![forbid(unsafe_code)]

//! Log subscriber setup.
//!
//! The terminal is busy showing the animation, so logs only ever go to a
//! file. Without a file no subscriber is installed and every `tracing`
//! call in the workspace stays a no-op.

use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Install a plain-text `fmt` subscriber appending to `path`.
///
/// An unparsable `filter` falls back to `info`. Returns `Ok(false)` if a
/// global subscriber was already set.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened.
pub fn init(path: &Path, filter: &str) -> io::Result<bool> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok();
    Ok(installed)
}
