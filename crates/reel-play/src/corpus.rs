#![forbid(unsafe_code)]

//! Corpus loading.
//!
//! A corpus file is a JSON array of frames, each an array of line strings:
//!
//! ```json
//! [
//!   ["....", ".<color>##</color>."],
//!   ["....", "..<color>##</color>"]
//! ]
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::error::Category;

/// Raw corpus: frames of markup lines.
pub type RawCorpus = Vec<Vec<String>>;

/// Errors raised while reading a corpus file.
#[derive(Debug)]
pub enum CorpusError {
    /// The file could not be read.
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// The file is not valid JSON.
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// Valid JSON, but not an array of arrays of strings.
    Shape {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
}

impl fmt::Display for CorpusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read corpus {}: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "corpus {} is not valid JSON: {source}", path.display())
            }
            Self::Shape { path, source } => write!(
                f,
                "corpus {} must be an array of frames, each an array of strings: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for CorpusError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } | Self::Shape { source, .. } => Some(source),
        }
    }
}

/// Read and decode the corpus at `path`.
///
/// An empty array decodes fine; compilation rejects it.
///
/// # Errors
///
/// [`CorpusError`] if the file cannot be read or decoded.
pub fn load(path: &Path) -> Result<RawCorpus, CorpusError> {
    let text = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let corpus = parse(&text).map_err(|source| {
        let path = path.to_path_buf();
        match source.classify() {
            Category::Data => CorpusError::Shape { path, source },
            _ => CorpusError::Json { path, source },
        }
    })?;
    tracing::debug!(path = %path.display(), frames = corpus.len(), "corpus loaded");
    Ok(corpus)
}

/// Decode a corpus from JSON text.
///
/// # Errors
///
/// Returns the decoder's error for malformed or mis-shaped input.
pub fn parse(text: &str) -> Result<RawCorpus, serde_json::Error> {
    serde_json::from_str(text)
}
