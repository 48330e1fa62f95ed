#![forbid(unsafe_code)]

//! Render pipeline for frame animations.
//!
//! # Role in termreel
//! `reel-render` owns everything between the raw markup corpus and the bytes
//! that reach the terminal:
//!
//! - [`markup`] splits a `<color>`-annotated line into [`TextSpan`]s.
//! - [`compiler`] turns the whole corpus into an immutable [`Animation`] with
//!   every line pre-resolved to escape sequences.
//! - [`layout`] centers the fixed canvas in the current viewport.
//! - [`output`] batches clear, padding, and line writes into one sink write
//!   per frame.
//!
//! Nothing here knows about time; the scheduler in `reel-runtime` decides
//! *when* a frame is written.

pub mod ansi;
pub mod compiler;
pub mod counting_writer;
pub mod layout;
pub mod markup;
pub mod output;

pub use ansi::AnsiColor;
pub use compiler::{Animation, CompileError, CompiledFrame, CompiledLine, DEFAULT_CANVAS};
pub use counting_writer::{CountingWriter, WriteStats};
pub use layout::{Layout, LayoutCache, compute_layout};
pub use markup::{TextSpan, parse_line};
pub use output::{FrameWriter, OutputBuffer, PaddingCache};
