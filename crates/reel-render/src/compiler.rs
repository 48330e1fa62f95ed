#![forbid(unsafe_code)]

//! Frame compiler: raw markup corpus → immutable [`Animation`].
//!
//! Compilation runs once at startup. Every line of every frame is parsed
//! into spans and materialized into its final byte form (highlight color and
//! reset already inlined), so the render loop only ever copies prepared
//! strings into the output buffer.
//!
//! ```
//! use reel_render::ansi::AnsiColor;
//! use reel_render::compiler::{Animation, DEFAULT_CANVAS};
//!
//! let corpus = vec![vec!["a<color>b</color>c".to_string()]];
//! let anim = Animation::compile(&corpus, AnsiColor::Blue.sgr(), DEFAULT_CANVAS)?;
//! assert_eq!(anim.frame(0).lines()[0].rendered(), "a\x1b[34mb\x1b[0mc");
//! # Ok::<(), reel_render::compiler::CompileError>(())
//! ```

use std::fmt;

use reel_core::geometry::Size;
use unicode_width::UnicodeWidthStr;

use crate::ansi::SGR_RESET;
use crate::markup::{self, Spans, TextSpan};

/// Dimensions of the stock artwork.
pub const DEFAULT_CANVAS: Size = Size::new(77, 41);

/// Errors raised while building an [`Animation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The corpus has no frames; playback would index modulo zero.
    EmptyCorpus,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCorpus => write!(f, "animation corpus contains no frames"),
        }
    }
}

impl std::error::Error for CompileError {}

/// One render-ready line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledLine {
    spans: Spans,
    rendered: String,
    width: usize,
}

impl CompiledLine {
    fn new(raw: &str, highlight: &str) -> Self {
        let spans = markup::parse_line(raw);
        let mut rendered = String::with_capacity(raw.len() + highlight.len() + SGR_RESET.len());
        let mut width = 0;
        for span in &spans {
            width += span.content.width();
            if span.highlighted {
                rendered.push_str(highlight);
                rendered.push_str(&span.content);
                rendered.push_str(SGR_RESET);
            } else {
                rendered.push_str(&span.content);
            }
        }
        Self {
            spans,
            rendered,
            width,
        }
    }

    /// Parsed spans, in order.
    pub fn spans(&self) -> &[TextSpan] {
        &self.spans
    }

    /// The line with highlight escapes inlined, ready to write.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// Visible width in terminal columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Visible characters without any escapes.
    pub fn plain_text(&self) -> String {
        markup::plain_text(&self.spans)
    }
}

/// One frame: its lines in top-to-bottom order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompiledFrame {
    lines: Vec<CompiledLine>,
}

impl CompiledFrame {
    /// Lines of this frame.
    pub fn lines(&self) -> &[CompiledLine] {
        &self.lines
    }

    /// The frame as one string, lines joined with `\n` (no trailing newline).
    pub fn materialize(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(line.rendered());
        }
        out
    }
}

/// The compiled animation: a non-empty frame list plus the canvas size.
///
/// Immutable after [`Animation::compile`]; the scheduler takes it by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<CompiledFrame>,
    canvas: Size,
}

impl Animation {
    /// Compile a raw corpus.
    ///
    /// `raw` is an ordered list of frames, each an ordered list of markup
    /// lines. `highlight` is the escape sequence placed before every
    /// highlighted span.
    ///
    /// # Errors
    ///
    /// [`CompileError::EmptyCorpus`] if `raw` has no frames.
    pub fn compile<F, L>(raw: &[F], highlight: &str, canvas: Size) -> Result<Self, CompileError>
    where
        F: AsRef<[L]>,
        L: AsRef<str>,
    {
        if raw.is_empty() {
            return Err(CompileError::EmptyCorpus);
        }

        let frames: Vec<CompiledFrame> = raw
            .iter()
            .enumerate()
            .map(|(index, frame)| compile_frame(index, frame.as_ref(), highlight, canvas))
            .collect();

        reel_core::debug!(
            frames = frames.len(),
            canvas = %canvas,
            "animation compiled"
        );

        Ok(Self { frames, canvas })
    }

    /// Frame at `index`, wrapping modulo the frame count.
    pub fn frame(&self, index: usize) -> &CompiledFrame {
        &self.frames[index % self.frames.len()]
    }

    /// Number of frames; never zero.
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// All frames in order.
    pub fn frames(&self) -> &[CompiledFrame] {
        &self.frames
    }

    /// Fixed size of the artwork.
    pub fn canvas(&self) -> Size {
        self.canvas
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn compile_frame<L: AsRef<str>>(
    index: usize,
    raw: &[L],
    highlight: &str,
    canvas: Size,
) -> CompiledFrame {
    let lines: Vec<CompiledLine> = raw
        .iter()
        .map(|line| CompiledLine::new(line.as_ref(), highlight))
        .collect();

    if lines.len() > usize::from(canvas.height) {
        reel_core::warn!(
            frame = index,
            lines = lines.len(),
            canvas_height = canvas.height,
            "frame taller than canvas"
        );
    }
    for (row, line) in lines.iter().enumerate() {
        if line.width() > usize::from(canvas.width) {
            reel_core::warn!(
                frame = index,
                row,
                width = line.width(),
                canvas_width = canvas.width,
                "line wider than canvas"
            );
        }
    }

    CompiledFrame { lines }
}
