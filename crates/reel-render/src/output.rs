#![forbid(unsafe_code)]

//! Batched frame output.
//!
//! [`OutputBuffer`] collects a frame's bytes in a fixed-capacity region and
//! hands them to the sink in as few writes as possible: ideally one per
//! frame, so the terminal never shows a half-drawn canvas.
//!
//! # Flush boundaries
//!
//! Bytes only leave the buffer between two `append` calls. Callers append
//! whole units (an escape constant, a padding run, a compiled line), so an
//! escape sequence can never be split across two sink writes. When a unit
//! does not fit in the remaining space the buffer is flushed first; a unit
//! larger than the whole capacity is written straight through after that
//! flush.
//!
//! # Frame layout
//!
//! [`FrameWriter::write_frame`] emits, in order:
//!
//! 1. [`CLEAR_AND_HOME`]
//! 2. `vertical_padding` line breaks
//! 3. each canvas line prefixed by `horizontal_padding` spaces, with a line
//!    break between lines but not after the last

use std::collections::HashMap;
use std::io::{self, Write};

use crate::ansi::{CLEAR_AND_HOME, LINE_BREAK};
use crate::compiler::CompiledFrame;
use crate::layout::Layout;

/// Size of the output region (64KB), enough for a full 77×41 canvas with
/// highlight escapes on every line.
pub const DEFAULT_CAPACITY: usize = 64 * 1024;

/// Append-only byte accumulator in front of a sink.
#[derive(Debug)]
pub struct OutputBuffer<W: Write> {
    sink: W,
    buf: Vec<u8>,
    capacity: usize,
    bytes_flushed: u64,
}

impl<W: Write> OutputBuffer<W> {
    /// Buffer with [`DEFAULT_CAPACITY`].
    pub fn new(sink: W) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, sink)
    }

    /// Buffer holding at most `capacity` bytes (minimum 1) between flushes.
    pub fn with_capacity(capacity: usize, sink: W) -> Self {
        let capacity = capacity.max(1);
        Self {
            sink,
            buf: Vec::with_capacity(capacity),
            capacity,
            bytes_flushed: 0,
        }
    }

    /// Append one unit of text.
    ///
    /// Flushes first if `text` would overflow the remaining space.
    ///
    /// # Errors
    ///
    /// Propagates sink write failures from the implied flush.
    pub fn append(&mut self, text: &str) -> io::Result<()> {
        let bytes = text.as_bytes();
        if bytes.len() > self.remaining() {
            self.flush()?;
        }
        if bytes.len() > self.capacity {
            return self.write_through(bytes);
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Write everything accumulated to the sink in one call.
    ///
    /// Returns the number of bytes written; `0` (and no sink call at all)
    /// when the buffer is empty. On failure the pending bytes are discarded:
    /// a frame that failed halfway is not worth resending.
    ///
    /// # Errors
    ///
    /// Propagates sink write or flush failures.
    pub fn flush(&mut self) -> io::Result<usize> {
        if self.buf.is_empty() {
            return Ok(0);
        }
        let len = self.buf.len();
        let result = self
            .sink
            .write_all(&self.buf)
            .and_then(|()| self.sink.flush());
        self.buf.clear();
        result?;
        self.bytes_flushed += len as u64;
        Ok(len)
    }

    /// Bytes waiting to be flushed.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Free space before the next append forces a flush.
    pub fn remaining(&self) -> usize {
        self.capacity - self.buf.len()
    }

    /// Capacity of the region.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total bytes delivered to the sink so far.
    pub fn bytes_flushed(&self) -> u64 {
        self.bytes_flushed
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Return the sink, dropping anything still pending.
    pub fn into_sink(self) -> W {
        self.sink
    }

    fn write_through(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.sink.write_all(bytes)?;
        self.sink.flush()?;
        self.bytes_flushed += bytes.len() as u64;
        Ok(())
    }
}

/// Space and line-break runs, built once per distinct length.
///
/// Invalidate on resize: the set of lengths in use changes with the
/// viewport, and the old entries would only accumulate.
#[derive(Debug, Default)]
pub struct PaddingCache {
    spaces: HashMap<u16, String>,
    line_breaks: HashMap<u16, String>,
}

impl PaddingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` spaces.
    pub fn spaces(&mut self, count: u16) -> &str {
        self.spaces
            .entry(count)
            .or_insert_with(|| " ".repeat(usize::from(count)))
    }

    /// `count` line breaks.
    pub fn line_breaks(&mut self, count: u16) -> &str {
        self.line_breaks
            .entry(count)
            .or_insert_with(|| LINE_BREAK.repeat(usize::from(count)))
    }

    /// Drop every cached run.
    pub fn invalidate(&mut self) {
        self.spaces.clear();
        self.line_breaks.clear();
    }

    /// Number of cached runs.
    pub fn len(&self) -> usize {
        self.spaces.len() + self.line_breaks.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Writes whole compiled frames through an [`OutputBuffer`].
#[derive(Debug)]
pub struct FrameWriter<W: Write> {
    buffer: OutputBuffer<W>,
    padding: PaddingCache,
}

impl<W: Write> FrameWriter<W> {
    /// Frame writer over `sink` with a `capacity`-byte buffer.
    pub fn new(sink: W, capacity: usize) -> Self {
        Self {
            buffer: OutputBuffer::with_capacity(capacity, sink),
            padding: PaddingCache::new(),
        }
    }

    /// Clear the screen and draw `frame` centered per `layout`, then flush.
    ///
    /// Returns the bytes delivered to the sink for this frame. The caller is
    /// responsible for not calling this when `layout.fits` is false.
    ///
    /// # Errors
    ///
    /// Propagates sink write failures.
    pub fn write_frame(&mut self, frame: &CompiledFrame, layout: Layout) -> io::Result<u64> {
        let span = reel_core::debug_span!(
            "write_frame",
            lines = frame.lines().len(),
            top = layout.vertical_padding,
            left = layout.horizontal_padding
        );
        let _guard = span.enter();

        let before = self.buffer.bytes_flushed();

        self.buffer.append(CLEAR_AND_HOME)?;
        if layout.vertical_padding > 0 {
            let breaks = self.padding.line_breaks(layout.vertical_padding);
            self.buffer.append(breaks)?;
        }

        let indent = self.padding.spaces(layout.horizontal_padding);
        for (row, line) in frame.lines().iter().enumerate() {
            if row > 0 {
                self.buffer.append(LINE_BREAK)?;
            }
            if !indent.is_empty() {
                self.buffer.append(indent)?;
            }
            self.buffer.append(line.rendered())?;
        }
        self.buffer.flush()?;

        let written = self.buffer.bytes_flushed() - before;
        reel_core::trace!(bytes = written, "frame flushed");
        Ok(written)
    }

    /// Drop cached padding; call on resize.
    pub fn invalidate_padding(&mut self) {
        self.padding.invalidate();
    }

    /// Flush anything pending.
    ///
    /// # Errors
    ///
    /// Propagates sink write failures.
    pub fn flush(&mut self) -> io::Result<usize> {
        self.buffer.flush()
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &OutputBuffer<W> {
        &self.buffer
    }

    /// The padding cache.
    pub fn padding(&self) -> &PaddingCache {
        &self.padding
    }

    /// Return the sink.
    pub fn into_sink(self) -> W {
        self.buffer.into_sink()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::Animation;
    use crate::counting_writer::CountingWriter;
    use reel_core::geometry::Size;

    /// Sink recording each `write` call as its own chunk.
    #[derive(Default)]
    struct ChunkSink {
        chunks: Vec<Vec<u8>>,
    }

    impl Write for ChunkSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.chunks.push(buf.to_vec());
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn animation(lines: &[&str]) -> Animation {
        let raw = [lines];
        Animation::compile(&raw, "\x1b[34m", Size::new(4, 3)).unwrap()
    }

    #[test]
    fn append_accumulates_until_flush() {
        let mut out = OutputBuffer::with_capacity(16, CountingWriter::new(Vec::new()));
        out.append("abc").unwrap();
        out.append("de").unwrap();
        assert_eq!(out.pending(), 5);
        assert_eq!(out.sink().write_calls(), 0);
        assert_eq!(out.flush().unwrap(), 5);
        assert_eq!(out.sink().write_calls(), 1);
        assert_eq!(out.sink().inner().as_slice(), b"abcde");
    }

    #[test]
    fn flush_on_empty_is_noop() {
        let mut out = OutputBuffer::new(CountingWriter::new(Vec::new()));
        assert_eq!(out.flush().unwrap(), 0);
        assert_eq!(out.flush().unwrap(), 0);
        assert_eq!(out.sink().write_calls(), 0);
        assert_eq!(out.sink().flush_calls(), 0);
    }

    #[test]
    fn overflow_flushes_before_append() {
        let mut out = OutputBuffer::with_capacity(8, CountingWriter::new(Vec::new()));
        out.append("12345").unwrap();
        out.append("6789").unwrap();
        assert_eq!(out.sink().write_calls(), 1);
        assert_eq!(out.sink().inner().as_slice(), b"12345");
        assert_eq!(out.pending(), 4);
    }

    #[test]
    fn oversized_unit_is_written_through() {
        let mut out = OutputBuffer::with_capacity(4, CountingWriter::new(Vec::new()));
        out.append("ab").unwrap();
        out.append("0123456789").unwrap();
        assert_eq!(out.pending(), 0);
        assert_eq!(out.sink().inner().as_slice(), b"ab0123456789");
        assert_eq!(out.bytes_flushed(), 12);
    }

    #[test]
    fn failed_flush_discards_pending() {
        let mut out = OutputBuffer::with_capacity(16, BrokenPipe);
        out.append("abc").unwrap();
        let err = out.flush().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(out.pending(), 0);
        assert_eq!(out.bytes_flushed(), 0);
    }

    #[test]
    fn padding_cache_reuses_and_invalidates() {
        let mut cache = PaddingCache::new();
        assert_eq!(cache.spaces(3), "   ");
        assert_eq!(cache.line_breaks(2), "\r\n\r\n");
        assert_eq!(cache.spaces(3), "   ");
        assert_eq!(cache.len(), 2);
        cache.invalidate();
        assert!(cache.is_empty());
    }

    #[test]
    fn frame_layout_matches_padding() {
        let anim = animation(&["ab", "<color>cd</color>"]);
        let mut writer = FrameWriter::new(Vec::new(), DEFAULT_CAPACITY);
        let layout = Layout {
            vertical_padding: 2,
            horizontal_padding: 3,
            fits: true,
        };
        let written = writer.write_frame(anim.frame(0), layout).unwrap();
        let out = writer.into_sink();
        let expected = "\x1b[2J\x1b[H\r\n\r\n   ab\r\n   \x1b[34mcd\x1b[0m";
        assert_eq!(String::from_utf8(out).unwrap(), expected);
        assert_eq!(written, expected.len() as u64);
    }

    #[test]
    fn frame_without_padding() {
        let anim = animation(&["x", "y"]);
        let mut writer = FrameWriter::new(Vec::new(), DEFAULT_CAPACITY);
        let layout = Layout {
            vertical_padding: 0,
            horizontal_padding: 0,
            fits: true,
        };
        writer.write_frame(anim.frame(0), layout).unwrap();
        assert_eq!(writer.into_sink(), b"\x1b[2J\x1b[Hx\r\ny");
    }

    #[test]
    fn frame_is_one_write() {
        let anim = animation(&["abcd", "<color>ef</color>gh", "ijkl"]);
        let mut writer = FrameWriter::new(CountingWriter::new(Vec::new()), DEFAULT_CAPACITY);
        let layout = Layout {
            vertical_padding: 1,
            horizontal_padding: 5,
            fits: true,
        };
        writer.write_frame(anim.frame(0), layout).unwrap();
        let sink = writer.into_sink();
        assert_eq!(sink.write_calls(), 1);
        assert_eq!(sink.flush_calls(), 1);
    }

    #[test]
    fn small_capacity_flushes_only_at_unit_boundaries() {
        let anim = animation(&["<color>abcd</color>", "efgh", "<color>ij</color>kl"]);
        let layout = Layout {
            vertical_padding: 1,
            horizontal_padding: 2,
            fits: true,
        };

        let mut reference = FrameWriter::new(Vec::new(), DEFAULT_CAPACITY);
        reference.write_frame(anim.frame(0), layout).unwrap();
        let full = reference.into_sink();

        let units: Vec<&str> = {
            let frame = anim.frame(0);
            let mut units = vec![CLEAR_AND_HOME, LINE_BREAK];
            for (row, line) in frame.lines().iter().enumerate() {
                if row > 0 {
                    units.push(LINE_BREAK);
                }
                units.push("  ");
                units.push(line.rendered());
            }
            units
        };
        let mut boundaries = vec![0usize];
        for unit in &units {
            boundaries.push(boundaries.last().unwrap() + unit.len());
        }

        let mut writer = FrameWriter::new(ChunkSink::default(), 16);
        writer.write_frame(anim.frame(0), layout).unwrap();
        let chunks = writer.into_sink().chunks;
        assert!(chunks.len() > 1, "capacity 16 should force several writes");

        let mut offset = 0;
        for chunk in &chunks {
            offset += chunk.len();
            assert!(
                boundaries.contains(&offset),
                "flush at byte {offset} splits a unit"
            );
        }
        assert_eq!(chunks.concat(), full);
    }
}
