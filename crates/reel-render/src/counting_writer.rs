#![forbid(unsafe_code)]

//! Write accounting for whatever sits behind the output buffer.
//!
//! The player wraps stdout in a [`CountingWriter`] to report totals when it
//! stops. Tests use it to check that a frame costs one write and that a
//! too-small tick costs nothing.
//!
//! ```
//! use reel_render::counting_writer::CountingWriter;
//! use std::io::Write;
//!
//! let mut sink = CountingWriter::new(Vec::new());
//! sink.write_all(b"\x1b[2J\x1b[H").unwrap();
//! assert_eq!(sink.bytes_written(), 7);
//! assert_eq!(sink.stats().writes, 1);
//! ```

use std::io::{self, Write};

/// Totals recorded by a [`CountingWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteStats {
    /// Bytes accepted by the inner writer.
    pub bytes: u64,
    /// Successful `write`/`write_all` calls.
    pub writes: u64,
    /// `flush` calls, successful or not.
    pub flushes: u64,
}

impl WriteStats {
    /// Growth from `earlier` to `self`.
    #[must_use]
    pub fn since(self, earlier: WriteStats) -> WriteStats {
        WriteStats {
            bytes: self.bytes.saturating_sub(earlier.bytes),
            writes: self.writes.saturating_sub(earlier.writes),
            flushes: self.flushes.saturating_sub(earlier.flushes),
        }
    }
}

/// A `Write` adapter that records [`WriteStats`].
#[derive(Debug, Default)]
pub struct CountingWriter<W> {
    inner: W,
    stats: WriteStats,
}

impl<W> CountingWriter<W> {
    /// Start counting writes to `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            stats: WriteStats::default(),
        }
    }

    /// Everything recorded since creation or the last [`take_stats`].
    ///
    /// [`take_stats`]: CountingWriter::take_stats
    pub fn stats(&self) -> WriteStats {
        self.stats
    }

    /// Return the totals and start again from zero.
    pub fn take_stats(&mut self) -> WriteStats {
        std::mem::take(&mut self.stats)
    }

    /// Shorthand for `stats().bytes`.
    pub fn bytes_written(&self) -> u64 {
        self.stats.bytes
    }

    /// Shorthand for `stats().writes`.
    pub fn write_calls(&self) -> u64 {
        self.stats.writes
    }

    /// Shorthand for `stats().flushes`.
    pub fn flush_calls(&self) -> u64 {
        self.stats.flushes
    }

    /// The wrapped writer.
    pub fn inner(&self) -> &W {
        &self.inner
    }

    /// Unwrap, discarding the totals.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let accepted = self.inner.write(buf)?;
        self.stats.writes += 1;
        self.stats.bytes += accepted as u64;
        Ok(accepted)
    }

    // One logical write, however many partial writes the inner writer needs.
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.inner.write_all(buf)?;
        self.stats.writes += 1;
        self.stats.bytes += buf.len() as u64;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stats.flushes += 1;
        self.inner.flush()
    }
}
