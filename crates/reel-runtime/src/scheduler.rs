#![forbid(unsafe_code)]

//! Frame-paced playback scheduler.
//!
//! The scheduler is an explicit state machine: the host calls
//! [`PlaybackScheduler::tick`] with the current instant, the scheduler
//! decides whether to draw, and returns how long the host should sleep
//! before the next tick. No wall clock is read inside, so tests drive it
//! with synthetic instants.
//!
//! # Tick
//!
//! 1. Apply focus transitions. Losing focus records `focus_lost_at`;
//!    regaining it folds the frozen span into `total_paused`. Both set
//!    `force_redraw`.
//! 2. While frozen: draw nothing and sleep one frame delay.
//! 3. `effective = now - start - total_paused`, `logical = effective / delay`,
//!    `frame_index = logical mod frame_count`.
//! 4. `behind` is the number of frame boundaries crossed since the last
//!    running tick.
//! 5. Catch-up: when `behind > skip_threshold`, `(behind - 1)` frames are
//!    folded into `total_paused` and only the frame after the last one
//!    observed is drawn. Playback jumps; skipped frames are never replayed.
//! 6. Draw if the index changed, a boundary was crossed, a redraw was
//!    forced, or the terminal was resized, and only if the canvas fits.
//! 7. Sleep until the next frame boundary, never less than `min_sleep`.
//!
//! # States
//!
//! `Running` → `Paused` (focus lost) → `Running` (focus regained), and
//! `Stopped` after [`PlaybackScheduler::shutdown`]. Ticks in `Stopped` do
//! nothing.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use reel_core::geometry::Size;
use reel_render::compiler::Animation;
use reel_render::layout::LayoutCache;
use reel_render::output::FrameWriter;
use tracing::{debug, info, trace};

use crate::config::SchedulerConfig;
use crate::state::{ClockState, LayoutState};

/// Coarse playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Frames advance with the clock.
    Running,
    /// Frozen by a focus loss.
    Paused,
    /// Shut down; ticks are ignored.
    Stopped,
}

/// Outcome of one [`PlaybackScheduler::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Whether a frame was written.
    pub rendered: bool,
    /// How long the host should wait before ticking again.
    pub sleep: Duration,
    /// Frame selected by the clock (the frozen frame while paused).
    pub frame_index: usize,
    /// Frame boundaries crossed since the previous running tick, before
    /// catch-up.
    pub behind: u64,
    /// Frames folded away by catch-up on this tick.
    pub skipped: u64,
    /// A draw was due but the canvas does not fit the terminal.
    pub too_small: bool,
    /// Playback is frozen by a focus loss.
    pub paused: bool,
    /// Bytes delivered to the sink on this tick.
    pub bytes_written: u64,
}

/// Drives an [`Animation`] into a byte sink.
#[derive(Debug)]
pub struct PlaybackScheduler<W: Write> {
    animation: Animation,
    config: SchedulerConfig,
    clock: ClockState,
    layout: LayoutState,
    layout_cache: LayoutCache,
    writer: FrameWriter<W>,
    stopped: bool,
}

impl<W: Write> PlaybackScheduler<W> {
    /// Scheduler whose timeline starts at `start`, drawing into `sink` for
    /// a terminal of size `terminal`.
    pub fn new(
        animation: Animation,
        config: SchedulerConfig,
        sink: W,
        start: Instant,
        terminal: Size,
    ) -> Self {
        info!(
            frames = animation.frame_count(),
            canvas = %animation.canvas(),
            terminal = %terminal,
            frame_delay_us = config.frame_delay.as_micros() as u64,
            "playback scheduler created"
        );
        Self {
            writer: FrameWriter::new(sink, config.buffer_capacity),
            animation,
            config,
            clock: ClockState::new(start),
            layout: LayoutState::new(terminal.width, terminal.height),
            layout_cache: LayoutCache::new(),
            stopped: false,
        }
    }

    /// Record a new terminal size. Takes effect on the next tick.
    pub fn notify_resize(&mut self, width: u16, height: u16) {
        debug!(width, height, "resize");
        self.layout.terminal_width = width;
        self.layout.terminal_height = height;
        self.layout.layout_changed = true;
        self.layout_cache.invalidate();
        self.writer.invalidate_padding();
    }

    /// Record a focus change. Takes effect on the next tick.
    pub fn notify_focus(&mut self, focused: bool) {
        debug!(focused, "focus");
        self.layout.is_focused = focused;
    }

    /// Run one scheduling decision at `now`.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if writing the frame fails. Scheduler state
    /// is left as it was before the failed write.
    pub fn tick(&mut self, now: Instant) -> io::Result<Tick> {
        if self.stopped {
            return Ok(self.idle_tick(0, false));
        }

        self.apply_focus(now);

        if let Some(lost_at) = self.clock.focus_lost_at {
            let frame_index = self.frame_index(self.logical_frame(self.clock.effective(lost_at)));
            return Ok(self.idle_tick(frame_index, true));
        }

        let mut effective = self.clock.effective(now);
        let mut logical = self.logical_frame(effective);
        let previous = self.logical_frame(self.clock.effective(self.clock.last_tick_at));
        let behind = logical.saturating_sub(previous);

        let mut skipped = 0;
        if behind > self.config.skip_threshold {
            skipped = behind - 1;
            self.clock.fold(self.frames_to_duration(skipped));
            effective = self.clock.effective(now);
            logical = self.logical_frame(effective);
            debug!(behind, skipped, "catch-up: skipping frames");
        }

        let frame_index = self.frame_index(logical);
        let due = self.clock.last_frame_index != Some(frame_index)
            || behind > 0
            || self.layout.force_redraw
            || self.layout.layout_changed;

        let mut tick = Tick {
            rendered: false,
            sleep: Duration::ZERO,
            frame_index,
            behind,
            skipped,
            too_small: false,
            paused: false,
            bytes_written: 0,
        };

        if due {
            let terminal = Size::new(self.layout.terminal_width, self.layout.terminal_height);
            let layout = self.layout_cache.get(terminal, self.animation.canvas());
            self.layout.last_vertical_padding = layout.vertical_padding;
            self.layout.last_horizontal_padding = layout.horizontal_padding;
            self.layout.layout_changed = false;

            if layout.fits {
                let frame = self.animation.frame(frame_index);
                tick.bytes_written = self.writer.write_frame(frame, layout)?;
                tick.rendered = true;
                self.clock.last_frame_index = Some(frame_index);
                self.layout.force_redraw = false;
                trace!(frame_index, bytes = tick.bytes_written, "frame rendered");
            } else {
                tick.too_small = true;
                trace!(%terminal, canvas = %self.animation.canvas(), "terminal too small");
            }
        }

        self.clock.last_tick_at = now;

        // Next boundary is start + total_paused + (logical + 1) * delay;
        // measured on the effective timeline it is (logical + 1) * delay.
        let until_boundary = self
            .frames_to_duration(logical.saturating_add(1))
            .saturating_sub(effective);
        tick.sleep = until_boundary.max(self.config.min_sleep);
        Ok(tick)
    }

    /// Flush anything still buffered and stop.
    ///
    /// Returns the number of bytes flushed. Later ticks do nothing.
    ///
    /// # Errors
    ///
    /// Returns the sink's error if the final flush fails.
    pub fn shutdown(&mut self) -> io::Result<usize> {
        self.stopped = true;
        let flushed = self.writer.flush()?;
        info!(
            flushed,
            total_bytes = self.writer.buffer().bytes_flushed(),
            "playback scheduler stopped"
        );
        Ok(flushed)
    }

    /// Current coarse state.
    pub fn state(&self) -> PlaybackState {
        if self.stopped {
            PlaybackState::Stopped
        } else if self.clock.is_paused() {
            PlaybackState::Paused
        } else {
            PlaybackState::Running
        }
    }

    /// The animation being played.
    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// The active configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The playback timeline.
    pub fn clock(&self) -> &ClockState {
        &self.clock
    }

    /// The terminal state.
    pub fn layout_state(&self) -> &LayoutState {
        &self.layout
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &W {
        self.writer.buffer().sink()
    }

    /// Return the sink.
    pub fn into_sink(self) -> W {
        self.writer.into_sink()
    }

    fn apply_focus(&mut self, now: Instant) {
        if !self.layout.is_focused {
            if self.clock.pause(now) {
                self.layout.force_redraw = true;
                info!("focus lost: playback paused");
            }
        } else if let Some(span) = self.clock.resume(now) {
            self.layout.force_redraw = true;
            info!(
                paused_ms = span.as_millis() as u64,
                total_paused_ms = self.clock.total_paused.as_millis() as u64,
                "focus regained: playback resumed"
            );
        }
    }

    fn idle_tick(&self, frame_index: usize, paused: bool) -> Tick {
        Tick {
            rendered: false,
            sleep: self.config.frame_delay.max(self.config.min_sleep),
            frame_index,
            behind: 0,
            skipped: 0,
            too_small: false,
            paused,
            bytes_written: 0,
        }
    }

    /// Unwrapped frame counter for an effective time.
    fn logical_frame(&self, effective: Duration) -> u64 {
        u64::try_from(effective.as_nanos() / self.config.frame_nanos()).unwrap_or(u64::MAX)
    }

    fn frame_index(&self, logical: u64) -> usize {
        // frame_count fits in u64 on every supported target.
        (logical % self.animation.frame_count() as u64) as usize
    }

    fn frames_to_duration(&self, frames: u64) -> Duration {
        let nanos = self.config.frame_nanos().saturating_mul(u128::from(frames));
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}
