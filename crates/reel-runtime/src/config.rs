#![forbid(unsafe_code)]

//! Scheduler and player configuration.

use std::time::Duration;

use reel_core::terminal_session::SessionOptions;
use reel_render::output::DEFAULT_CAPACITY;

/// 30 000 µs per frame (about 33 fps).
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_micros(30_000);

/// Frames the clock may fall behind before catch-up jumps ahead.
pub const DEFAULT_SKIP_THRESHOLD: u64 = 3;

/// Sleep floor, so a tick that is already late never busy-loops.
pub const DEFAULT_MIN_SLEEP: Duration = Duration::from_millis(1);

/// Timing and output knobs for [`PlaybackScheduler`](crate::PlaybackScheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Time each frame stays on screen. Never zero.
    pub frame_delay: Duration,
    /// Largest `behind` value still rendered normally.
    pub skip_threshold: u64,
    /// Lower bound on the sleep returned by a tick.
    pub min_sleep: Duration,
    /// Output buffer capacity in bytes.
    pub buffer_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            frame_delay: DEFAULT_FRAME_DELAY,
            skip_threshold: DEFAULT_SKIP_THRESHOLD,
            min_sleep: DEFAULT_MIN_SLEEP,
            buffer_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SchedulerConfig {
    /// Set the frame delay, clamped to at least one microsecond.
    #[must_use]
    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay.max(Duration::from_micros(1));
        self
    }

    /// Set the catch-up threshold.
    #[must_use]
    pub fn with_skip_threshold(mut self, skip_threshold: u64) -> Self {
        self.skip_threshold = skip_threshold;
        self
    }

    /// Set the sleep floor.
    #[must_use]
    pub fn with_min_sleep(mut self, min_sleep: Duration) -> Self {
        self.min_sleep = min_sleep;
        self
    }

    /// Set the output buffer capacity.
    #[must_use]
    pub fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity.max(1);
        self
    }

    /// Frame delay in nanoseconds, never zero.
    pub(crate) fn frame_nanos(&self) -> u128 {
        self.frame_delay.as_nanos().max(1)
    }
}

/// Configuration for [`Player`](crate::Player).
///
/// Quitting is not configurable: `q`, `Esc`, and `Ctrl+C` always stop
/// playback, as do `SIGINT` and `SIGTERM`.
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Scheduler timing.
    pub scheduler: SchedulerConfig,
    /// Stop on its own after this long. `None` plays until interrupted.
    pub exit_after: Option<Duration>,
    /// Terminal modes for the session.
    pub session: SessionOptions,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            exit_after: None,
            session: SessionOptions::player(),
        }
    }
}

impl PlayerConfig {
    /// Override the scheduler configuration.
    #[must_use]
    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Stop automatically after `duration`.
    #[must_use]
    pub fn with_exit_after(mut self, duration: Duration) -> Self {
        self.exit_after = Some(duration);
        self
    }

    /// Override the terminal session options.
    #[must_use]
    pub fn with_session(mut self, session: SessionOptions) -> Self {
        self.session = session;
        self
    }
}
