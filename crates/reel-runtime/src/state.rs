#![forbid(unsafe_code)]

//! Mutable scheduler state.
//!
//! [`ClockState`] is the scheduler's private timeline; [`LayoutState`]
//! records what notifications have told it about the terminal. Both have a
//! single owner and are only mutated from the tick loop or from the
//! notification methods, which never render.

use std::time::{Duration, Instant};

/// Playback timeline.
///
/// Effective time is wall time since `start` minus everything folded into
/// `total_paused` (defocus spans and skipped catch-up frames).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockState {
    /// When playback began.
    pub start: Instant,
    /// Set while playback is frozen by a focus loss.
    pub focus_lost_at: Option<Instant>,
    /// Accumulated frozen time. Never decreases.
    pub total_paused: Duration,
    /// Index of the last frame actually written. `None` before the first.
    pub last_frame_index: Option<usize>,
    /// When the last running tick was evaluated.
    pub last_tick_at: Instant,
}

impl ClockState {
    /// Fresh timeline starting at `start`.
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            focus_lost_at: None,
            total_paused: Duration::ZERO,
            last_frame_index: None,
            last_tick_at: start,
        }
    }

    /// Effective elapsed time at `at`, saturating at zero.
    pub fn effective(&self, at: Instant) -> Duration {
        at.saturating_duration_since(self.start)
            .saturating_sub(self.total_paused)
    }

    /// Whether playback is frozen.
    pub fn is_paused(&self) -> bool {
        self.focus_lost_at.is_some()
    }

    /// Freeze at `now`. Returns `false` if already frozen.
    pub fn pause(&mut self, now: Instant) -> bool {
        if self.focus_lost_at.is_some() {
            return false;
        }
        self.focus_lost_at = Some(now);
        true
    }

    /// Unfreeze at `now`, folding the frozen span into `total_paused`.
    ///
    /// `last_tick_at` moves forward by the same span so its effective time
    /// is unchanged. Returns the folded span, or `None` if not frozen.
    pub fn resume(&mut self, now: Instant) -> Option<Duration> {
        let lost_at = self.focus_lost_at.take()?;
        let span = now.saturating_duration_since(lost_at);
        self.fold(span);
        self.last_tick_at = self.last_tick_at.checked_add(span).unwrap_or(now);
        Some(span)
    }

    /// Add `span` to the paused total.
    pub fn fold(&mut self, span: Duration) {
        self.total_paused = self.total_paused.saturating_add(span);
    }
}

/// What the scheduler knows about the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutState {
    /// Terminal columns.
    pub terminal_width: u16,
    /// Terminal rows.
    pub terminal_height: u16,
    /// Last reported focus.
    pub is_focused: bool,
    /// Vertical padding of the last consulted layout.
    pub last_vertical_padding: u16,
    /// Horizontal padding of the last consulted layout.
    pub last_horizontal_padding: u16,
    /// Render on the next running tick regardless of the frame index.
    pub force_redraw: bool,
    /// A resize arrived since the layout was last consulted.
    pub layout_changed: bool,
}

impl LayoutState {
    /// Focused state for a `width` × `height` terminal.
    pub fn new(terminal_width: u16, terminal_height: u16) -> Self {
        Self {
            terminal_width,
            terminal_height,
            is_focused: true,
            last_vertical_padding: 0,
            last_horizontal_padding: 0,
            force_redraw: false,
            layout_changed: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn effective_subtracts_pauses() {
        let t0 = Instant::now();
        let mut clock = ClockState::new(t0);
        assert_eq!(clock.effective(t0 + 100 * MS), 100 * MS);
        clock.fold(40 * MS);
        assert_eq!(clock.effective(t0 + 100 * MS), 60 * MS);
    }

    #[test]
    fn effective_saturates() {
        let t0 = Instant::now();
        let mut clock = ClockState::new(t0 + 10 * MS);
        assert_eq!(clock.effective(t0), Duration::ZERO);
        clock.fold(Duration::from_secs(1));
        assert_eq!(clock.effective(t0 + 20 * MS), Duration::ZERO);
    }

    #[test]
    fn pause_is_idempotent() {
        let t0 = Instant::now();
        let mut clock = ClockState::new(t0);
        assert!(clock.pause(t0 + 5 * MS));
        assert!(!clock.pause(t0 + 9 * MS));
        assert_eq!(clock.focus_lost_at, Some(t0 + 5 * MS));
    }

    #[test]
    fn resume_folds_span_and_keeps_last_tick_effective() {
        let t0 = Instant::now();
        let mut clock = ClockState::new(t0);
        clock.last_tick_at = t0 + 50 * MS;
        let before = clock.effective(clock.last_tick_at);

        clock.pause(t0 + 60 * MS);
        assert_eq!(clock.resume(t0 + 560 * MS), Some(500 * MS));
        assert!(!clock.is_paused());
        assert_eq!(clock.total_paused, 500 * MS);
        assert_eq!(clock.effective(clock.last_tick_at), before);
        assert_eq!(clock.effective(t0 + 560 * MS), 60 * MS);
    }

    #[test]
    fn resume_without_pause_is_none() {
        let t0 = Instant::now();
        let mut clock = ClockState::new(t0);
        assert_eq!(clock.resume(t0 + MS), None);
        assert_eq!(clock.total_paused, Duration::ZERO);
    }

    #[test]
    fn layout_state_starts_focused() {
        let state = LayoutState::new(80, 24);
        assert!(state.is_focused);
        assert!(!state.force_redraw);
        assert!(!state.layout_changed);
    }
}
