#![forbid(unsafe_code)]

//! Interactive host loop.
//!
//! [`Player`] owns the only suspension point of playback: after each
//! [`PlaybackScheduler::tick`] it waits for terminal input for at most the
//! returned sleep. Input that arrives early only updates scheduler flags;
//! the next tick decides whether anything is drawn.
//!
//! Playback stops on a quit key, an interrupt signal, or the configured
//! time limit. The output buffer is flushed through
//! [`PlaybackScheduler::shutdown`] and the terminal is restored when the
//! session guard drops, on every exit path.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use reel_core::event::Event;
use reel_core::geometry::Size;
use reel_core::terminal_session::TerminalSession;
use reel_render::compiler::Animation;
use reel_render::counting_writer::CountingWriter;
use tracing::{debug, info, warn};

use crate::config::PlayerConfig;
use crate::error::PlayerError;
use crate::scheduler::PlaybackScheduler;

/// Where the host loop gets input from.
pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    ///
    /// Returns `Ok(None)` on timeout or for input the player ignores.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>>;

    /// Whether an interrupt signal has been delivered.
    fn interrupted(&self) -> bool;
}

impl EventSource for TerminalSession {
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        if self.poll_event(timeout)? {
            self.read_event()
        } else {
            Ok(None)
        }
    }

    fn interrupted(&self) -> bool {
        TerminalSession::interrupted(self)
    }
}

/// Why playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A quit key was pressed.
    Quit,
    /// `SIGINT` or `SIGTERM` arrived.
    Interrupted,
    /// The configured time limit elapsed.
    TimeLimit,
}

/// Totals reported when playback ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    /// Why the loop stopped.
    pub reason: StopReason,
    /// Ticks evaluated.
    pub ticks: u64,
    /// Frames written.
    pub frames_rendered: u64,
    /// Frames dropped by catch-up.
    pub frames_skipped: u64,
    /// Ticks where a draw was due but the terminal was too small.
    pub too_small_ticks: u64,
    /// Bytes delivered to the sink.
    pub bytes_written: u64,
    /// Wall time spent playing.
    pub elapsed: Duration,
}

/// Plays an animation in the terminal until told to stop.
#[derive(Debug, Clone, Default)]
pub struct Player {
    config: PlayerConfig,
}

impl Player {
    /// Player with the given configuration.
    pub fn new(config: PlayerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Take over the terminal and play `animation` on stdout.
    ///
    /// # Errors
    ///
    /// [`PlayerError::Terminal`] if the session cannot be set up or input
    /// cannot be read; [`PlayerError::Sink`] if writing to stdout fails.
    pub fn run(&self, animation: Animation) -> Result<PlaybackSummary, PlayerError> {
        let mut session =
            TerminalSession::new(self.config.session.clone()).map_err(PlayerError::Terminal)?;
        let terminal = session.size();
        self.play(animation, &mut session, io::stdout(), terminal)
    }

    /// Play `animation` into `sink`, reading input from `source`.
    ///
    /// # Errors
    ///
    /// Same as [`Player::run`], minus session setup.
    pub fn play<E, W>(
        &self,
        animation: Animation,
        source: &mut E,
        sink: W,
        terminal: Size,
    ) -> Result<PlaybackSummary, PlayerError>
    where
        E: EventSource,
        W: Write,
    {
        let started = Instant::now();
        let mut scheduler = PlaybackScheduler::new(
            animation,
            self.config.scheduler,
            CountingWriter::new(sink),
            started,
            terminal,
        );
        let mut summary = PlaybackSummary {
            reason: StopReason::Quit,
            ticks: 0,
            frames_rendered: 0,
            frames_skipped: 0,
            too_small_ticks: 0,
            bytes_written: 0,
            elapsed: Duration::ZERO,
        };

        summary.reason = loop {
            if source.interrupted() {
                break StopReason::Interrupted;
            }
            let remaining = match self.config.exit_after {
                Some(limit) => match limit.checked_sub(started.elapsed()) {
                    Some(left) if !left.is_zero() => Some(left),
                    _ => break StopReason::TimeLimit,
                },
                None => None,
            };

            let tick = scheduler.tick(Instant::now()).map_err(|e| {
                warn!(error = %e, "frame write failed");
                PlayerError::Sink(e)
            })?;
            summary.ticks += 1;
            summary.frames_rendered += u64::from(tick.rendered);
            summary.frames_skipped += tick.skipped;
            summary.too_small_ticks += u64::from(tick.too_small);

            let timeout = remaining.map_or(tick.sleep, |left| tick.sleep.min(left));
            match source.poll(timeout).map_err(PlayerError::Terminal)? {
                Some(event) if event.is_quit() => break StopReason::Quit,
                Some(Event::Resize { width, height }) => scheduler.notify_resize(width, height),
                Some(Event::Focus(focused)) => scheduler.notify_focus(focused),
                Some(Event::Key(key)) => debug!(?key, "ignored key"),
                None => {}
            }
        };

        scheduler.shutdown().map_err(PlayerError::Sink)?;
        let stats = scheduler.sink().stats();
        summary.bytes_written = stats.bytes;
        summary.elapsed = started.elapsed();
        info!(
            reason = ?summary.reason,
            ticks = summary.ticks,
            frames = summary.frames_rendered,
            skipped = summary.frames_skipped,
            bytes = stats.bytes,
            writes = stats.writes,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "playback finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchedulerConfig;
    use reel_core::event::{KeyCode, KeyEvent, Modifiers};
    use std::collections::VecDeque;

    /// Replays scripted poll results without waiting.
    #[derive(Default)]
    struct Scripted {
        events: VecDeque<Option<Event>>,
        interrupt_after: Option<usize>,
        polls: usize,
    }

    impl EventSource for Scripted {
        fn poll(&mut self, _timeout: Duration) -> io::Result<Option<Event>> {
            self.polls += 1;
            Ok(self.events.pop_front().flatten())
        }

        fn interrupted(&self) -> bool {
            self.interrupt_after.is_some_and(|n| self.polls >= n)
        }
    }

    fn animation() -> Animation {
        Animation::compile(&[["ab"], ["cd"]], "\x1b[34m", Size::new(2, 1)).unwrap()
    }

    fn key(c: char) -> Option<Event> {
        Some(Event::Key(KeyEvent::new(KeyCode::Char(c))))
    }

    #[test]
    fn quit_key_stops_after_first_frame() {
        let mut source = Scripted {
            events: VecDeque::from([key('x'), key('q')]),
            ..Scripted::default()
        };
        let mut out = Vec::new();
        let summary = Player::default()
            .play(animation(), &mut source, &mut out, Size::new(10, 5))
            .unwrap();
        assert_eq!(summary.reason, StopReason::Quit);
        assert_eq!(summary.ticks, 2);
        assert!(summary.frames_rendered >= 1);
        assert_eq!(summary.bytes_written, out.len() as u64);
        assert!(out.starts_with(b"\x1b[2J\x1b[H"));
    }

    #[test]
    fn ctrl_c_key_quits() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        let mut source = Scripted {
            events: VecDeque::from([Some(ctrl_c)]),
            ..Scripted::default()
        };
        let summary = Player::default()
            .play(animation(), &mut source, io::sink(), Size::new(10, 5))
            .unwrap();
        assert_eq!(summary.reason, StopReason::Quit);
    }

    #[test]
    fn interrupt_flag_stops_loop() {
        let mut source = Scripted {
            interrupt_after: Some(3),
            ..Scripted::default()
        };
        let summary = Player::default()
            .play(animation(), &mut source, io::sink(), Size::new(10, 5))
            .unwrap();
        assert_eq!(summary.reason, StopReason::Interrupted);
        assert_eq!(summary.ticks, 3);
    }

    #[test]
    fn zero_time_limit_stops_before_drawing() {
        let player = Player::new(PlayerConfig::default().with_exit_after(Duration::ZERO));
        let mut source = Scripted::default();
        let summary = player
            .play(animation(), &mut source, io::sink(), Size::new(10, 5))
            .unwrap();
        assert_eq!(summary.reason, StopReason::TimeLimit);
        assert_eq!(summary.ticks, 0);
        assert_eq!(summary.bytes_written, 0);
    }

    #[test]
    fn too_small_terminal_counts_but_writes_nothing() {
        let mut source = Scripted {
            events: VecDeque::from([None, None, key('q')]),
            ..Scripted::default()
        };
        let summary = Player::default()
            .play(animation(), &mut source, io::sink(), Size::new(1, 1))
            .unwrap();
        assert_eq!(summary.frames_rendered, 0);
        assert!(summary.too_small_ticks >= 1);
        assert_eq!(summary.bytes_written, 0);
    }

    #[test]
    fn resize_event_reaches_scheduler() {
        let mut source = Scripted {
            events: VecDeque::from([Some(Event::Resize { width: 1, height: 1 }), key('q')]),
            ..Scripted::default()
        };
        let mut out = Vec::new();
        let summary = Player::default()
            .play(animation(), &mut source, &mut out, Size::new(10, 5))
            .unwrap();
        // Only the first frame; the resized terminal is too small.
        assert_eq!(summary.frames_rendered, 1);
        assert_eq!(summary.too_small_ticks, 1);
    }

    #[test]
    fn sink_failure_surfaces_as_sink_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let mut source = Scripted::default();
        let player =
            Player::new(PlayerConfig::default().with_scheduler(SchedulerConfig::default()));
        let err = player
            .play(animation(), &mut source, Broken, Size::new(10, 5))
            .unwrap_err();
        assert!(matches!(err, PlayerError::Sink(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
    }
}
