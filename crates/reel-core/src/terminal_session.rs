#![forbid(unsafe_code)]

//! Terminal session lifecycle guard.
//!
//! [`TerminalSession`] owns raw-mode entry/exit plus the handful of modes the
//! player switches on, and restores all of them on drop. Cleanup also runs
//! from a panic hook, so a panicking render loop never leaves the user's
//! shell on the alternate screen with a hidden cursor.
//!
//! # Escape Sequences Reference
//!
//! | Feature | Enable | Disable |
//! |---------|--------|---------|
//! | Alternate screen | `CSI ? 1049 h` | `CSI ? 1049 l` |
//! | Focus events | `CSI ? 1004 h` | `CSI ? 1004 l` |
//! | Show cursor | `CSI ? 25 h` | `CSI ? 25 l` |
//!
//! # Cleanup Order
//!
//! On drop, cleanup happens in reverse order of enabling:
//! 1. Stop the signal thread
//! 2. Disable focus events (if enabled)
//! 3. Show cursor (always)
//! 4. Leave alternate screen (if enabled)
//! 5. Exit raw mode (always)
//! 6. Flush stdout
//!
//! # Interrupts
//!
//! In raw mode `Ctrl+C` arrives as a key event, but `SIGINT`/`SIGTERM` sent
//! from elsewhere still need handling. A background thread turns those
//! signals into a flag ([`TerminalSession::interrupted`]) that the player
//! checks between ticks; the thread never touches the terminal itself.
//!
//! # Usage
//!
//! ```no_run
//! use reel_core::terminal_session::{SessionOptions, TerminalSession};
//!
//! let session = TerminalSession::new(SessionOptions::player())?;
//! let size = session.size();
//! // ... play ...
//! drop(session); // terminal restored
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::event::Event;
use crate::geometry::Size;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Terminal session configuration options.
///
/// All options default to `false`; [`SessionOptions::player`] turns on
/// everything the animation player needs.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Enable the alternate screen buffer (`CSI ? 1049 h`), preserving the
    /// user's scrollback.
    pub alternate_screen: bool,

    /// Hide the cursor (`CSI ? 25 l`) while the session is alive.
    pub hide_cursor: bool,

    /// Enable focus change reports (`CSI ? 1004 h`).
    ///
    /// The terminal then sends `ESC [ I` on focus in and `ESC [ O` on focus
    /// out, which drive pause-on-defocus.
    pub focus_events: bool,
}

impl SessionOptions {
    /// Options for full-screen animation playback.
    #[must_use]
    pub fn player() -> Self {
        Self {
            alternate_screen: true,
            hide_cursor: true,
            focus_events: true,
        }
    }
}

/// A terminal session that manages raw mode and cleanup.
///
/// # Contract
///
/// - **Exclusive ownership**: only one `TerminalSession` should exist at a
///   time.
/// - **Raw mode entry**: creating a session enters raw mode.
/// - **Cleanup guarantee**: when dropped (normally or via panic), every mode
///   that was enabled is disabled again.
#[derive(Debug)]
pub struct TerminalSession {
    options: SessionOptions,
    alternate_screen_enabled: bool,
    focus_events_enabled: bool,
    interrupted: Arc<AtomicBool>,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl TerminalSession {
    /// Enter raw mode and enable the requested modes.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled or a mode sequence
    /// cannot be written.
    pub fn new(options: SessionOptions) -> io::Result<Self> {
        install_panic_hook();

        let interrupted = Arc::new(AtomicBool::new(false));

        crossterm::terminal::enable_raw_mode()?;
        crate::info!("terminal raw mode enabled");

        let mut session = Self {
            options: options.clone(),
            alternate_screen_enabled: false,
            focus_events_enabled: false,
            interrupted: Arc::clone(&interrupted),
            #[cfg(unix)]
            signal_guard: None,
        };

        #[cfg(unix)]
        {
            session.signal_guard = Some(SignalGuard::new(interrupted)?);
        }

        let mut stdout = io::stdout();

        if options.alternate_screen {
            crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
            session.alternate_screen_enabled = true;
            crate::info!("alternate screen enabled");
        }

        if options.hide_cursor {
            crossterm::execute!(stdout, crossterm::cursor::Hide)?;
        }

        if options.focus_events {
            crossterm::execute!(stdout, crossterm::event::EnableFocusChange)?;
            session.focus_events_enabled = true;
            crate::info!("focus events enabled");
        }

        Ok(session)
    }

    /// Current terminal size, falling back to 80×24 when the terminal
    /// cannot report it or reports zero.
    pub fn size(&self) -> Size {
        match crossterm::terminal::size() {
            Ok((width, height)) if width > 0 && height > 0 => Size::new(width, height),
            _ => Size::FALLBACK_TERMINAL,
        }
    }

    /// Poll for an event with a timeout.
    ///
    /// Returns `Ok(true)` if an event is available, `Ok(false)` on timeout.
    pub fn poll_event(&self, timeout: Duration) -> io::Result<bool> {
        crossterm::event::poll(timeout)
    }

    /// Read the next event (blocking until available).
    ///
    /// Returns `Ok(None)` for events the player does not use.
    pub fn read_event(&self) -> io::Result<Option<Event>> {
        let event = crossterm::event::read()?;
        Ok(Event::from_crossterm(event))
    }

    /// Whether `SIGINT` or `SIGTERM` has been delivered.
    pub fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    /// Shared handle to the interrupt flag.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupted)
    }

    /// Get the session options.
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        let mut stdout = io::stdout();

        if self.focus_events_enabled {
            let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
            self.focus_events_enabled = false;
            crate::info!("focus events disabled");
        }

        // Show the cursor even if we never hid it; a crashed previous run
        // may have left it hidden.
        let _ = crossterm::execute!(stdout, crossterm::cursor::Show);

        if self.alternate_screen_enabled {
            let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
            crate::info!("alternate screen disabled");
        }

        let _ = crossterm::terminal::disable_raw_mode();
        crate::info!("terminal raw mode disabled");

        let _ = stdout.flush();
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let mut stdout = io::stdout();

    let _ = crossterm::execute!(stdout, crossterm::event::DisableFocusChange);
    let _ = crossterm::execute!(stdout, crossterm::cursor::Show);
    let _ = crossterm::execute!(stdout, crossterm::terminal::LeaveAlternateScreen);
    let _ = crossterm::terminal::disable_raw_mode();
    let _ = stdout.flush();
}

/// Background thread translating termination signals into the shared flag.
#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new(flag: Arc<AtomicBool>) -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                if matches!(signal, SIGINT | SIGTERM) {
                    crate::warn!(signal, "termination signal received");
                    flag.store(true, Ordering::Release);
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
