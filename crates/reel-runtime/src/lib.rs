#![forbid(unsafe_code)]

//! Playback runtime.
//!
//! - [`PlaybackScheduler`]: the frame-paced state machine, driven by
//!   explicit `tick(now)` calls.
//! - [`Player`]: the interactive host loop that owns the terminal session,
//!   forwards input to the scheduler, and sleeps between ticks.

pub mod config;
pub mod error;
pub mod player;
pub mod scheduler;
pub mod state;

pub use config::{PlayerConfig, SchedulerConfig};
pub use error::PlayerError;
pub use player::{EventSource, PlaybackSummary, Player, StopReason};
pub use scheduler::{PlaybackScheduler, PlaybackState, Tick};
pub use state::{ClockState, LayoutState};
