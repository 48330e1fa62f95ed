#![forbid(unsafe_code)]

//! Command-line argument parsing for the player.
//!
//! Parses `--key=value` flags by hand. Every option can also be set through
//! a `REEL_*` environment variable; explicit flags win over the environment,
//! which wins over the defaults. Malformed environment values are ignored,
//! malformed flags are errors.

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use reel_core::geometry::Size;
use reel_render::ansi::AnsiColor;
use reel_render::compiler::DEFAULT_CANVAS;
use reel_runtime::{PlayerConfig, SchedulerConfig};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
reel-play: centered ANSI frame animation player

USAGE:
    reel-play [OPTIONS]

OPTIONS:
    --frames=PATH          JSON corpus: an array of frames, each an array of
                           lines (default: built-in demo)
    --color=NAME           Highlight color for <color> spans (default: blue)
    --frame-delay-ms=N     Milliseconds per frame (default: 30)
    --skip-threshold=N     Frames behind before catch-up jumps (default: 3)
    --canvas=WxH           Canvas size of the corpus (default: 77x41)
    --exit-after-ms=N      Stop after N milliseconds (default: 0, never)
    --help, -h             Show this help message
    --version, -V          Show version

COLORS:
    black red green yellow blue magenta cyan white, and bright-* variants

KEYBINDINGS:
    q / Esc / Ctrl+C       Quit

ENVIRONMENT VARIABLES:
    REEL_FRAMES            Override --frames
    REEL_COLOR             Override --color
    REEL_FRAME_DELAY_MS    Override --frame-delay-ms
    REEL_SKIP_THRESHOLD    Override --skip-threshold
    REEL_CANVAS            Override --canvas
    REEL_EXIT_AFTER_MS     Override --exit-after-ms
    REEL_LOG               Log filter, e.g. 'debug' or 'reel_runtime=trace'
    REEL_LOG_FILE          Write logs to this file (no logging without it)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Corpus file; `None` plays the built-in demo.
    pub frames: Option<PathBuf>,
    /// Highlight color.
    pub color: AnsiColor,
    /// Milliseconds per frame.
    pub frame_delay_ms: u64,
    /// Catch-up threshold in frames.
    pub skip_threshold: u64,
    /// Canvas size the corpus was authored for.
    pub canvas: Size,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
    /// Log filter directive.
    pub log_filter: String,
    /// Log destination; `None` disables logging.
    pub log_file: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            frames: None,
            color: AnsiColor::default(),
            frame_delay_ms: 30,
            skip_threshold: 3,
            canvas: DEFAULT_CANVAS,
            exit_after_ms: 0,
            log_filter: "info".into(),
            log_file: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Play with these options.
    Run(Opts),
    /// Print usage.
    Help,
    /// Print the version.
    Version,
}

/// A flag that could not be understood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// A known flag with a value that does not parse.
    InvalidValue {
        /// Flag name, including the leading dashes.
        flag: &'static str,
        /// The offending value.
        value: String,
    },
    /// Not a flag this program knows.
    UnknownArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { flag, value } => write!(f, "Invalid {flag} value: {value}"),
            Self::UnknownArgument(arg) => write!(f, "Unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl Opts {
    /// Parse the process arguments and environment.
    ///
    /// Prints help or version and exits for `--help`/`--version`; prints the
    /// error and exits with status 1 on a bad flag.
    pub fn parse() -> Self {
        match parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("reel-play {VERSION}");
                process::exit(0);
            }
            Err(err) => {
                eprintln!("{err}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Scheduler settings derived from these options.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig::default()
            .with_frame_delay(Duration::from_millis(self.frame_delay_ms))
            .with_skip_threshold(self.skip_threshold)
    }

    /// Player settings derived from these options.
    pub fn player_config(&self) -> PlayerConfig {
        let config = PlayerConfig::default().with_scheduler(self.scheduler_config());
        match self.exit_after_ms {
            0 => config,
            ms => config.with_exit_after(Duration::from_millis(ms)),
        }
    }
}

/// Parse `args` (without the program name), reading overrides through
/// `lookup`.
///
/// # Errors
///
/// [`CliError`] for an unknown flag or an unparsable flag value.
pub fn parse_from<I, F>(args: I, lookup: F) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut opts = Opts::default();

    // Apply environment variable defaults first
    if let Some(val) = lookup("REEL_FRAMES")
        && !val.is_empty()
    {
        opts.frames = Some(PathBuf::from(val));
    }
    if let Some(val) = lookup("REEL_COLOR")
        && let Ok(color) = val.parse()
    {
        opts.color = color;
    }
    if let Some(val) = lookup("REEL_FRAME_DELAY_MS")
        && let Ok(n) = val.parse::<u64>()
        && n > 0
    {
        opts.frame_delay_ms = n;
    }
    if let Some(val) = lookup("REEL_SKIP_THRESHOLD")
        && let Ok(n) = val.parse()
    {
        opts.skip_threshold = n;
    }
    if let Some(val) = lookup("REEL_CANVAS")
        && let Some(size) = parse_size(&val)
    {
        opts.canvas = size;
    }
    if let Some(val) = lookup("REEL_EXIT_AFTER_MS")
        && let Ok(n) = val.parse()
    {
        opts.exit_after_ms = n;
    }
    if let Some(val) = lookup("REEL_LOG")
        && !val.is_empty()
    {
        opts.log_filter = val;
    }
    if let Some(val) = lookup("REEL_LOG_FILE")
        && !val.is_empty()
    {
        opts.log_file = Some(PathBuf::from(val));
    }

    // Parse command-line args (override env vars)
    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            other => {
                if let Some(val) = other.strip_prefix("--frames=") {
                    opts.frames = Some(PathBuf::from(val));
                } else if let Some(val) = other.strip_prefix("--color=") {
                    opts.color = val.parse().map_err(|_| invalid("--color", val))?;
                } else if let Some(val) = other.strip_prefix("--frame-delay-ms=") {
                    opts.frame_delay_ms = match val.parse() {
                        Ok(n) if n > 0 => n,
                        _ => return Err(invalid("--frame-delay-ms", val)),
                    };
                } else if let Some(val) = other.strip_prefix("--skip-threshold=") {
                    opts.skip_threshold =
                        val.parse().map_err(|_| invalid("--skip-threshold", val))?;
                } else if let Some(val) = other.strip_prefix("--canvas=") {
                    opts.canvas = parse_size(val).ok_or_else(|| invalid("--canvas", val))?;
                } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                    opts.exit_after_ms =
                        val.parse().map_err(|_| invalid("--exit-after-ms", val))?;
                } else {
                    return Err(CliError::UnknownArgument(other.to_string()));
                }
            }
        }
    }

    Ok(Command::Run(opts))
}

fn invalid(flag: &'static str, value: &str) -> CliError {
    CliError::InvalidValue {
        flag,
        value: value.to_string(),
    }
}

/// `WxH` (or `WXH`) with both sides non-zero.
fn parse_size(text: &str) -> Option<Size> {
    let (w, h) = text.split_once(['x', 'X'])?;
    let width: u16 = w.trim().parse().ok()?;
    let height: u16 = h.trim().parse().ok()?;
    (width > 0 && height > 0).then_some(Size::new(width, height))
}
