#![forbid(unsafe_code)]

//! ANSI escape sequence constants.
//!
//! Every control sequence the player emits is named here so the output
//! buffer's flush-boundary rule can be audited in one place: each constant is
//! appended as a single unit and therefore never split across flushes.
//!
//! # Sequence Reference
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ 2 J` | ED (Erase Display, whole screen) |
//! | CSI | `ESC [ H` | CUP (Cursor Position, home) |
//! | CSI | `ESC [ 0 m` | SGR reset |
//! | CSI | `ESC [ 30..37 m` | SGR foreground, normal intensity |
//! | CSI | `ESC [ 90..97 m` | SGR foreground, bright |

use std::fmt;
use std::str::FromStr;

/// ED 2: erase the whole display.
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// CUP with no parameters: move the cursor to row 1, column 1.
pub const CURSOR_HOME: &str = "\x1b[H";

/// Clear and home in one unit; written at the start of every frame.
pub const CLEAR_AND_HOME: &str = "\x1b[2J\x1b[H";

/// SGR reset: `CSI 0 m`.
pub const SGR_RESET: &str = "\x1b[0m";

/// Line break between canvas rows and for vertical padding.
///
/// Raw mode turns off output post-processing, so LF alone would not return
/// the cursor to column 0.
pub const LINE_BREAK: &str = "\r\n";

/// The sixteen named ANSI foreground colors.
///
/// The highlight color is restricted to these; arbitrary palettes are out of
/// scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnsiColor {
    Black,
    Red,
    Green,
    Yellow,
    #[default]
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl AnsiColor {
    /// All colors in SGR code order.
    pub const ALL: [AnsiColor; 16] = [
        AnsiColor::Black,
        AnsiColor::Red,
        AnsiColor::Green,
        AnsiColor::Yellow,
        AnsiColor::Blue,
        AnsiColor::Magenta,
        AnsiColor::Cyan,
        AnsiColor::White,
        AnsiColor::BrightBlack,
        AnsiColor::BrightRed,
        AnsiColor::BrightGreen,
        AnsiColor::BrightYellow,
        AnsiColor::BrightBlue,
        AnsiColor::BrightMagenta,
        AnsiColor::BrightCyan,
        AnsiColor::BrightWhite,
    ];

    /// Foreground SGR sequence for this color.
    #[must_use]
    pub const fn sgr(self) -> &'static str {
        match self {
            AnsiColor::Black => "\x1b[30m",
            AnsiColor::Red => "\x1b[31m",
            AnsiColor::Green => "\x1b[32m",
            AnsiColor::Yellow => "\x1b[33m",
            AnsiColor::Blue => "\x1b[34m",
            AnsiColor::Magenta => "\x1b[35m",
            AnsiColor::Cyan => "\x1b[36m",
            AnsiColor::White => "\x1b[37m",
            AnsiColor::BrightBlack => "\x1b[90m",
            AnsiColor::BrightRed => "\x1b[91m",
            AnsiColor::BrightGreen => "\x1b[92m",
            AnsiColor::BrightYellow => "\x1b[93m",
            AnsiColor::BrightBlue => "\x1b[94m",
            AnsiColor::BrightMagenta => "\x1b[95m",
            AnsiColor::BrightCyan => "\x1b[96m",
            AnsiColor::BrightWhite => "\x1b[97m",
        }
    }

    /// Kebab-case name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            AnsiColor::Black => "black",
            AnsiColor::Red => "red",
            AnsiColor::Green => "green",
            AnsiColor::Yellow => "yellow",
            AnsiColor::Blue => "blue",
            AnsiColor::Magenta => "magenta",
            AnsiColor::Cyan => "cyan",
            AnsiColor::White => "white",
            AnsiColor::BrightBlack => "bright-black",
            AnsiColor::BrightRed => "bright-red",
            AnsiColor::BrightGreen => "bright-green",
            AnsiColor::BrightYellow => "bright-yellow",
            AnsiColor::BrightBlue => "bright-blue",
            AnsiColor::BrightMagenta => "bright-magenta",
            AnsiColor::BrightCyan => "bright-cyan",
            AnsiColor::BrightWhite => "bright-white",
        }
    }
}

impl fmt::Display for AnsiColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a color name is not one of the sixteen ANSI names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownColor(pub String);

impl fmt::Display for UnknownColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown color '{}'", self.0)
    }
}

impl std::error::Error for UnknownColor {}

impl FromStr for AnsiColor {
    type Err = UnknownColor;

    /// Case-insensitive; `_` and `-` are interchangeable and `grey`/`gray`
    /// both name bright black.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        if normalized == "gray" || normalized == "grey" {
            return Ok(AnsiColor::BrightBlack);
        }
        AnsiColor::ALL
            .into_iter()
            .find(|color| color.name() == normalized)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}
