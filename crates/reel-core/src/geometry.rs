#![forbid(unsafe_code)]

//! Geometric primitives.

use std::fmt;

/// A width × height extent in terminal cells.
///
/// Used both for the terminal viewport and for the fixed canvas of the
/// authored artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl Size {
    /// Size used when the terminal cannot report its dimensions.
    pub const FALLBACK_TERMINAL: Self = Self::new(80, 24);

    /// Create a new size.
    #[inline]
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Total number of cells.
    #[inline]
    pub const fn area(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Whether `inner` fits inside `self` in both dimensions.
    #[inline]
    pub const fn contains(&self, inner: Size) -> bool {
        self.width >= inner.width && self.height >= inner.height
    }

    /// Offset that centers `inner` inside `self`, rounding down.
    ///
    /// Axes where `inner` is larger saturate to zero.
    #[inline]
    pub const fn centered_offset(&self, inner: Size) -> (u16, u16) {
        (
            self.width.saturating_sub(inner.width) / 2,
            self.height.saturating_sub(inner.height) / 2,
        )
    }
}

impl From<(u16, u16)> for Size {
    fn from((width, height): (u16, u16)) -> Self {
        Self::new(width, height)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
