#![forbid(unsafe_code)]

//! Centering layout for the fixed canvas.

use reel_core::geometry::Size;

/// Where the canvas goes in the current viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Blank rows above the canvas.
    pub vertical_padding: u16,
    /// Blank columns left of every canvas line.
    pub horizontal_padding: u16,
    /// Whether the whole canvas is visible. When `false` nothing is drawn.
    pub fits: bool,
}

/// Center `canvas` inside `terminal`.
///
/// Padding is `floor((terminal - canvas) / 2)` per axis, clamped at zero.
#[must_use]
pub fn compute_layout(terminal: Size, canvas: Size) -> Layout {
    let (horizontal_padding, vertical_padding) = terminal.centered_offset(canvas);
    Layout {
        vertical_padding,
        horizontal_padding,
        fits: terminal.contains(canvas),
    }
}

/// Layout memoized on the last terminal size it was computed for.
///
/// The entry is only dropped by [`LayoutCache::invalidate`], which callers
/// invoke on a resize notification.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    entry: Option<(Size, Layout)>,
}

impl LayoutCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached layout for `terminal`, computing it on a miss.
    pub fn get(&mut self, terminal: Size, canvas: Size) -> Layout {
        match self.entry {
            Some((size, layout)) if size == terminal => layout,
            _ => {
                let layout = compute_layout(terminal, canvas);
                self.entry = Some((terminal, layout));
                layout
            }
        }
    }

    /// Forget the cached layout.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    /// Whether a layout is cached.
    pub fn is_cached(&self) -> bool {
        self.entry.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Size = Size::new(77, 41);

    #[test]
    fn slightly_larger_terminal() {
        let layout = compute_layout(Size::new(80, 43), CANVAS);
        assert_eq!(
            layout,
            Layout {
                vertical_padding: 1,
                horizontal_padding: 1,
                fits: true,
            }
        );
    }

    #[test]
    fn exact_fit_has_no_padding() {
        let layout = compute_layout(CANVAS, CANVAS);
        assert_eq!(layout.vertical_padding, 0);
        assert_eq!(layout.horizontal_padding, 0);
        assert!(layout.fits);
    }

    #[test]
    fn too_small_does_not_fit() {
        let layout = compute_layout(Size::new(40, 20), CANVAS);
        assert!(!layout.fits);
        assert_eq!(layout.vertical_padding, 0);
        assert_eq!(layout.horizontal_padding, 0);
    }

    #[test]
    fn one_axis_too_small() {
        let layout = compute_layout(Size::new(200, 30), CANVAS);
        assert!(!layout.fits);
        assert_eq!(layout.horizontal_padding, 61);
        assert_eq!(layout.vertical_padding, 0);
    }

    #[test]
    fn cache_reuses_until_invalidated() {
        let mut cache = LayoutCache::new();
        assert!(!cache.is_cached());
        let first = cache.get(Size::new(100, 50), CANVAS);
        assert!(cache.is_cached());
        assert_eq!(cache.get(Size::new(100, 50), CANVAS), first);

        cache.invalidate();
        assert!(!cache.is_cached());
        let resized = cache.get(Size::new(80, 43), CANVAS);
        assert_eq!(resized.horizontal_padding, 1);
    }

    #[test]
    fn cache_recomputes_for_new_size() {
        let mut cache = LayoutCache::new();
        cache.get(Size::new(100, 50), CANVAS);
        let other = cache.get(Size::new(79, 41), CANVAS);
        assert_eq!(other.horizontal_padding, 1);
        assert_eq!(other.vertical_padding, 0);
    }
}
