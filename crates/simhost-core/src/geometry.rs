#![forbid(unsafe_code)]

//! Geometric primitives.

/// Pixel size of a surface's drawable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Create a new size.
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels.
    #[inline]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Placement of a surface inside its window.
///
/// Coordinates are window space with the origin at the bottom-left corner
/// and y growing upward.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceFrame {
    /// Left edge.
    pub x: f64,
    /// Bottom edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl SurfaceFrame {
    /// Create a new frame.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Frame anchored at the window origin.
    #[inline]
    pub const fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Convert a window-space point to surface-local engine coordinates.
    ///
    /// The origin offset is removed first, then the vertical axis is flipped
    /// so that `y' = height - y`.
    #[inline]
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        let local_x = x - self.x;
        let local_y = y - self.y;
        (local_x, self.height - local_y)
    }
}

/// Fixed window chrome that is not part of the drawable content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Chrome {
    /// Height reserved at the top of the window.
    pub inset: u32,
}

impl Chrome {
    /// Title bar reservation on platforms that draw it inside the window.
    pub const TITLE_BAR: u32 = 28;

    /// No chrome at all.
    pub const NONE: Self = Self { inset: 0 };

    /// Create chrome with the given top inset.
    #[inline]
    pub const fn new(inset: u32) -> Self {
        Self { inset }
    }

    /// Content size left after subtracting the chrome.
    ///
    /// Saturates to an empty size when the chrome is taller than the window.
    #[inline]
    pub const fn content_size(&self, outer: SurfaceSize) -> SurfaceSize {
        SurfaceSize::new(outer.width, outer.height.saturating_sub(self.inset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_size() {
        assert!(SurfaceSize::new(0, 10).is_empty());
        assert!(SurfaceSize::new(10, 0).is_empty());
        assert!(!SurfaceSize::new(1, 1).is_empty());
        assert_eq!(SurfaceSize::new(100, 80).area(), 8000);
    }

    #[test]
    fn local_coordinates_flip_vertical_axis() {
        let frame = SurfaceFrame::from_size(200.0, 100.0);
        assert_eq!(frame.to_local(10.0, 0.0), (10.0, 100.0));
        assert_eq!(frame.to_local(10.0, 100.0), (10.0, 0.0));
        assert_eq!(frame.to_local(10.0, 25.0), (10.0, 75.0));
    }

    #[test]
    fn local_coordinates_remove_origin() {
        let frame = SurfaceFrame::new(5.0, 10.0, 50.0, 40.0);
        assert_eq!(frame.to_local(5.0, 10.0), (0.0, 40.0));
        assert_eq!(frame.to_local(15.0, 30.0), (10.0, 20.0));
    }

    #[test]
    fn chrome_subtracts_title_bar() {
        let chrome = Chrome::new(Chrome::TITLE_BAR);
        assert_eq!(
            chrome.content_size(SurfaceSize::new(640, 480)),
            SurfaceSize::new(640, 452)
        );
        assert!(chrome.content_size(SurfaceSize::new(640, 20)).is_empty());
        assert_eq!(
            Chrome::NONE.content_size(SurfaceSize::new(3, 4)),
            SurfaceSize::new(3, 4)
        );
    }
}
