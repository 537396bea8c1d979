#![forbid(unsafe_code)]

//! Draw targets.
//!
//! A [`DrawTarget`] is anything the compositor can blit a frame into. It
//! carries a small graphics state (currently just the interpolation mode)
//! with save/restore semantics, so temporary changes made while drawing one
//! frame never leak into the next.
//!
//! [`Canvas`] is the software target used by the desktop backend and the
//! tests: a borrowed slice of `0x00RRGGBB` words, rows top first.
//!
//! Targets start out in [`Interpolation::Smooth`], the way platform image
//! contexts default to smoothing; the compositor switches it off per frame.

use simhost_core::SurfaceSize;

use crate::image::{BufferError, Image};

/// A rectangle in target pixels, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: SurfaceSize) -> Self {
        Self::new(0, 0, size.width, size.height)
    }

    /// Size of the rectangle.
    #[inline]
    pub const fn size(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.height)
    }
}

/// How an image is resampled when its size differs from the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Each destination pixel copies the nearest source pixel.
    Nearest,
    /// Bilinear filtering.
    #[default]
    Smooth,
}

/// Something the compositor can draw into.
pub trait DrawTarget {
    /// Region reserved for simulation content, excluding any chrome.
    fn content_rect(&self) -> Rect;

    /// Push the current graphics state.
    fn save_state(&mut self);

    /// Pop the most recently saved graphics state. Unbalanced calls are
    /// ignored.
    fn restore_state(&mut self);

    fn interpolation(&self) -> Interpolation;
    fn set_interpolation(&mut self, interpolation: Interpolation);

    /// Draw `image` scaled to fill `dest`, clipped to the target.
    fn draw_image(&mut self, image: &Image<'_>, dest: Rect);
}

/// Saves target state on creation and restores it on drop.
///
/// Every exit path out of a drawing scope restores the state, including
/// early returns.
pub struct StateGuard<'t, T: DrawTarget + ?Sized> {
    target: &'t mut T,
}

impl<'t, T: DrawTarget + ?Sized> StateGuard<'t, T> {
    /// Save the target's state.
    pub fn new(target: &'t mut T) -> Self {
        target.save_state();
        Self { target }
    }
}

impl<T: DrawTarget + ?Sized> std::ops::Deref for StateGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.target
    }
}

impl<T: DrawTarget + ?Sized> std::ops::DerefMut for StateGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.target
    }
}

impl<T: DrawTarget + ?Sized> Drop for StateGuard<'_, T> {
    fn drop(&mut self) {
        self.target.restore_state();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct GraphicsState {
    interpolation: Interpolation,
}

/// Software draw target over a borrowed pixel slice.
#[derive(Debug)]
pub struct Canvas<'a> {
    pixels: &'a mut [u32],
    size: SurfaceSize,
    inset: u32,
    state: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl<'a> Canvas<'a> {
    /// Wrap `pixels` as a `size` canvas whose top `inset` rows are chrome.
    pub fn new(pixels: &'a mut [u32], size: SurfaceSize, inset: u32) -> Result<Self, BufferError> {
        let expected = usize::try_from(size.area()).map_err(|_| BufferError::TooLarge)?;
        if pixels.len() != expected {
            return Err(BufferError::LengthMismatch {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            size,
            inset,
            state: GraphicsState::default(),
            saved: Vec::new(),
        })
    }

    /// A zero-sized canvas for frames with nothing to show.
    pub fn empty() -> Self {
        Self {
            pixels: Default::default(),
            size: SurfaceSize::default(),
            inset: 0,
            state: GraphicsState::default(),
            saved: Vec::new(),
        }
    }

    /// Canvas size including chrome.
    #[inline]
    pub const fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Number of saved graphics states.
    #[inline]
    pub fn saved_depth(&self) -> usize {
        self.saved.len()
    }

    /// Pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    /// Fill the whole canvas.
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    fn row_mut(&mut self, y: u32) -> &mut [u32] {
        let width = self.size.width as usize;
        let start = y as usize * width;
        &mut self.pixels[start..start + width]
    }
}

impl DrawTarget for Canvas<'_> {
    fn content_rect(&self) -> Rect {
        let inset = self.inset.min(self.size.height);
        Rect::new(0, inset, self.size.width, self.size.height - inset)
    }

    fn save_state(&mut self) {
        self.saved.push(self.state);
    }

    fn restore_state(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn interpolation(&self) -> Interpolation {
        self.state.interpolation
    }

    fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.state.interpolation = interpolation;
    }

    fn draw_image(&mut self, image: &Image<'_>, dest: Rect) {
        if dest.is_empty() {
            return;
        }
        let src = image.size();
        let right = dest.right().min(self.size.width);
        let bottom = dest.bottom().min(self.size.height);
        let interpolation = self.state.interpolation;

        if src == dest.size() {
            for y in dest.y..bottom {
                let sy = y - dest.y;
                let src_row = image.row(sy);
                let row = self.row_mut(y);
                for x in dest.x..right {
                    let i = (x - dest.x) as usize * 4;
                    row[x as usize] = crate::image::pack(&src_row[i..i + 4]);
                }
            }
            return;
        }

        for y in dest.y..bottom {
            let dy = y - dest.y;
            let row_start = y as usize * self.size.width as usize;
            for x in dest.x..right {
                let dx = x - dest.x;
                let value = match interpolation {
                    Interpolation::Nearest => {
                        let sx = scale_index(dx, dest.width, src.width);
                        let sy = scale_index(dy, dest.height, src.height);
                        image.pixel(sx, sy)
                    }
                    Interpolation::Smooth => sample_bilinear(image, dx, dy, dest),
                };
                self.pixels[row_start + x as usize] = value;
            }
        }
    }
}

#[inline]
fn scale_index(d: u32, dest_len: u32, src_len: u32) -> u32 {
    let s = (u64::from(d) * u64::from(src_len)) / u64::from(dest_len);
    (s as u32).min(src_len - 1)
}

fn sample_bilinear(image: &Image<'_>, dx: u32, dy: u32, dest: Rect) -> u32 {
    let src = image.size();
    let fx = ((f64::from(dx) + 0.5) * f64::from(src.width) / f64::from(dest.width) - 0.5)
        .clamp(0.0, f64::from(src.width - 1));
    let fy = ((f64::from(dy) + 0.5) * f64::from(src.height) / f64::from(dest.height) - 0.5)
        .clamp(0.0, f64::from(src.height - 1));
    let x0 = fx.floor() as u32;
    let y0 = fy.floor() as u32;
    let x1 = (x0 + 1).min(src.width - 1);
    let y1 = (y0 + 1).min(src.height - 1);
    let tx = fx - f64::from(x0);
    let ty = fy - f64::from(y0);

    let p00 = image.pixel(x0, y0);
    let p10 = image.pixel(x1, y0);
    let p01 = image.pixel(x0, y1);
    let p11 = image.pixel(x1, y1);

    let mut out = 0u32;
    for shift in [16u32, 8, 0] {
        let c = |p: u32| f64::from((p >> shift) & 0xFF);
        let top = c(p00) * (1.0 - tx) + c(p10) * tx;
        let bottom = c(p01) * (1.0 - tx) + c(p11) * tx;
        let v = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u32;
        out |= v << shift;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use simhost_core::PixelBuffer;

    fn checker(size: SurfaceSize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(size.area() as usize * 4);
        for y in 0..size.height {
            for x in 0..size.width {
                let on = (x + y) % 2 == 0;
                let v = if on { 0xFF } else { 0x00 };
                bytes.extend_from_slice(&[0, v, v, v]);
            }
        }
        bytes
    }

    #[test]
    fn canvas_rejects_wrong_length() {
        let mut pixels = vec![0u32; 5];
        assert!(matches!(
            Canvas::new(&mut pixels, SurfaceSize::new(2, 3), 0),
            Err(BufferError::LengthMismatch {
                expected: 6,
                actual: 5
            })
        ));
    }

    #[test]
    fn empty_canvas_has_no_content() {
        let canvas = Canvas::empty();
        assert!(canvas.size().is_empty());
        assert!(canvas.content_rect().is_empty());
        assert_eq!(canvas.pixel(0, 0), None);
    }

    #[test]
    fn content_rect_excludes_inset() {
        let mut pixels = vec![0u32; 40];
        let canvas = Canvas::new(&mut pixels, SurfaceSize::new(4, 10), 3).expect("canvas");
        assert_eq!(canvas.content_rect(), Rect::new(0, 3, 4, 7));

        let mut small = vec![0u32; 8];
        let canvas = Canvas::new(&mut small, SurfaceSize::new(4, 2), 28).expect("canvas");
        assert!(canvas.content_rect().is_empty());
    }

    #[test]
    fn state_restores_after_guard() {
        let mut pixels = vec![0u32; 4];
        let mut canvas = Canvas::new(&mut pixels, SurfaceSize::new(2, 2), 0).expect("canvas");
        assert_eq!(canvas.interpolation(), Interpolation::Smooth);
        {
            let mut guard = StateGuard::new(&mut canvas);
            guard.set_interpolation(Interpolation::Nearest);
            assert_eq!(guard.interpolation(), Interpolation::Nearest);
        }
        assert_eq!(canvas.interpolation(), Interpolation::Smooth);
        assert_eq!(canvas.saved_depth(), 0);
    }

    #[test]
    fn unbalanced_restore_is_ignored() {
        let mut pixels = vec![0u32; 1];
        let mut canvas = Canvas::new(&mut pixels, SurfaceSize::new(1, 1), 0).expect("canvas");
        canvas.set_interpolation(Interpolation::Nearest);
        canvas.restore_state();
        assert_eq!(canvas.interpolation(), Interpolation::Nearest);
    }

    #[test]
    fn same_size_draw_copies_exactly() {
        let size = SurfaceSize::new(3, 2);
        let bytes = checker(size);
        let image = Image::from_buffer(PixelBuffer::new(&bytes, size)).expect("image");
        let mut pixels = vec![0x0012_3456u32; 6];
        let mut canvas = Canvas::new(&mut pixels, size, 0).expect("canvas");
        canvas.draw_image(&image, Rect::from_size(size));
        assert_eq!(canvas.pixel(0, 0), Some(0x00FF_FFFF));
        assert_eq!(canvas.pixel(1, 0), Some(0));
        assert_eq!(canvas.pixel(1, 1), Some(0x00FF_FFFF));
    }

    #[test]
    fn nearest_upscale_preserves_cells() {
        let size = SurfaceSize::new(2, 2);
        let bytes = checker(size);
        let image = Image::from_buffer(PixelBuffer::new(&bytes, size)).expect("image");
        let mut pixels = vec![0u32; 16];
        let mut canvas = Canvas::new(&mut pixels, SurfaceSize::new(4, 4), 0).expect("canvas");
        canvas.set_interpolation(Interpolation::Nearest);
        canvas.draw_image(&image, Rect::new(0, 0, 4, 4));
        for y in 0..4 {
            for x in 0..4 {
                let expected = if (x / 2 + y / 2) % 2 == 0 { 0x00FF_FFFF } else { 0 };
                assert_eq!(canvas.pixel(x, y), Some(expected), "at ({x},{y})");
            }
        }
    }

    #[test]
    fn smooth_upscale_blends() {
        let size = SurfaceSize::new(2, 1);
        let bytes = [0, 0, 0, 0, 0, 0xFF, 0xFF, 0xFF];
        let image = Image::from_buffer(PixelBuffer::new(&bytes, size)).expect("image");
        let mut pixels = vec![0u32; 4];
        let mut canvas = Canvas::new(&mut pixels, SurfaceSize::new(4, 1), 0).expect("canvas");
        canvas.draw_image(&image, Rect::new(0, 0, 4, 1));
        let mid = canvas.pixel(1, 0).expect("in bounds") & 0xFF;
        assert!(mid > 0 && mid < 0xFF, "expected a blended value, got {mid:#x}");
    }

    #[test]
    fn draw_is_clipped_to_canvas() {
        let size = SurfaceSize::new(4, 4);
        let bytes = checker(size);
        let image = Image::from_buffer(PixelBuffer::new(&bytes, size)).expect("image");
        let mut pixels = vec![7u32; 4];
        let mut canvas = Canvas::new(&mut pixels, SurfaceSize::new(2, 2), 0).expect("canvas");
        canvas.draw_image(&image, Rect::new(1, 1, 4, 4));
        assert_eq!(canvas.pixel(0, 0), Some(7));
        assert_eq!(canvas.pixel(1, 1), Some(0x00FF_FFFF));
    }
}
