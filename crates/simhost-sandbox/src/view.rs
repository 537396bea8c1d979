#![forbid(unsafe_code)]

//! Viewport, drag selection, and rasterizing the board into a frame.

use simhost_core::{PixelBuffer, SurfaceSize};

use crate::battle::Battle;
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};

const BLACK: [u8; 3] = [0, 0, 0];
const WHITE: [u8; 3] = [255, 255, 255];

/// Unit colour by side, `[unselected, selected]`.
const SIDE_COLOURS: [[[u8; 3]; 2]; 2] = [
    [[76, 76, 153], [128, 128, 255]],
    [[153, 76, 76], [255, 128, 128]],
];

/// Zoom is kept strictly inside this open range, in hundredths.
const ZOOM_LIMITS: (i32, i32) = (-100, 128);

/// Inclusive rectangle in board cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl BoardRect {
    /// Rectangle spanning two corners in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            left: x0.min(x1),
            top: y0.min(y1),
            right: x0.max(x1),
            bottom: y0.max(y1),
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.left..=self.right).contains(&x) && (self.top..=self.bottom).contains(&y)
    }

    fn on_edge(&self, x: i32, y: i32) -> bool {
        self.contains(x, y)
            && (x == self.left || x == self.right || y == self.top || y == self.bottom)
    }
}

/// Pan and zoom, both in hundredths of a board cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pan_x: i32,
    pan_y: i32,
    zoom: i32,
}

impl Viewport {
    pub fn pan(&self) -> (i32, i32) {
        (self.pan_x, self.pan_y)
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.pan_x = self.pan_x.saturating_add((dx * 100.0) as i32);
        self.pan_y = self.pan_y.saturating_add((dy * 100.0) as i32);
    }

    /// Apply a zoom step. Steps that would leave the allowed range are
    /// dropped entirely.
    pub fn zoom_by(&mut self, amount: f64) -> bool {
        let total = self.zoom.saturating_add((amount * 100.0) as i32);
        if total > ZOOM_LIMITS.0 && total < ZOOM_LIMITS.1 {
            self.zoom = total;
            true
        } else {
            false
        }
    }

    fn scale(&self) -> f64 {
        1.0 + f64::from(self.zoom) / 100.0
    }

    /// Board cell under surface point `(x, y)`, origin top left.
    pub fn to_board(&self, x: f64, y: f64, size: SurfaceSize) -> (f64, f64) {
        let (w, h) = (f64::from(size.width.max(1)), f64::from(size.height.max(1)));
        let (bw, bh) = (f64::from(BOARD_WIDTH), f64::from(BOARD_HEIGHT));
        let base_x = x * bw / w;
        let base_y = y * bh / h;
        let scale = self.scale();
        (
            bw / 2.0 + (base_x - bw / 2.0) / scale - f64::from(self.pan_x) / 100.0,
            bh / 2.0 + (base_y - bh / 2.0) / scale + f64::from(self.pan_y) / 100.0,
        )
    }
}

/// A drag rectangle in surface coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Selection {
    start: Option<(f64, f64)>,
    end: (f64, f64),
    extend: bool,
}

impl Selection {
    /// Record a pointer sample. The first sample anchors the rectangle.
    pub fn sample(&mut self, x: f64, y: f64) {
        if self.start.is_none() {
            self.start = Some((x, y));
        }
        self.end = (x, y);
    }

    pub fn set_extend(&mut self, extend: bool) {
        self.extend = extend;
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some()
    }

    /// Current rectangle in board cells.
    pub fn board_rect(&self, viewport: &Viewport, size: SurfaceSize) -> Option<BoardRect> {
        let (sx, sy) = self.start?;
        let (x0, y0) = viewport.to_board(sx, sy, size);
        let (x1, y1) = viewport.to_board(self.end.0, self.end.1, size);
        Some(BoardRect::new(
            x0.round() as i32,
            y0.round() as i32,
            x1.round() as i32,
            y1.round() as i32,
        ))
    }

    /// End the drag, returning the rectangle and whether it extends the
    /// existing selection.
    pub fn finish(&mut self, viewport: &Viewport, size: SurfaceSize) -> Option<(BoardRect, bool)> {
        let rect = self.board_rect(viewport, size);
        let extend = self.extend;
        *self = Self::default();
        rect.map(|r| (r, extend))
    }
}

/// Reusable output storage for engine frames.
///
/// The buffer only grows. A smaller frame reuses the existing allocation.
#[derive(Debug, Default)]
pub struct FrameStore {
    bytes: Vec<u8>,
    board: Vec<[u8; 3]>,
    grows: usize,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times the output buffer had to be enlarged.
    pub fn grows(&self) -> usize {
        self.grows
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    fn prepare(&mut self, len: usize) -> &mut [u8] {
        if self.bytes.len() < len {
            self.bytes.resize(len, 0);
            self.grows += 1;
        }
        &mut self.bytes[..len]
    }

    /// Render `battle` through `viewport` at `size`.
    pub fn render(
        &mut self,
        battle: &Battle,
        viewport: &Viewport,
        selection: Option<BoardRect>,
        size: SurfaceSize,
    ) -> Option<PixelBuffer<'_>> {
        if size.is_empty() {
            return None;
        }
        let len = usize::try_from(size.area())
            .ok()?
            .checked_mul(PixelBuffer::BYTES_PER_PIXEL)?;

        self.rasterize(battle, selection);
        let board = std::mem::take(&mut self.board);
        let out = self.prepare(len);

        let (w, h) = (size.width as usize, size.height as usize);
        for row in 0..h {
            for col in 0..w {
                let (bx, by) = viewport.to_board(col as f64 + 0.5, row as f64 + 0.5, size);
                let (bx, by) = (bx.floor() as i32, by.floor() as i32);
                let colour = if (0..BOARD_WIDTH).contains(&bx) && (0..BOARD_HEIGHT).contains(&by) {
                    board[(by * BOARD_WIDTH + bx) as usize]
                } else {
                    BLACK
                };
                let offset = (row * w + col) * PixelBuffer::BYTES_PER_PIXEL;
                out[offset] = 0;
                out[offset + 1..offset + 4].copy_from_slice(&colour);
            }
        }
        self.board = board;
        Some(PixelBuffer::new(&self.bytes[..len], size))
    }

    fn rasterize(&mut self, battle: &Battle, selection: Option<BoardRect>) {
        let cells = (BOARD_WIDTH * BOARD_HEIGHT) as usize;
        self.board.clear();
        self.board.resize(cells, BLACK);

        for unit in battle.units() {
            let colour = SIDE_COLOURS[usize::from(unit.alignment.min(1))][usize::from(unit.selected)];
            for c in unit.combatants.iter().filter(|c| c.is_alive()) {
                if (0..BOARD_WIDTH).contains(&c.x) && (0..BOARD_HEIGHT).contains(&c.y) {
                    self.board[(c.y * BOARD_WIDTH + c.x) as usize] = colour;
                }
            }
        }

        if let Some(rect) = selection {
            let left = rect.left.clamp(0, BOARD_WIDTH - 1);
            let right = rect.right.clamp(0, BOARD_WIDTH - 1);
            let top = rect.top.clamp(0, BOARD_HEIGHT - 1);
            let bottom = rect.bottom.clamp(0, BOARD_HEIGHT - 1);
            for y in top..=bottom {
                for x in left..=right {
                    if rect.on_edge(x, y) {
                        self.board[(y * BOARD_WIDTH + x) as usize] = WHITE;
                    }
                }
            }
        }
    }
}
