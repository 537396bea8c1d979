//! Compositor behavior against a scripted engine and a state-tracking target.

use std::path::Path;

use pretty_assertions::assert_eq;
use simhost_core::{
    CycleState, Engine, Identity, InitError, MenuCommand, PixelBuffer, Seed, SurfaceSize,
};
use simhost_render::{
    BufferError, Canvas, CompositeOutcome, DrawTarget, Image, Interpolation, Rect, SkipReason,
    composite,
};

/// What the engine hands back from `draw`.
#[derive(Clone, Copy)]
enum Reply {
    Exact,
    Missing,
    WrongSize(SurfaceSize),
    ShortBytes,
}

struct FrameEngine {
    reply: Reply,
    frame: Vec<u8>,
    requests: Vec<(Identity, SurfaceSize, bool)>,
}

impl FrameEngine {
    fn new(reply: Reply) -> Self {
        Self {
            reply,
            frame: Vec::new(),
            requests: Vec::new(),
        }
    }
}

impl Engine for FrameEngine {
    fn init(&mut self, identity: Identity, _seed: Seed) -> Result<Identity, InitError> {
        Ok(identity)
    }
    fn cycle(&mut self, _time_secs: u64, _identity: Identity) -> CycleState {
        CycleState::Ok
    }
    fn draw(
        &mut self,
        identity: Identity,
        size: SurfaceSize,
        changed: bool,
    ) -> Option<PixelBuffer<'_>> {
        self.requests.push((identity, size, changed));
        let size = match self.reply {
            Reply::Missing => return None,
            Reply::Exact | Reply::ShortBytes => size,
            Reply::WrongSize(other) => other,
        };
        let mut len = size.area() as usize * 4;
        if matches!(self.reply, Reply::ShortBytes) {
            len -= 1;
        }
        self.frame.clear();
        self.frame.resize(len, 0);
        for quad in self.frame.chunks_exact_mut(4) {
            quad.copy_from_slice(&[0xEE, 0x10, 0x20, 0x30]);
        }
        Some(PixelBuffer::new(&self.frame, size))
    }
    fn close(&mut self) {}
    fn key_received(&mut self, _code: u32, _identity: Identity) {}
    fn key_up(&mut self) {}
    fn mouse_received(&mut self, _x: f64, _y: f64, _identity: Identity) {}
    fn mouse_up(&mut self) {}
    fn mouse_option(&mut self, _extended: bool) {}
    fn delta(&mut self, _dx: f64, _dy: f64, _identity: Identity) {}
    fn zoom(&mut self, _amount: f64, _identity: Identity) {}
    fn rotate(&mut self, _amount: f64, _identity: Identity) {}
    fn new_simulation(&mut self, _seed: Seed) {}
    fn new_agents(&mut self, _seed: Seed) {}
    fn menu(&mut self, _command: MenuCommand) -> Option<i32> {
        None
    }
    fn max_fps(&self) -> u32 {
        60
    }
    fn open_file_name(&mut self, _path: &Path, _is_script: bool) -> bool {
        false
    }
    fn save_file_name(&mut self, _path: &Path) {}
    fn script_debug_handle(&mut self, _path: &Path) {}
}

#[derive(Default)]
struct TrackingTarget {
    content: Rect,
    depth: i32,
    saves: u32,
    interpolation: Interpolation,
    drawn: Vec<(SurfaceSize, Rect, Interpolation)>,
}

impl DrawTarget for TrackingTarget {
    fn content_rect(&self) -> Rect {
        self.content
    }
    fn save_state(&mut self) {
        self.depth += 1;
        self.saves += 1;
    }
    fn restore_state(&mut self) {
        self.depth -= 1;
        self.interpolation = Interpolation::Smooth;
    }
    fn interpolation(&self) -> Interpolation {
        self.interpolation
    }
    fn set_interpolation(&mut self, interpolation: Interpolation) {
        self.interpolation = interpolation;
    }
    fn draw_image(&mut self, image: &Image<'_>, dest: Rect) {
        self.drawn.push((image.size(), dest, self.interpolation));
    }
}

fn target(width: u32, height: u32) -> TrackingTarget {
    TrackingTarget {
        content: Rect::new(0, 0, width, height),
        ..TrackingTarget::default()
    }
}

#[test]
fn draws_exactly_the_requested_size() {
    let mut engine = FrameEngine::new(Reply::Exact);
    let mut target = target(100, 80);
    let outcome = composite(
        &mut engine,
        Identity::new(5),
        SurfaceSize::new(100, 80),
        &mut target,
    );

    assert_eq!(outcome, CompositeOutcome::Drawn(SurfaceSize::new(100, 80)));
    assert_eq!(
        engine.requests,
        vec![(Identity::new(5), SurfaceSize::new(100, 80), false)]
    );
    assert_eq!(
        target.drawn,
        vec![(
            SurfaceSize::new(100, 80),
            Rect::new(0, 0, 100, 80),
            Interpolation::Nearest
        )]
    );
    assert_eq!(target.depth, 0);
    assert_eq!(target.interpolation, Interpolation::Smooth);
}

#[test]
fn zero_width_or_height_is_a_silent_no_op() {
    for size in [SurfaceSize::new(0, 80), SurfaceSize::new(100, 0)] {
        let mut engine = FrameEngine::new(Reply::Exact);
        let mut target = target(100, 80);
        let outcome = composite(&mut engine, Identity::VIEW, size, &mut target);
        assert_eq!(outcome, CompositeOutcome::Skipped(SkipReason::EmptySurface));
        assert!(engine.requests.is_empty());
        assert!(target.drawn.is_empty());
        assert_eq!(target.saves, 0);
    }
}

#[test]
fn missing_buffer_restores_state() {
    let mut engine = FrameEngine::new(Reply::Missing);
    let mut target = target(10, 10);
    let outcome = composite(
        &mut engine,
        Identity::TERRAIN,
        SurfaceSize::new(10, 10),
        &mut target,
    );
    assert_eq!(outcome, CompositeOutcome::Skipped(SkipReason::NoBuffer));
    assert_eq!((target.saves, target.depth), (1, 0));
    assert!(target.drawn.is_empty());
}

#[test]
fn mismatched_size_is_never_drawn() {
    let mut engine = FrameEngine::new(Reply::WrongSize(SurfaceSize::new(9, 10)));
    let mut target = target(10, 10);
    let outcome = composite(
        &mut engine,
        Identity::VIEW,
        SurfaceSize::new(10, 10),
        &mut target,
    );
    assert_eq!(
        outcome,
        CompositeOutcome::Skipped(SkipReason::SizeMismatch {
            requested: SurfaceSize::new(10, 10),
            returned: SurfaceSize::new(9, 10),
        })
    );
    assert!(target.drawn.is_empty());
    assert_eq!(target.depth, 0);
}

#[test]
fn malformed_bytes_are_skipped() {
    let mut engine = FrameEngine::new(Reply::ShortBytes);
    let mut target = target(2, 2);
    let outcome = composite(
        &mut engine,
        Identity::VIEW,
        SurfaceSize::new(2, 2),
        &mut target,
    );
    assert_eq!(
        outcome,
        CompositeOutcome::Skipped(SkipReason::InvalidBuffer(BufferError::LengthMismatch {
            expected: 16,
            actual: 15,
        }))
    );
    assert_eq!(target.depth, 0);
}

#[test]
fn canvas_receives_opaque_pixels_below_chrome() {
    let mut engine = FrameEngine::new(Reply::Exact);
    let mut pixels = vec![0u32; 4 * 6];
    let mut canvas = Canvas::new(&mut pixels, SurfaceSize::new(4, 6), 2).expect("canvas");
    let outcome = composite(
        &mut engine,
        Identity::CONTROL,
        SurfaceSize::new(4, 4),
        &mut canvas,
    );

    assert!(outcome.is_drawn());
    assert_eq!(canvas.pixel(0, 0), Some(0));
    assert_eq!(canvas.pixel(0, 1), Some(0));
    assert_eq!(canvas.pixel(0, 2), Some(0x0010_2030));
    assert_eq!(canvas.pixel(3, 5), Some(0x0010_2030));
    assert_eq!(canvas.interpolation(), Interpolation::Smooth);
    assert_eq!(canvas.saved_depth(), 0);
}
