#![forbid(unsafe_code)]

//! The synchronous call surface of a simulation engine.
//!
//! The host never looks inside an engine. Everything it knows about a running
//! simulation comes back through the return values of these calls: the
//! identity handed out by [`Engine::init`], the [`CycleState`] of each tick,
//! and the pixel buffer lent out by [`Engine::draw`].

use std::fmt;
use std::path::Path;

use crate::cycle::CycleState;
use crate::geometry::SurfaceSize;
use crate::identity::Identity;
use crate::menu::MenuCommand;

/// Seed for a new simulation or agent population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Seed(u32);

impl Seed {
    /// Wrap a raw seed.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw seed value.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

/// Why an engine refused to start a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// The engine returned its failure sentinel.
    Sentinel,
    /// The engine returned a value that is not a valid identity.
    OutOfRange(i64),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentinel => write!(f, "engine init reported failure"),
            Self::OutOfRange(raw) => write!(f, "engine init returned invalid identity {raw}"),
        }
    }
}

impl std::error::Error for InitError {}

/// A frame lent out by the engine.
///
/// Pixels are packed 32-bit words, four bytes each in big-endian channel
/// order `[X, R, G, B]`. The first byte is padding and the pixel is always
/// opaque. The borrow ends with the draw call that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBuffer<'a> {
    bytes: &'a [u8],
    size: SurfaceSize,
}

impl<'a> PixelBuffer<'a> {
    /// Bytes per packed pixel.
    pub const BYTES_PER_PIXEL: usize = 4;

    /// Wrap engine-owned bytes claimed to hold `size` pixels.
    ///
    /// No validation happens here; consumers check the length before use.
    #[must_use]
    pub const fn new(bytes: &'a [u8], size: SurfaceSize) -> Self {
        Self { bytes, size }
    }

    /// Raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Claimed pixel dimensions.
    #[must_use]
    pub const fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Byte length a buffer of this size must have.
    #[must_use]
    pub fn expected_len(&self) -> Option<usize> {
        usize::try_from(self.size.area())
            .ok()
            .and_then(|area| area.checked_mul(Self::BYTES_PER_PIXEL))
    }
}

/// Window layout an engine asks for when nothing else is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineDimensions {
    /// Number of surfaces to open.
    pub windows: u32,
    /// Default surface width.
    pub width: u32,
    /// Default surface height.
    pub height: u32,
    /// Whether the engine wants menu accelerators wired up.
    pub has_menus: bool,
}

impl Default for EngineDimensions {
    fn default() -> Self {
        Self {
            windows: 1,
            width: 1024,
            height: 768,
            has_menus: true,
        }
    }
}

/// A simulation engine driven by the host.
///
/// Every call is synchronous and runs on the interaction thread. Calls that
/// concern one surface carry that surface's [`Identity`].
pub trait Engine {
    /// Start (or join) a simulation for `identity`.
    ///
    /// Returns the identity the engine will use for this surface.
    fn init(&mut self, identity: Identity, seed: Seed) -> Result<Identity, InitError>;

    /// Advance one tick. `time_secs` is wall-clock seconds since the Unix
    /// epoch.
    fn cycle(&mut self, time_secs: u64, identity: Identity) -> CycleState;

    /// Render the current frame at `size`.
    ///
    /// `None` means no frame is available; the caller skips drawing.
    fn draw(
        &mut self,
        identity: Identity,
        size: SurfaceSize,
        changed: bool,
    ) -> Option<PixelBuffer<'_>>;

    /// Tear down. Calling it more than once has no further effect.
    fn close(&mut self);

    fn key_received(&mut self, code: u32, identity: Identity);
    fn key_up(&mut self);
    fn mouse_received(&mut self, x: f64, y: f64, identity: Identity);
    fn mouse_up(&mut self);
    fn mouse_option(&mut self, extended: bool);
    fn delta(&mut self, dx: f64, dy: f64, identity: Identity);
    fn zoom(&mut self, amount: f64, identity: Identity);
    fn rotate(&mut self, amount: f64, identity: Identity);

    /// Restart the whole simulation.
    fn new_simulation(&mut self, seed: Seed);
    /// Replace the agent population.
    fn new_agents(&mut self, seed: Seed);

    /// Run a menu command. Toggle commands answer with the new value.
    fn menu(&mut self, command: MenuCommand) -> Option<i32>;

    /// Upper bound on frames per second the engine is tuned for.
    fn max_fps(&self) -> u32;

    /// Load a file. Returns whether the engine accepted it.
    fn open_file_name(&mut self, path: &Path, is_script: bool) -> bool;
    fn save_file_name(&mut self, path: &Path);
    fn script_debug_handle(&mut self, path: &Path);

    /// Show engine information.
    fn about(&mut self) {}

    /// Preferred window layout.
    fn dimensions(&self) -> EngineDimensions {
        EngineDimensions::default()
    }
}
