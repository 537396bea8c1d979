#![forbid(unsafe_code)]

//! The host: one engine, any number of surfaces, one process.
//!
//! # Lifecycle
//!
//! 1. [`Host::open_surface`] registers a surface and resolves its identity.
//! 2. [`Host::start`] calls engine init and posts the first redraw.
//! 3. The window backend pulls [`Host::next_redraw`] and answers each one
//!    with [`Host::redraw`], which ticks, reacts, composites, and posts the
//!    next redraw for that surface.
//! 4. A quit cycle state, [`Host::quit`], or [`Host::close_surface`] closes
//!    the engine and terminates the process through [`ProcessExit`].
//!
//! Input never goes through the redraw path; [`Host::handle_input`] hands it
//! straight to the surface's translator.
//!
//! # Example
//!
//! ```ignore
//! let mut host = Host::new(engine, HostConfig::default());
//! let surface = host.open_surface(Some("Terrain"), frame);
//! host.start(surface);
//! while let Some(id) = host.next_redraw() {
//!     host.redraw(id, size, &mut canvas);
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use tracing::{debug, info, warn};

use simhost_core::{
    CycleState, Engine, EngineDimensions, Identity, MenuCommand, RawInput, SurfaceFrame,
    SurfaceSize,
};
use simhost_render::{CompositeOutcome, DrawTarget};

use crate::clock::{Clock, SystemClock};
use crate::config::HostConfig;
use crate::exit::{ExitCode, ProcessExit, StdProcessExit};
use crate::scheduler::RedrawScheduler;
use crate::seed::SeedSource;
use crate::surface::{RenameError, SurfaceId, SurfaceLoop, SurfaceState};

/// Whether the process keeps going after a host operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    Continue,
    Terminated,
}

/// What one redraw did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub surface: SurfaceId,
    /// Tick classification, `None` if the surface was not running.
    pub state: Option<CycleState>,
    /// Compositing result, `None` if no frame was attempted.
    pub composite: Option<CompositeOutcome>,
    pub flow: Flow,
}

/// Drives an engine across all open surfaces.
pub struct Host<E: Engine, X: ProcessExit = StdProcessExit, C: Clock = SystemClock> {
    engine: E,
    exit: X,
    clock: C,
    config: HostConfig,
    seeds: SeedSource,
    surfaces: Vec<SurfaceLoop>,
    scheduler: RedrawScheduler,
    closed: bool,
}

impl<E: Engine> Host<E> {
    /// Host using the system clock and real process exit.
    pub fn new(engine: E, config: HostConfig) -> Self {
        Self::with_parts(engine, config, StdProcessExit, SystemClock)
    }
}

impl<E: Engine, X: ProcessExit, C: Clock> Host<E, X, C> {
    /// Host with explicit exit and clock implementations.
    pub fn with_parts(engine: E, config: HostConfig, exit: X, clock: C) -> Self {
        let seeds = SeedSource::from_override(config.seed);
        Self {
            engine,
            exit,
            clock,
            config,
            seeds,
            surfaces: Vec::new(),
            scheduler: RedrawScheduler::new(),
            closed: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn exit(&self) -> &X {
        &self.exit
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Whether shutdown has run.
    pub fn is_terminated(&self) -> bool {
        self.closed
    }

    /// Register a surface. It stays idle until [`start`](Self::start).
    pub fn open_surface(&mut self, name: Option<&str>, frame: SurfaceFrame) -> SurfaceId {
        let id = SurfaceId::new(self.surfaces.len());
        let surface = SurfaceLoop::new(name, frame);
        debug!(surface = id.index(), identity = %surface.identity(), "surface opened");
        self.surfaces.push(surface);
        id
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&SurfaceLoop> {
        self.surfaces.get(id.index())
    }

    pub fn surfaces(&self) -> impl Iterator<Item = (SurfaceId, &SurfaceLoop)> {
        self.surfaces
            .iter()
            .enumerate()
            .map(|(index, surface)| (SurfaceId::new(index), surface))
    }

    /// Rename a surface that has not started yet.
    pub fn rename_surface(
        &mut self,
        id: SurfaceId,
        name: Option<&str>,
    ) -> Option<Result<Identity, RenameError>> {
        self.surfaces.get_mut(id.index()).map(|s| s.rename(name))
    }

    /// Update a surface's placement in its window.
    pub fn set_surface_frame(&mut self, id: SurfaceId, frame: SurfaceFrame) {
        if let Some(surface) = self.surfaces.get_mut(id.index()) {
            surface.set_frame(frame);
        }
    }

    /// Start a surface: engine init with a fresh seed, then the first redraw.
    ///
    /// Init failure shuts the whole process down.
    pub fn start(&mut self, id: SurfaceId) -> Flow {
        if self.closed {
            return Flow::Terminated;
        }
        let seed = self.seeds.next();
        let Some(surface) = self.surfaces.get_mut(id.index()) else {
            return Flow::Continue;
        };
        if surface.state() != SurfaceState::Uninitialized {
            return Flow::Continue;
        }
        match surface.start(&mut self.engine, seed) {
            Ok(_) => {
                self.scheduler.request(id);
                Flow::Continue
            }
            Err(_) => {
                self.shutdown(ExitCode::InitFailure);
                Flow::Terminated
            }
        }
    }

    /// Next surface waiting for a redraw.
    pub fn next_redraw(&mut self) -> Option<SurfaceId> {
        self.scheduler.next()
    }

    /// Whether a redraw is pending for `id`.
    pub fn redraw_pending(&self, id: SurfaceId) -> bool {
        self.scheduler.is_pending(id)
    }

    /// Redraw one surface into `target`.
    ///
    /// `outer` is the surface size including chrome. After a frame the next
    /// redraw for the same surface is posted immediately; there is no
    /// throttle.
    pub fn redraw<T: DrawTarget + ?Sized>(
        &mut self,
        id: SurfaceId,
        outer: SurfaceSize,
        target: &mut T,
    ) -> FrameReport {
        let content = self.config.chrome.content_size(outer);
        let now = self.clock.now_secs();
        let step = match self.surfaces.get_mut(id.index()) {
            Some(surface) if !self.closed => {
                surface.step(&mut self.engine, now, &mut self.seeds, content, target)
            }
            _ => None,
        };

        let Some(step) = step else {
            return FrameReport {
                surface: id,
                state: None,
                composite: None,
                flow: self.flow(),
            };
        };

        if step.state == CycleState::Quit {
            info!(surface = id.index(), "engine requested quit");
            self.shutdown(ExitCode::Success);
        } else {
            self.scheduler.request(id);
        }

        FrameReport {
            surface: id,
            state: Some(step.state),
            composite: step.composite,
            flow: self.flow(),
        }
    }

    /// Forward one input event to a surface.
    pub fn handle_input(&mut self, id: SurfaceId, input: &RawInput) -> usize {
        if self.closed {
            return 0;
        }
        match self.surfaces.get_mut(id.index()) {
            Some(surface) => surface.handle_input(&mut self.engine, input),
            None => 0,
        }
    }

    /// Send a menu command.
    pub fn menu(&mut self, command: MenuCommand) -> Option<i32> {
        if self.closed {
            return None;
        }
        let reply = self.engine.menu(command);
        debug!(command = command.label(), id = command.id(), ?reply, "menu command");
        reply
    }

    /// Restart the simulation with a fresh seed.
    pub fn new_simulation(&mut self) {
        if !self.closed {
            let seed = self.seeds.next();
            self.engine.new_simulation(seed);
        }
    }

    /// Replace the agent population with a fresh seed.
    pub fn new_agents(&mut self) {
        if !self.closed {
            let seed = self.seeds.next();
            self.engine.new_agents(seed);
        }
    }

    /// Hand a file to the engine.
    pub fn open_file(&mut self, path: &Path, is_script: bool) -> bool {
        if self.closed {
            return false;
        }
        let accepted = self.engine.open_file_name(path, is_script);
        if !accepted {
            warn!(path = %path.display(), is_script, "engine rejected file");
        }
        accepted
    }

    pub fn save_file(&mut self, path: &Path) {
        if !self.closed {
            self.engine.save_file_name(path);
        }
    }

    pub fn debug_script(&mut self, path: &Path) {
        if !self.closed {
            self.engine.script_debug_handle(path);
        }
    }

    pub fn about(&mut self) {
        if !self.closed {
            self.engine.about();
        }
    }

    /// Redraw interval the engine is tuned for. Advisory only.
    pub fn preferred_interval(&self) -> Option<Duration> {
        match self.engine.max_fps() {
            0 => None,
            fps => Some(Duration::from_secs(1) / fps),
        }
    }

    pub fn dimensions(&self) -> EngineDimensions {
        self.engine.dimensions()
    }

    /// User-initiated quit.
    pub fn quit(&mut self) {
        info!("quit requested");
        self.shutdown(ExitCode::Success);
    }

    /// A surface's window was closed. Ends the whole process.
    pub fn close_surface(&mut self, id: SurfaceId) {
        info!(surface = id.index(), "surface closed");
        self.shutdown(ExitCode::Success);
    }

    fn shutdown(&mut self, code: ExitCode) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.scheduler.clear();
        for surface in &mut self.surfaces {
            surface.terminate();
        }
        self.engine.close();
        self.exit.exit(code);
    }

    fn flow(&self) -> Flow {
        if self.closed {
            Flow::Terminated
        } else {
            Flow::Continue
        }
    }
}
