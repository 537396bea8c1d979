#![forbid(unsafe_code)]

//! Per-surface host loop.
//!
//! A [`SurfaceLoop`] owns everything that belongs to one on-screen surface:
//! its name, the identity the engine knows it by, its cycle driver, and its
//! input translator. It moves through three states:
//!
//! ```text
//! Uninitialized --init ok--> Running --quit / close--> Terminated
//!       |                                                  ^
//!       +------------------init failed---------------------+
//! ```
//!
//! Process-wide consequences of termination (closing the engine, exiting)
//! belong to [`Host`](crate::Host); the loop only records its own state.

use std::fmt;

use tracing::{debug, info_span, warn};

use simhost_core::{
    CycleState, Engine, Identity, InitError, RawInput, Seed, SurfaceFrame, SurfaceSize, resolve,
};
use simhost_render::{CompositeOutcome, DrawTarget, composite};

use crate::cycle_driver::CycleDriver;
use crate::seed::SeedSource;
use crate::translator::Translator;

/// Handle to a surface owned by a [`Host`](crate::Host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(usize);

impl SurfaceId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

/// Lifecycle of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceState {
    #[default]
    Uninitialized,
    Running,
    Terminated,
}

/// A surface can only be renamed before it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenameError {
    pub state: SurfaceState,
}

impl fmt::Display for RenameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot rename a surface in state {:?}", self.state)
    }
}

impl std::error::Error for RenameError {}

/// Result of one redraw pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Classification of the tick.
    pub state: CycleState,
    /// Compositing result. `None` when the tick reported quit.
    pub composite: Option<CompositeOutcome>,
}

/// State and behavior of one surface.
#[derive(Debug, Clone)]
pub struct SurfaceLoop {
    name: Option<String>,
    state: SurfaceState,
    driver: CycleDriver,
    translator: Translator,
    frames: u64,
}

impl SurfaceLoop {
    /// A new, not yet started surface.
    pub fn new(name: Option<&str>, frame: SurfaceFrame) -> Self {
        Self {
            name: name.map(str::to_owned),
            state: SurfaceState::Uninitialized,
            driver: CycleDriver::new(resolve(name)),
            translator: Translator::new(frame),
            frames: 0,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Identity used for every engine call from this surface.
    pub fn identity(&self) -> Identity {
        self.driver.identity()
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SurfaceState::Running
    }

    pub fn driver(&self) -> &CycleDriver {
        &self.driver
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// Frames composited so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Update the surface placement after a move or resize.
    pub fn set_frame(&mut self, frame: SurfaceFrame) {
        self.translator.set_frame(frame);
    }

    /// Change the name and re-resolve the identity.
    pub fn rename(&mut self, name: Option<&str>) -> Result<Identity, RenameError> {
        if self.state != SurfaceState::Uninitialized {
            return Err(RenameError { state: self.state });
        }
        self.name = name.map(str::to_owned);
        self.driver.set_identity(resolve(name));
        Ok(self.identity())
    }

    /// Ask the engine to start this surface.
    ///
    /// On success the identity handed back by the engine replaces the
    /// resolved one and the surface is running. On failure it is terminated.
    pub fn start<E: Engine + ?Sized>(
        &mut self,
        engine: &mut E,
        seed: Seed,
    ) -> Result<Identity, InitError> {
        let _span = info_span!(
            "simhost.surface.init",
            name = self.name.as_deref().unwrap_or(""),
            identity = self.identity().get()
        )
        .entered();
        match engine.init(self.identity(), seed) {
            Ok(identity) => {
                self.driver.set_identity(identity);
                self.state = SurfaceState::Running;
                debug!(%identity, %seed, "surface running");
                Ok(identity)
            }
            Err(err) => {
                warn!(error = %err, "engine init failed");
                self.state = SurfaceState::Terminated;
                Err(err)
            }
        }
    }

    /// Run one tick and, unless it reported quit, composite a frame.
    ///
    /// `content` is the surface size with chrome removed. Returns `None` if
    /// the surface is not running.
    pub fn step<E, T>(
        &mut self,
        engine: &mut E,
        now_secs: u64,
        seeds: &mut SeedSource,
        content: SurfaceSize,
        target: &mut T,
    ) -> Option<Step>
    where
        E: Engine + ?Sized,
        T: DrawTarget + ?Sized,
    {
        if !self.is_running() {
            return None;
        }
        let state = self.driver.tick(engine, now_secs);
        match state {
            CycleState::Quit => {
                return Some(Step {
                    state,
                    composite: None,
                });
            }
            CycleState::NewAgents => {
                let seed = seeds.next();
                debug!(%seed, "new agents requested");
                engine.new_agents(seed);
            }
            CycleState::Ok | CycleState::DebugOutput => {}
        }
        let outcome = composite(engine, self.identity(), content, target);
        self.frames += 1;
        Some(Step {
            state,
            composite: Some(outcome),
        })
    }

    /// Forward one input. Returns the number of engine calls made.
    pub fn handle_input<E: Engine + ?Sized>(&mut self, engine: &mut E, input: &RawInput) -> usize {
        if !self.is_running() {
            return 0;
        }
        self.translator.dispatch(engine, self.identity(), input)
    }

    pub(crate) fn terminate(&mut self) {
        self.state = SurfaceState::Terminated;
    }
}
