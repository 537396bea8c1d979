#![forbid(unsafe_code)]

//! The [`Sandbox`] engine.
//!
//! One battle is shared by every surface. Keys:
//!
//! | Key     | Effect                                      |
//! |---------|---------------------------------------------|
//! | `p` `P` | Pause or resume                             |
//! | `n` `N` | Request fresh agents on the next tick       |
//! | `d` `D` | Toggle the per-tick scorecard debug output  |
//!
//! Holding a key only acts once; the key must be released before the same
//! code is handled again.

use std::path::Path;

use bitflags::bitflags;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, trace, warn};

use simhost_core::{
    CycleState, Engine, EngineDimensions, Identity, InitError, MenuCommand, PixelBuffer, Seed,
    SurfaceSize,
};

use crate::battle::Battle;
use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::conditions::Conditions;
use crate::view::{FrameStore, Selection, Viewport};

const MAX_FPS: u32 = 60;

bitflags! {
    /// Display toggles driven from the menu.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Toggles: u8 {
        const WEATHER       = 0b0000_0001;
        const BRAIN         = 0b0000_0010;
        const BRAIN_CODE    = 0b0000_0100;
        const TERRITORY     = 0b0000_1000;
        const TIDE_DAYLIGHT = 0b0001_0000;
        const FOLLOW        = 0b0010_0000;
        const SOCIAL_WEB    = 0b0100_0000;
    }
}

impl Toggles {
    fn for_command(command: MenuCommand) -> Option<Self> {
        Some(match command {
            MenuCommand::Weather => Self::WEATHER,
            MenuCommand::Brain => Self::BRAIN,
            MenuCommand::BrainCode => Self::BRAIN_CODE,
            MenuCommand::Territory => Self::TERRITORY,
            MenuCommand::TideDaylight => Self::TIDE_DAYLIGHT,
            MenuCommand::Follow => Self::FOLLOW,
            MenuCommand::SocialWeb => Self::SOCIAL_WEB,
            _ => return None,
        })
    }
}

/// Reference engine running a two-sided battle.
#[derive(Debug)]
pub struct Sandbox {
    conditions: Conditions,
    battle: Option<Battle>,
    rng: SmallRng,
    viewport: Viewport,
    selection: Selection,
    frames: FrameStore,
    last_size: SurfaceSize,
    last_key: Option<u32>,
    paused: bool,
    debug: bool,
    new_required: bool,
    toggles: Toggles,
    focus: usize,
    errors: Vec<String>,
    closed: bool,
}

impl Default for Sandbox {
    fn default() -> Self {
        Self::new(Conditions::default())
    }
}

impl Sandbox {
    /// Engine that will lay out `conditions` at init.
    pub fn new(conditions: Conditions) -> Self {
        Self {
            conditions,
            battle: None,
            rng: SmallRng::seed_from_u64(0),
            viewport: Viewport::default(),
            selection: Selection::default(),
            frames: FrameStore::new(),
            last_size: SurfaceSize::new(BOARD_WIDTH as u32, BOARD_HEIGHT as u32),
            last_key: None,
            paused: false,
            debug: false,
            new_required: false,
            toggles: Toggles::empty(),
            focus: 0,
            errors: Vec::new(),
            closed: false,
        }
    }

    pub fn conditions(&self) -> &Conditions {
        &self.conditions
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn frames(&self) -> &FrameStore {
        &self.frames
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn toggles(&self) -> Toggles {
        self.toggles
    }

    /// Messages for files and scripts the engine could not use.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Lay the battle out again from the current conditions.
    fn rebuild(&mut self, seed: Seed) -> bool {
        self.conditions.general_variables.set_seed(seed.get());
        self.rng = SmallRng::seed_from_u64(u64::from(seed.get()));
        match Battle::new(&self.conditions, &mut self.rng) {
            Ok(battle) => {
                info!(%seed, units = battle.units().len(), "battle laid out");
                self.battle = Some(battle);
                self.focus = 0;
                true
            }
            Err(err) => {
                warn!(%err, "battle layout failed");
                self.errors.push(err.to_string());
                self.battle = None;
                false
            }
        }
    }

    fn record_error(&mut self, message: String) {
        warn!(%message, "sandbox error");
        self.errors.push(message);
    }

    fn focus_step(&mut self, forward: bool) {
        let Some(battle) = self.battle.as_mut() else {
            return;
        };
        let count = battle.units().len();
        if count == 0 {
            return;
        }
        self.focus = if forward {
            (self.focus + 1) % count
        } else {
            (self.focus + count - 1) % count
        };
        battle.select_only(self.focus);
        debug!(unit = self.focus, "focus moved");
    }
}

impl Engine for Sandbox {
    fn init(&mut self, identity: Identity, seed: Seed) -> Result<Identity, InitError> {
        self.closed = false;
        if !self.rebuild(seed) {
            return Err(InitError::Sentinel);
        }
        Ok(identity)
    }

    fn cycle(&mut self, _time_secs: u64, _identity: Identity) -> CycleState {
        if self.closed {
            return CycleState::Ok;
        }
        if self.new_required {
            self.new_required = false;
            return CycleState::NewAgents;
        }
        let Some(battle) = self.battle.as_mut() else {
            return CycleState::Ok;
        };
        if self.paused {
            return CycleState::Ok;
        }
        if battle.is_over() {
            let [left, right] = battle.scorecard();
            info!(ticks = battle.ticks(), left, right, "battle over");
            return CycleState::Quit;
        }
        battle.step(&mut self.rng);
        if self.debug {
            let [left, right] = battle.scorecard();
            debug!(ticks = battle.ticks(), left, right, "scorecard");
            CycleState::DebugOutput
        } else {
            CycleState::Ok
        }
    }

    fn draw(&mut self, _identity: Identity, size: SurfaceSize, _changed: bool) -> Option<PixelBuffer<'_>> {
        if self.closed {
            return None;
        }
        let battle = self.battle.as_ref()?;
        self.last_size = size;
        let selection = self.selection.board_rect(&self.viewport, size);
        self.frames.render(battle, &self.viewport, selection, size)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.selection = Selection::default();
        self.last_key = None;
        info!("sandbox closed");
    }

    fn key_received(&mut self, code: u32, _identity: Identity) {
        if self.last_key == Some(code) {
            return;
        }
        self.last_key = Some(code);
        match char::from_u32(code) {
            Some('p' | 'P') => {
                self.paused = !self.paused;
                debug!(paused = self.paused, "pause toggled");
            }
            Some('n' | 'N') => self.new_required = true,
            Some('d' | 'D') => {
                self.debug = !self.debug;
                debug!(debug = self.debug, "debug output toggled");
            }
            _ => trace!(code, "key ignored"),
        }
    }

    fn key_up(&mut self) {
        self.last_key = None;
    }

    fn mouse_received(&mut self, x: f64, y: f64, _identity: Identity) {
        self.selection.sample(x, y);
    }

    fn mouse_up(&mut self) {
        let Some((rect, extend)) = self.selection.finish(&self.viewport, self.last_size) else {
            return;
        };
        if let Some(battle) = self.battle.as_mut() {
            let hit = battle.select_in(rect, extend);
            debug!(?rect, extend, hit, "selection");
        }
    }

    fn mouse_option(&mut self, extended: bool) {
        self.selection.set_extend(extended);
    }

    fn delta(&mut self, dx: f64, dy: f64, _identity: Identity) {
        self.viewport.pan_by(dx, dy);
    }

    fn zoom(&mut self, amount: f64, _identity: Identity) {
        if !self.viewport.zoom_by(amount) {
            trace!(amount, zoom = self.viewport.zoom(), "zoom clamped");
        }
    }

    fn rotate(&mut self, amount: f64, _identity: Identity) {
        trace!(amount, "rotation ignored");
    }

    fn new_simulation(&mut self, seed: Seed) {
        self.conditions = Conditions::default();
        self.paused = false;
        self.rebuild(seed);
    }

    fn new_agents(&mut self, seed: Seed) {
        self.rebuild(seed);
    }

    fn menu(&mut self, command: MenuCommand) -> Option<i32> {
        match command {
            MenuCommand::Pause => {
                self.paused = !self.paused;
                Some(i32::from(self.paused))
            }
            MenuCommand::PreviousAgent => {
                self.focus_step(false);
                None
            }
            MenuCommand::NextAgent => {
                self.focus_step(true);
                None
            }
            MenuCommand::ClearErrors => {
                self.errors.clear();
                None
            }
            MenuCommand::Flood | MenuCommand::HealthyCarrier => {
                debug!(command = command.label(), "no effect in the sandbox");
                None
            }
            other => {
                let flag = Toggles::for_command(other)?;
                self.toggles.toggle(flag);
                Some(i32::from(self.toggles.contains(flag)))
            }
        }
    }

    fn max_fps(&self) -> u32 {
        MAX_FPS
    }

    fn open_file_name(&mut self, path: &Path, is_script: bool) -> bool {
        if is_script {
            self.record_error(format!("scripts are not supported: {}", path.display()));
            return false;
        }
        match Conditions::load(path) {
            Ok(conditions) => {
                let seed = Seed::new(conditions.general_variables.seed());
                self.conditions = conditions;
                info!(path = %path.display(), "conditions loaded");
                self.rebuild(seed)
            }
            Err(err) => {
                self.record_error(format!("{}: {err}", path.display()));
                false
            }
        }
    }

    fn save_file_name(&mut self, path: &Path) {
        match self.conditions.save(path) {
            Ok(()) => info!(path = %path.display(), "conditions saved"),
            Err(err) => self.record_error(format!("{}: {err}", path.display())),
        }
    }

    fn script_debug_handle(&mut self, path: &Path) {
        self.record_error(format!("no script to debug into {}", path.display()));
    }

    fn about(&mut self) {
        info!(
            name = env!("CARGO_PKG_NAME"),
            version = env!("CARGO_PKG_VERSION"),
            "about"
        );
    }

    fn dimensions(&self) -> EngineDimensions {
        EngineDimensions {
            windows: 1,
            width: BOARD_WIDTH as u32,
            height: BOARD_HEIGHT as u32,
            has_menus: true,
        }
    }
}
