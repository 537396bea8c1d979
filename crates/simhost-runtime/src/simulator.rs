#![forbid(unsafe_code)]

//! Deterministic engine and exit doubles for testing.
//!
//! [`RecordingEngine`] answers every call from a script and logs it as an
//! [`EngineRecord`]; [`RecordingExit`] captures the final exit instead of
//! ending the process. Together they let a [`Host`](crate::Host) run
//! headless with every engine interaction observable.
//!
//! # Example
//!
//! ```ignore
//! let engine = RecordingEngine::new().with_cycles([CycleState::Quit]);
//! let mut host = Host::with_parts(engine, config, RecordingExit::default(), clock);
//! ```

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use simhost_core::{
    CycleState, Engine, EngineDimensions, Identity, InitError, MenuCommand, PixelBuffer, Seed,
    SurfaceSize,
};

use crate::exit::{ExitCode, ProcessExit};

/// Record of one call the host made into the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineRecord {
    Init { identity: Identity, seed: Seed },
    Cycle { time_secs: u64, identity: Identity },
    Draw { identity: Identity, size: SurfaceSize, changed: bool },
    Close,
    Key { code: u32, identity: Identity },
    KeyUp,
    Mouse { x: f64, y: f64, identity: Identity },
    MouseUp,
    MouseOption(bool),
    Delta { dx: f64, dy: f64, identity: Identity },
    Zoom { amount: f64, identity: Identity },
    Rotate { amount: f64, identity: Identity },
    NewSimulation(Seed),
    NewAgents(Seed),
    Menu(MenuCommand),
    OpenFile { path: PathBuf, is_script: bool },
    SaveFile(PathBuf),
    DebugScript(PathBuf),
    About,
}

/// Scripted engine that records every call.
#[derive(Debug, Clone)]
pub struct RecordingEngine {
    init: Option<Result<Identity, InitError>>,
    cycles: VecDeque<CycleState>,
    frames: bool,
    fill: [u8; 4],
    frame: Vec<u8>,
    menu_reply: Option<i32>,
    max_fps: u32,
    accept_files: bool,
    dimensions: EngineDimensions,
    records: Vec<EngineRecord>,
}

impl Default for RecordingEngine {
    fn default() -> Self {
        Self {
            init: None,
            cycles: VecDeque::new(),
            frames: true,
            fill: [0, 0x20, 0x40, 0x60],
            frame: Vec::new(),
            menu_reply: None,
            max_fps: 60,
            accept_files: true,
            dimensions: EngineDimensions::default(),
            records: Vec::new(),
        }
    }
}

impl RecordingEngine {
    /// Engine that accepts init with the requested identity, reports `Ok`
    /// every tick, and draws a solid frame of whatever size is asked for.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixed raw answer to `init`, decoded the way integer-protocol engines
    /// report it: `-1` refuses to start.
    #[must_use]
    pub fn with_init(mut self, raw: i64) -> Self {
        self.init = Some(Identity::from_raw(raw));
        self
    }

    /// Cycle states to report, in order. `Ok` once exhausted.
    #[must_use]
    pub fn with_cycles(mut self, states: impl IntoIterator<Item = CycleState>) -> Self {
        self.cycles.extend(states);
        self
    }

    /// Return no frame from `draw`.
    #[must_use]
    pub fn without_frames(mut self) -> Self {
        self.frames = false;
        self
    }

    /// Answer to every menu command.
    #[must_use]
    pub fn with_menu_reply(mut self, reply: Option<i32>) -> Self {
        self.menu_reply = reply;
        self
    }

    #[must_use]
    pub fn with_max_fps(mut self, fps: u32) -> Self {
        self.max_fps = fps;
        self
    }

    /// Whether `open_file_name` accepts files.
    #[must_use]
    pub fn with_file_acceptance(mut self, accept: bool) -> Self {
        self.accept_files = accept;
        self
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: EngineDimensions) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Every call so far.
    pub fn records(&self) -> &[EngineRecord] {
        &self.records
    }

    /// Drain the call log.
    pub fn take_records(&mut self) -> Vec<EngineRecord> {
        std::mem::take(&mut self.records)
    }

    /// Number of recorded calls matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&EngineRecord) -> bool) -> usize {
        self.records.iter().filter(|record| predicate(record)).count()
    }

    pub fn closes(&self) -> usize {
        self.count(|r| matches!(r, EngineRecord::Close))
    }

    pub fn draws(&self) -> usize {
        self.count(|r| matches!(r, EngineRecord::Draw { .. }))
    }

    /// Seeds passed to `new_agents`, in order.
    pub fn new_agent_seeds(&self) -> Vec<Seed> {
        self.records
            .iter()
            .filter_map(|r| match r {
                EngineRecord::NewAgents(seed) => Some(*seed),
                _ => None,
            })
            .collect()
    }

    /// Identities passed to `cycle`, in order.
    pub fn cycle_identities(&self) -> Vec<Identity> {
        self.records
            .iter()
            .filter_map(|r| match r {
                EngineRecord::Cycle { identity, .. } => Some(*identity),
                _ => None,
            })
            .collect()
    }
}

impl Engine for RecordingEngine {
    fn init(&mut self, identity: Identity, seed: Seed) -> Result<Identity, InitError> {
        self.records.push(EngineRecord::Init { identity, seed });
        self.init.unwrap_or(Ok(identity))
    }

    fn cycle(&mut self, time_secs: u64, identity: Identity) -> CycleState {
        self.records.push(EngineRecord::Cycle {
            time_secs,
            identity,
        });
        self.cycles.pop_front().unwrap_or_default()
    }

    fn draw(
        &mut self,
        identity: Identity,
        size: SurfaceSize,
        changed: bool,
    ) -> Option<PixelBuffer<'_>> {
        self.records.push(EngineRecord::Draw {
            identity,
            size,
            changed,
        });
        if !self.frames {
            return None;
        }
        let pixels = usize::try_from(size.area()).ok()?;
        self.frame.clear();
        self.frame.reserve(pixels * PixelBuffer::BYTES_PER_PIXEL);
        for _ in 0..pixels {
            self.frame.extend_from_slice(&self.fill);
        }
        Some(PixelBuffer::new(&self.frame, size))
    }

    fn close(&mut self) {
        self.records.push(EngineRecord::Close);
    }

    fn key_received(&mut self, code: u32, identity: Identity) {
        self.records.push(EngineRecord::Key { code, identity });
    }

    fn key_up(&mut self) {
        self.records.push(EngineRecord::KeyUp);
    }

    fn mouse_received(&mut self, x: f64, y: f64, identity: Identity) {
        self.records.push(EngineRecord::Mouse { x, y, identity });
    }

    fn mouse_up(&mut self) {
        self.records.push(EngineRecord::MouseUp);
    }

    fn mouse_option(&mut self, extended: bool) {
        self.records.push(EngineRecord::MouseOption(extended));
    }

    fn delta(&mut self, dx: f64, dy: f64, identity: Identity) {
        self.records.push(EngineRecord::Delta { dx, dy, identity });
    }

    fn zoom(&mut self, amount: f64, identity: Identity) {
        self.records.push(EngineRecord::Zoom { amount, identity });
    }

    fn rotate(&mut self, amount: f64, identity: Identity) {
        self.records.push(EngineRecord::Rotate { amount, identity });
    }

    fn new_simulation(&mut self, seed: Seed) {
        self.records.push(EngineRecord::NewSimulation(seed));
    }

    fn new_agents(&mut self, seed: Seed) {
        self.records.push(EngineRecord::NewAgents(seed));
    }

    fn menu(&mut self, command: MenuCommand) -> Option<i32> {
        self.records.push(EngineRecord::Menu(command));
        self.menu_reply
    }

    fn max_fps(&self) -> u32 {
        self.max_fps
    }

    fn open_file_name(&mut self, path: &Path, is_script: bool) -> bool {
        self.records.push(EngineRecord::OpenFile {
            path: path.to_path_buf(),
            is_script,
        });
        self.accept_files
    }

    fn save_file_name(&mut self, path: &Path) {
        self.records.push(EngineRecord::SaveFile(path.to_path_buf()));
    }

    fn script_debug_handle(&mut self, path: &Path) {
        self.records.push(EngineRecord::DebugScript(path.to_path_buf()));
    }

    fn about(&mut self) {
        self.records.push(EngineRecord::About);
    }

    fn dimensions(&self) -> EngineDimensions {
        self.dimensions
    }
}

/// Exit double that records instead of terminating.
#[derive(Debug, Clone, Default)]
pub struct RecordingExit {
    codes: Vec<ExitCode>,
}

impl RecordingExit {
    /// Exit codes requested so far.
    pub fn codes(&self) -> &[ExitCode] {
        &self.codes
    }

    pub fn exited(&self) -> bool {
        !self.codes.is_empty()
    }
}

impl ProcessExit for RecordingExit {
    fn exit(&mut self, code: ExitCode) {
        self.codes.push(code);
    }
}
