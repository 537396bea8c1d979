#![forbid(unsafe_code)]

//! Runtime: per-surface host loops, the input translator, the cycle driver,
//! and the cooperative redraw scheduler.

pub mod clock;
pub mod config;
pub mod cycle_driver;
pub mod exit;
pub mod host;
pub mod scheduler;
pub mod seed;
pub mod simulator;
pub mod surface;
pub mod translator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::HostConfig;
pub use cycle_driver::CycleDriver;
pub use exit::{ExitCode, ProcessExit, StdProcessExit};
pub use host::{Flow, FrameReport, Host};
pub use scheduler::RedrawScheduler;
pub use seed::SeedSource;
pub use simulator::{EngineRecord, RecordingEngine, RecordingExit};
pub use surface::{RenameError, Step, SurfaceId, SurfaceLoop, SurfaceState};
pub use translator::{Dispatch, Translator};
