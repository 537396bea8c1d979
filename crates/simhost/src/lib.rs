#![forbid(unsafe_code)]

//! Simulation host public facade.
//!
//! Re-exports the engine interface, the render bridge, and the host runtime
//! under one name, plus a prelude for window backends.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use simhost_core::{
    ArrowKey, Chrome, CycleState, Engine, EngineCall, EngineDimensions, Identity, InitError,
    KeyDown, MenuCommand, Modifiers, PixelBuffer, PointerButton, PointerInput, RawInput, Seed,
    SurfaceFrame, SurfaceSize, resolve,
};

// --- Render re-exports -----------------------------------------------------

pub use simhost_render::{
    BufferError, Canvas, CompositeOutcome, DrawTarget, Image, Interpolation, Rect, SkipReason,
    StateGuard, composite,
};

// --- Runtime re-exports ----------------------------------------------------

pub use simhost_runtime::{
    Clock, ExitCode, Flow, FrameReport, Host, HostConfig, ProcessExit, SurfaceId, SurfaceState,
    SystemClock, Translator,
};

// --- Sandbox re-exports ----------------------------------------------------

#[cfg(feature = "sandbox")]
pub use simhost_sandbox::{Conditions, ConditionsError, Sandbox};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for simhost applications.
#[derive(Debug)]
pub enum Error {
    /// I/O failure outside the engine.
    Io(std::io::Error),
    /// The engine refused to start.
    Init(InitError),
    /// A conditions file could not be used.
    #[cfg(feature = "sandbox")]
    Conditions(ConditionsError),
    /// Window system or presentation failure, with message.
    Backend(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Init(err) => write!(f, "engine init failed: {err}"),
            #[cfg(feature = "sandbox")]
            Self::Conditions(err) => write!(f, "{err}"),
            Self::Backend(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Init(err) => Some(err),
            #[cfg(feature = "sandbox")]
            Self::Conditions(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<InitError> for Error {
    fn from(err: InitError) -> Self {
        Self::Init(err)
    }
}

#[cfg(feature = "sandbox")]
impl From<ConditionsError> for Error {
    fn from(err: ConditionsError) -> Self {
        Self::Conditions(err)
    }
}

/// Standard result type for simhost APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Canvas, CycleState, Engine, Error, Flow, Host, HostConfig, Identity, KeyDown, MenuCommand,
        Modifiers, PointerButton, PointerInput, RawInput, Result, SurfaceFrame, SurfaceId,
        SurfaceSize,
    };

    pub use crate::{core, render, runtime};
}

pub use simhost_core as core;
pub use simhost_render as render;
pub use simhost_runtime as runtime;
#[cfg(feature = "sandbox")]
pub use simhost_sandbox as sandbox;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_error_converts_and_chains() {
        let err: Error = InitError::Sentinel.into();
        assert!(matches!(err, Error::Init(InitError::Sentinel)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn backend_message_displays_verbatim() {
        let err = Error::Backend("no display".into());
        assert_eq!(err.to_string(), "no display");
    }

    #[cfg(feature = "sandbox")]
    #[test]
    fn sandbox_is_an_engine() {
        fn assert_engine<E: Engine>() {}
        assert_engine::<Sandbox>();
    }
}
