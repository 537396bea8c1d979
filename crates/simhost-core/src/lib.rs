#![forbid(unsafe_code)]

//! Core: surface identities, raw input vocabulary, cycle states, and the
//! synchronous engine call surface.

pub mod cycle;
pub mod engine;
pub mod event;
pub mod geometry;
pub mod identity;
pub mod logging;
pub mod menu;

pub use cycle::CycleState;
pub use engine::{Engine, EngineDimensions, InitError, PixelBuffer, Seed};
pub use event::{ArrowKey, EngineCall, KeyDown, Modifiers, PointerButton, PointerInput, RawInput};
pub use geometry::{Chrome, SurfaceFrame, SurfaceSize};
pub use identity::{Identity, resolve};
pub use menu::MenuCommand;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
