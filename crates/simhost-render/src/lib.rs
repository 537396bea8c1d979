#![forbid(unsafe_code)]

//! Render bridge: validated views of engine frames, draw targets, and the
//! per-frame compositor.

pub mod canvas;
pub mod compositor;
pub mod image;

pub use canvas::{Canvas, DrawTarget, Interpolation, Rect, StateGuard};
pub use compositor::{CompositeOutcome, SkipReason, composite};
pub use image::{BufferError, Image};
