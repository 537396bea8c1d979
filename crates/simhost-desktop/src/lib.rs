#![forbid(unsafe_code)]

//! Desktop backend: one native window per host surface, presented through
//! a software framebuffer.

pub mod cli;
pub mod error;
pub mod keymap;
pub mod signals;
pub mod window;

pub use error::DesktopError;
pub use window::{App, UserEvent, run};
