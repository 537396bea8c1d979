#![forbid(unsafe_code)]

//! Desktop backend errors.

use std::fmt;
use std::io;

/// Failure to bring up or keep running the window backend.
#[derive(Debug)]
pub enum DesktopError {
    /// The event loop could not be created or failed while running.
    EventLoop(winit::error::EventLoopError),
    /// A window could not be created.
    Window(winit::error::OsError),
    /// The software framebuffer could not be created, resized, or presented.
    Surface(softbuffer::SoftBufferError),
    /// The signal listener could not be installed.
    Signal(io::Error),
}

impl fmt::Display for DesktopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EventLoop(err) => write!(f, "event loop error: {err}"),
            Self::Window(err) => write!(f, "window creation failed: {err}"),
            Self::Surface(err) => write!(f, "framebuffer error: {err}"),
            Self::Signal(err) => write!(f, "signal handler error: {err}"),
        }
    }
}

impl std::error::Error for DesktopError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::EventLoop(err) => Some(err),
            Self::Window(err) => Some(err),
            Self::Surface(err) => Some(err),
            Self::Signal(err) => Some(err),
        }
    }
}

impl From<winit::error::EventLoopError> for DesktopError {
    fn from(err: winit::error::EventLoopError) -> Self {
        Self::EventLoop(err)
    }
}

impl From<winit::error::OsError> for DesktopError {
    fn from(err: winit::error::OsError) -> Self {
        Self::Window(err)
    }
}

impl From<softbuffer::SoftBufferError> for DesktopError {
    fn from(err: softbuffer::SoftBufferError) -> Self {
        Self::Surface(err)
    }
}

impl From<io::Error> for DesktopError {
    fn from(err: io::Error) -> Self {
        Self::Signal(err)
    }
}

impl From<DesktopError> for simhost::Error {
    fn from(err: DesktopError) -> Self {
        match err {
            DesktopError::Signal(err) => Self::Io(err),
            other => Self::Backend(other.to_string()),
        }
    }
}
