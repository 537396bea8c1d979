#![forbid(unsafe_code)]

//! Orderly quit on SIGINT/SIGTERM.
//!
//! A listener thread turns termination signals into a [`UserEvent::Quit`]
//! on the event loop, so the engine is closed through the same path as a
//! user quit.

use winit::event_loop::EventLoopProxy;

use crate::window::UserEvent;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Keeps the listener alive; dropping it stops the thread.
#[cfg(unix)]
#[derive(Debug)]
pub struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    pub fn install(proxy: EventLoopProxy<UserEvent>) -> std::io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(std::io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                tracing::warn!(signal, "termination signal received");
                if proxy.send_event(UserEvent::Quit).is_err() {
                    break;
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

#[cfg(not(unix))]
#[derive(Debug)]
pub struct SignalGuard;

#[cfg(not(unix))]
impl SignalGuard {
    pub fn install(_proxy: EventLoopProxy<UserEvent>) -> std::io::Result<Self> {
        Ok(Self)
    }
}
