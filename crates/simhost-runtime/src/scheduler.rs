#![forbid(unsafe_code)]

//! Cooperative redraw scheduling.
//!
//! Redraws are posted, not run. The window backend pulls the next request
//! when it is ready to draw, and a finished frame posts the following one.
//! At most one request per surface is pending at a time, so a surface can
//! never have two overlapping cycles.

use std::collections::VecDeque;

use crate::surface::SurfaceId;

/// FIFO of surfaces waiting for a redraw.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    queue: VecDeque<SurfaceId>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post a redraw for `surface`. Returns `false` if one is already
    /// pending.
    pub fn request(&mut self, surface: SurfaceId) -> bool {
        if self.queue.contains(&surface) {
            return false;
        }
        self.queue.push_back(surface);
        true
    }

    /// Take the oldest pending request.
    pub fn next(&mut self) -> Option<SurfaceId> {
        self.queue.pop_front()
    }

    /// Whether `surface` has a pending request.
    pub fn is_pending(&self, surface: SurfaceId) -> bool {
        self.queue.contains(&surface)
    }

    /// Drop every pending request.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
