#![forbid(unsafe_code)]

//! One engine tick per redraw.

use tracing::debug_span;

use simhost_core::{CycleState, Engine, Identity};

/// Advances one surface's simulation and remembers the last classification.
///
/// The driver never fails. Everything that goes wrong inside the engine
/// comes back as [`CycleState::Quit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleDriver {
    identity: Identity,
    last: CycleState,
    ticks: u64,
}

impl CycleDriver {
    /// Driver for the surface known to the engine as `identity`.
    pub const fn new(identity: Identity) -> Self {
        Self {
            identity,
            last: CycleState::Ok,
            ticks: 0,
        }
    }

    /// Identity passed on every tick.
    pub const fn identity(&self) -> Identity {
        self.identity
    }

    pub(crate) fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
    }

    /// Advance the engine one tick at `now_secs`.
    pub fn tick<E: Engine + ?Sized>(&mut self, engine: &mut E, now_secs: u64) -> CycleState {
        let _span = debug_span!(
            "simhost.cycle",
            identity = self.identity.get(),
            tick = self.ticks
        )
        .entered();
        self.last = engine.cycle(now_secs, self.identity);
        self.ticks += 1;
        tracing::trace!(state = self.last.as_str(), "cycle classified");
        self.last
    }

    /// State reported by the most recent tick.
    pub const fn last(&self) -> CycleState {
        self.last
    }

    /// Number of ticks so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_quit(&self) -> bool {
        self.last == CycleState::Quit
    }

    pub fn is_new_agents(&self) -> bool {
        self.last == CycleState::NewAgents
    }

    /// Whether the engine is producing diagnostic output.
    pub fn is_debug_output(&self) -> bool {
        self.last == CycleState::DebugOutput
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::{EngineRecord, RecordingEngine};

    #[test]
    fn tick_passes_time_and_identity() {
        let mut engine = RecordingEngine::new().with_cycles([CycleState::DebugOutput]);
        let mut driver = CycleDriver::new(Identity::new(3));
        assert_eq!(driver.tick(&mut engine, 1_700_000_000), CycleState::DebugOutput);
        assert!(driver.is_debug_output());
        assert!(!driver.is_quit());
        assert_eq!(driver.ticks(), 1);
        assert_eq!(
            engine.records(),
            &[EngineRecord::Cycle {
                time_secs: 1_700_000_000,
                identity: Identity::new(3)
            }]
        );
    }

    #[test]
    fn last_state_is_replaced_each_tick() {
        let mut engine =
            RecordingEngine::new().with_cycles([CycleState::NewAgents, CycleState::Ok]);
        let mut driver = CycleDriver::new(Identity::VIEW);
        driver.tick(&mut engine, 0);
        assert!(driver.is_new_agents());
        driver.tick(&mut engine, 1);
        assert_eq!(driver.last(), CycleState::Ok);
        assert!(!driver.is_new_agents());
    }
}
