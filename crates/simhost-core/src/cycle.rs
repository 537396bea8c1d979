#![forbid(unsafe_code)]

//! Per-tick engine status.

/// Classification of one engine cycle.
///
/// Produced once per tick and consumed immediately by the host. `Quit` and
/// `NewAgents` trigger a reaction on the tick that reported them; the host
/// never stays in either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CycleState {
    /// Nothing to react to.
    #[default]
    Ok,
    /// The engine wants the process to shut down.
    Quit,
    /// The engine wants a fresh agent population.
    NewAgents,
    /// The engine is producing diagnostic output.
    DebugOutput,
}

impl CycleState {
    /// Stable lowercase name for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Quit => "quit",
            Self::NewAgents => "new_agents",
            Self::DebugOutput => "debug_output",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ok() {
        assert_eq!(CycleState::default(), CycleState::Ok);
    }
}
