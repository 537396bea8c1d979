#![forbid(unsafe_code)]

//! Process termination.
//!
//! Shutdown ends the whole process. The host goes through [`ProcessExit`] so
//! the final step can be observed in tests instead of killing the test
//! binary.

/// Exit status reported to the OS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    /// Normal shutdown: a quit request or the engine reporting quit.
    Success,
    /// The engine could not start.
    InitFailure,
}

impl ExitCode {
    /// Numeric status.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => 0,
            Self::InitFailure => 1,
        }
    }
}

/// Final step of an orderly shutdown.
pub trait ProcessExit {
    /// Terminate the process. Real implementations do not return.
    fn exit(&mut self, code: ExitCode);
}

/// Terminates the current process with [`std::process::exit`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StdProcessExit;

impl ProcessExit for StdProcessExit {
    fn exit(&mut self, code: ExitCode) {
        tracing::info!(code = code.code(), "process exit");
        std::process::exit(code.code());
    }
}
