#![forbid(unsafe_code)]

//! Surface identities.
//!
//! Every surface the host drives is addressed by a small integer that the
//! engine receives on each call. Names map onto a closed set of reserved
//! identities; anything unrecognized is treated as the generic view.

use std::fmt;

use crate::engine::InitError;

/// Identity of one simulation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Identity(u32);

impl Identity {
    /// The generic view surface.
    pub const VIEW: Self = Self(0);
    /// The terrain surface.
    pub const TERRAIN: Self = Self(1);
    /// The control surface.
    pub const CONTROL: Self = Self(2);

    /// Sentinel an engine returns from `init` when it failed to start.
    pub const RAW_INIT_FAILURE: i64 = -1;

    /// Wrap a raw identity value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw integer handed to the engine.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Interpret a raw `init` response.
    ///
    /// `-1` (and any other negative or out-of-range value) means the engine
    /// refused to start.
    pub fn from_raw(raw: i64) -> Result<Self, InitError> {
        if raw == Self::RAW_INIT_FAILURE {
            return Err(InitError::Sentinel);
        }
        u32::try_from(raw)
            .map(Self)
            .map_err(|_| InitError::OutOfRange(raw))
    }

    /// Name of the reserved surface this identity stands for, if any.
    #[must_use]
    pub const fn reserved_name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("View"),
            1 => Some("Terrain"),
            2 => Some("Control"),
            _ => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reserved_name() {
            Some(name) => write!(f, "{name}#{}", self.0),
            None => write!(f, "#{}", self.0),
        }
    }
}

/// Resolve a surface name to its identity.
///
/// Only the exact names `"Terrain"` and `"Control"` are reserved; every other
/// input, including an empty or missing name, resolves to [`Identity::VIEW`].
#[must_use]
pub fn resolve(name: Option<&str>) -> Identity {
    let identity = match name {
        Some("Terrain") => Identity::TERRAIN,
        Some("Control") => Identity::CONTROL,
        _ => Identity::VIEW,
    };
    crate::trace!(?name, %identity, "resolved surface identity");
    identity
}
