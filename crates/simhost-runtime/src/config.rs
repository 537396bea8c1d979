#![forbid(unsafe_code)]

//! Host configuration.

use simhost_core::Chrome;

/// Settings shared by every surface a [`Host`](crate::Host) drives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostConfig {
    /// Window chrome subtracted from each surface before compositing.
    pub chrome: Chrome,
    /// Base for reproducible seeds. `None` draws seeds from OS entropy.
    pub seed: Option<u64>,
}

impl HostConfig {
    /// Default configuration: no chrome, random seeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the chrome inset.
    #[must_use]
    pub fn with_chrome(mut self, chrome: Chrome) -> Self {
        self.chrome = chrome;
        self
    }

    /// Fix the seed sequence.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
