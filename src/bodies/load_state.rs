#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Residency of a body, driven purely by observer proximity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum LoadState {
    /// Only the persisted record exists
    #[default]
    Unloaded,

    /// Simulated, but not yet close enough to be streamed to observers
    BackgroundLoaded,

    /// Fully simulated and eligible for watchers
    Loaded,
}

impl LoadState {
    /// True for every state in which the body is simulated
    #[inline]
    pub fn is_resident(self) -> bool {
        !matches!(self, LoadState::Unloaded)
    }
}
