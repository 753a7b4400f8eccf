use crate::error::StreamingError;
use crate::math::Real;
use crate::Result;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Proximity thresholds, in world units measured in the XZ plane.
///
/// Each transition has its own pair of thresholds so that small position
/// jitter near a boundary cannot flip a body or watcher back and forth.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ProximityConfig {
    /// An observer closer than this starts watching a loaded body
    pub watch_distance: Real,

    /// A watching observer farther than this stops watching
    pub unwatch_distance: Real,

    /// An observer closer than this fully loads an unloaded body
    pub load_distance: Real,

    /// An observer closer than this background-loads an unloaded body
    pub background_load_distance: Real,

    /// A resident body with no observer closer than this is unloaded
    pub unload_distance: Real,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            watch_distance: 32.0,
            unwatch_distance: 50.0,
            load_distance: 32.0,
            background_load_distance: 50.0,
            unload_distance: 80.0,
        }
    }
}

impl ProximityConfig {
    /// Checks the ordering the hysteresis bands depend on
    pub fn validate(&self) -> Result<()> {
        let checks = [
            (self.watch_distance < self.unwatch_distance, "watch_distance < unwatch_distance"),
            (self.load_distance < self.background_load_distance, "load_distance < background_load_distance"),
            (self.background_load_distance < self.unload_distance, "background_load_distance < unload_distance"),
            (self.unwatch_distance <= self.unload_distance, "unwatch_distance <= unload_distance"),
            (self.watch_distance <= self.load_distance, "watch_distance <= load_distance"),
        ];
        match checks.iter().find(|(ok, _)| !ok) {
            Some((_, rule)) => Err(StreamingError::InvalidParameter(format!(
                "proximity distances must satisfy {}: {:?}",
                rule, self
            ))),
            None => Ok(()),
        }
    }
}

/// Limits for derived body geometry
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct GeometryConfig {
    /// Growth applied to every side of a body's tight bounding box
    pub bounding_box_margin: Real,

    /// Sanity ceiling on a bounding box's average edge length
    pub max_average_edge_length: Real,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            bounding_box_margin: 3.0,
            max_average_edge_length: 1_000_000.0,
        }
    }
}

/// Configuration for a streaming world
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct StreamingConfig {
    pub proximity: ProximityConfig,
    pub geometry: GeometryConfig,

    /// True for observer-side mirrors of a remote authority
    pub is_remote: bool,
}

impl StreamingConfig {
    pub fn validate(&self) -> Result<()> {
        self.proximity.validate()?;
        if !(self.geometry.bounding_box_margin >= 0.0) {
            return Err(StreamingError::InvalidParameter(format!(
                "bounding_box_margin must be non-negative, got {}",
                self.geometry.bounding_box_margin
            )));
        }
        Ok(())
    }
}
