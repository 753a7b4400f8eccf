pub mod config;
pub mod storage;
pub mod events;
pub mod observers;
pub mod loader;
pub mod proximity;
pub mod world;

pub use self::config::{GeometryConfig, ProximityConfig, StreamingConfig};
pub use self::storage::{BodyStorage, Storage};
pub use self::events::{Notification, NotificationSink, Outbox};
pub use self::observers::{DisconnectNotifier, ObserverRegistry, ObserverSnapshot};
pub use self::loader::{BodyLoader, LoadIntent, LoadQueue};
pub use self::proximity::ProximityController;
pub use self::world::World;

use crate::math::{Aabb, Real, Vector3};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A unique identifier for a body in a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct BodyHandle(pub(crate) u32);

/// A unique identifier for a connected observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ObserverHandle(pub(crate) u32);

/// Horizontal limits of the world. Y is unbounded.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct WorldBorder {
    pub min_x: Real,
    pub max_x: Real,
    pub min_z: Real,
    pub max_z: Real,
}

impl WorldBorder {
    pub fn new(min_x: Real, max_x: Real, min_z: Real, max_z: Real) -> Self {
        Self { min_x, max_x, min_z, max_z }
    }

    /// A square border of half-width `half_extent` centered on the origin
    pub fn centered(half_extent: Real) -> Self {
        Self::new(-half_extent, half_extent, -half_extent, half_extent)
    }

    /// Offset that moves `bounds` back inside the border along X and Z.
    ///
    /// Both sides are measured against the same input box, so a box that
    /// overhangs both planes of an axis is shifted by the sum of the overhangs.
    pub fn correction_for(&self, bounds: &Aabb) -> Vector3 {
        let mut correction = Vector3::ZERO;
        if bounds.max.x > self.max_x {
            correction.x += self.max_x - bounds.max.x;
        }
        if bounds.min.x < self.min_x {
            correction.x += self.min_x - bounds.min.x;
        }
        if bounds.max.z > self.max_z {
            correction.z += self.max_z - bounds.max.z;
        }
        if bounds.min.z < self.min_z {
            correction.z += self.min_z - bounds.min.z;
        }
        correction
    }
}

impl Default for WorldBorder {
    fn default() -> Self {
        Self::centered(29_999_984.0)
    }
}
