use crate::math::{Matrix4, Orientation, Quaternion, Vector3};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Direction of a coordinate conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformDirection {
    /// From the body's local (cell) frame into world space
    LocalToWorld,

    /// From world space into the body's local (cell) frame
    WorldToLocal,
}

/// An immutable snapshot of a body's placement in the world.
///
/// The local frame is the body's cell grid. A local point `p` maps to
/// `position + R * (p - pivot)`, so the pivot is the local point that lands
/// exactly on `position`. Both matrices are built once at construction;
/// replacing a pose means building a new one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Pose {
    position: Vector3,
    orientation: Orientation,
    rotation: Quaternion,
    pivot: Vector3,
    local_to_world: Matrix4,
    world_to_local: Matrix4,
}

impl Pose {
    pub fn new(position: Vector3, orientation: Orientation, pivot: Vector3) -> Self {
        let rotation = orientation.to_quaternion();
        let r = rotation.to_rotation_matrix();

        // T(position) * R * T(-pivot)
        let local_to_world =
            Matrix4::from_rotation_translation(r, position - r.multiply_vector(pivot));

        // T(pivot) * Rᵀ * T(-position)
        let r_inv = r.transpose();
        let world_to_local =
            Matrix4::from_rotation_translation(r_inv, pivot - r_inv.multiply_vector(position));

        Self {
            position,
            orientation,
            rotation,
            pivot,
            local_to_world,
            world_to_local,
        }
    }

    /// No rotation, no translation, pivot at the local origin
    pub fn identity() -> Self {
        Self::new(Vector3::ZERO, Orientation::default(), Vector3::ZERO)
    }

    #[inline]
    pub fn position(&self) -> Vector3 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    pub fn rotation(&self) -> Quaternion {
        self.rotation
    }

    #[inline]
    pub fn pivot(&self) -> Vector3 {
        self.pivot
    }

    #[inline]
    pub fn matrix(&self, direction: TransformDirection) -> &Matrix4 {
        match direction {
            TransformDirection::LocalToWorld => &self.local_to_world,
            TransformDirection::WorldToLocal => &self.world_to_local,
        }
    }

    /// Converts a point between frames
    #[inline]
    pub fn transform_point(&self, point: Vector3, direction: TransformDirection) -> Vector3 {
        self.matrix(direction).multiply_point(point)
    }

    /// Rotates a direction between frames, ignoring translation
    #[inline]
    pub fn rotate(&self, direction_vector: Vector3, direction: TransformDirection) -> Vector3 {
        self.matrix(direction).multiply_direction(direction_vector)
    }

    /// The body's local x, y and z axes expressed in world space
    pub fn world_axes(&self) -> [Vector3; 3] {
        Vector3::axes().map(|axis| self.rotate(axis, TransformDirection::LocalToWorld))
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}
