mod vector;
mod matrix;
mod rotation;
mod aabb;

pub use vector::Vector3;
pub use matrix::{Matrix3, Matrix4};
pub use rotation::{Orientation, Quaternion};
pub use aabb::Aabb;

/// Scalar type used for all world and local coordinates
pub type Real = f64;

/// Squared-length threshold below which a vector counts as zero
pub const EPSILON: Real = 1.0e-9;

/// Squared distance between two points measured in the horizontal XZ plane
#[inline]
pub fn distance_squared_xz(a: Vector3, b: Vector3) -> Real {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    dx * dx + dz * dz
}

/// Returns true if `a` is strictly closer than `distance` to `b` in the XZ plane
#[inline]
pub fn within_distance_xz(a: Vector3, b: Vector3, distance: Real) -> bool {
    distance_squared_xz(a, b) < distance * distance
}
