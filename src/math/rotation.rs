use crate::math::{Matrix3, Real, Vector3, EPSILON};
use nalgebra as na;
use std::fmt;
use std::ops::Mul;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Body orientation as Euler angles in degrees.
///
/// The rotation applies roll about Z first, then yaw about Y, then pitch
/// about X, i.e. the matrix is `Rx(pitch) * Ry(yaw) * Rz(roll)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Orientation {
    pub pitch: Real,
    pub yaw: Real,
    pub roll: Real,
}

impl Orientation {
    #[inline]
    pub const fn new(pitch: Real, yaw: Real, roll: Real) -> Self {
        Self { pitch, yaw, roll }
    }

    /// Unit quaternion for this orientation
    pub fn to_quaternion(&self) -> Quaternion {
        let qx = Quaternion::from_axis_angle(Vector3::unit_x(), self.pitch.to_radians());
        let qy = Quaternion::from_axis_angle(Vector3::unit_y(), self.yaw.to_radians());
        let qz = Quaternion::from_axis_angle(Vector3::unit_z(), self.roll.to_radians());
        (qx * qy * qz).normalize()
    }
}

/// A unit quaternion representing a rotation in 3D space
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Quaternion {
    pub w: Real,
    pub x: Real,
    pub y: Real,
    pub z: Real,
}

impl Quaternion {
    #[inline]
    pub const fn new(w: Real, x: Real, y: Real, z: Real) -> Self {
        Self { w, x, y, z }
    }

    /// The identity rotation
    #[inline]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Creates a quaternion rotating `angle` radians about `axis`
    pub fn from_axis_angle(axis: Vector3, angle: Real) -> Self {
        let (s, c) = (angle * 0.5).sin_cos();
        let axis = axis.normalize();
        Self::new(c, axis.x * s, axis.y * s, axis.z * s)
    }

    /// Converts the quaternion to a rotation matrix
    pub fn to_rotation_matrix(&self) -> Matrix3 {
        let Self { w, x, y, z } = *self;
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (xw, yw, zw) = (x * w, y * w, z * w);

        Matrix3::new([
            [1.0 - 2.0 * (yy + zz), 2.0 * (xy - zw), 2.0 * (xz + yw)],
            [2.0 * (xy + zw), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - xw)],
            [2.0 * (xz - yw), 2.0 * (yz + xw), 1.0 - 2.0 * (xx + yy)],
        ])
    }

    #[inline]
    pub fn conjugate(&self) -> Self {
        Self::new(self.w, -self.x, -self.y, -self.z)
    }

    #[inline]
    pub fn length_squared(&self) -> Real {
        self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Normalizes this quaternion, falling back to identity for a degenerate input
    pub fn normalize(&self) -> Self {
        let len_sq = self.length_squared();
        if len_sq > EPSILON {
            let len = len_sq.sqrt();
            Self::new(self.w / len, self.x / len, self.y / len, self.z / len)
        } else {
            Self::identity()
        }
    }

    /// Rotates a vector by this quaternion (`q * v * q⁻¹`)
    pub fn rotate_vector(&self, v: Vector3) -> Vector3 {
        let rotated = *self * Quaternion::new(0.0, v.x, v.y, v.z) * self.conjugate();
        Vector3::new(rotated.x, rotated.y, rotated.z)
    }

    /// Convert to a nalgebra unit quaternion
    pub fn to_nalgebra(&self) -> na::UnitQuaternion<Real> {
        na::UnitQuaternion::from_quaternion(na::Quaternion::new(self.w, self.x, self.y, self.z))
    }

    /// Convert from a nalgebra unit quaternion
    pub fn from_nalgebra(q: &na::UnitQuaternion<Real>) -> Self {
        Self::new(q.w, q.i, q.j, q.k)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.w, self.x, self.y, self.z)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}
