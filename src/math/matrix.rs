use crate::math::{Real, Vector3};
use nalgebra as na;
use std::ops::Mul;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A 3x3 matrix, row-major, used for pure rotations
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix3 {
    pub data: [[Real; 3]; 3],
}

/// A 4x4 affine matrix, row-major; the bottom row is always `[0, 0, 0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Matrix4 {
    pub data: [[Real; 4]; 4],
}

impl Matrix3 {
    #[inline]
    pub fn new(data: [[Real; 3]; 3]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Rotation about the x axis by `angle` radians
    pub fn rotation_x(angle: Real) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    /// Rotation about the y axis by `angle` radians
    pub fn rotation_y(angle: Real) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    /// Rotation about the z axis by `angle` radians
    pub fn rotation_z(angle: Real) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Returns the transpose, which for a rotation is also its inverse
    pub fn transpose(&self) -> Self {
        let m = &self.data;
        Self::new([
            [m[0][0], m[1][0], m[2][0]],
            [m[0][1], m[1][1], m[2][1]],
            [m[0][2], m[1][2], m[2][2]],
        ])
    }

    #[inline]
    pub fn multiply_vector(&self, v: Vector3) -> Vector3 {
        let m = &self.data;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    pub fn multiply_matrix(&self, other: &Self) -> Self {
        let mut result = [[0.0; 3]; 3];
        for (i, row) in result.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..3).map(|k| self.data[i][k] * other.data[k][j]).sum();
            }
        }
        Self::new(result)
    }

    /// Column `index` of the matrix, i.e. the image of the matching basis axis
    #[inline]
    pub fn column(&self, index: usize) -> Vector3 {
        Vector3::new(self.data[0][index], self.data[1][index], self.data[2][index])
    }

    /// Convert to nalgebra Matrix3
    pub fn to_nalgebra(&self) -> na::Matrix3<Real> {
        let m = &self.data;
        na::Matrix3::new(
            m[0][0], m[0][1], m[0][2],
            m[1][0], m[1][1], m[1][2],
            m[2][0], m[2][1], m[2][2],
        )
    }
}

impl Mul for Matrix3 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply_matrix(&rhs)
    }
}

impl Matrix4 {
    #[inline]
    pub fn new(data: [[Real; 4]; 4]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn identity() -> Self {
        Self::from_rotation_translation(Matrix3::identity(), Vector3::ZERO)
    }

    #[inline]
    pub fn from_translation(translation: Vector3) -> Self {
        Self::from_rotation_translation(Matrix3::identity(), translation)
    }

    /// Creates an affine matrix that rotates first and then translates
    #[inline]
    pub fn from_rotation_translation(rotation: Matrix3, translation: Vector3) -> Self {
        let r = &rotation.data;
        Self::new([
            [r[0][0], r[0][1], r[0][2], translation.x],
            [r[1][0], r[1][1], r[1][2], translation.y],
            [r[2][0], r[2][1], r[2][2], translation.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Transforms a point (implicit w = 1)
    #[inline]
    pub fn multiply_point(&self, v: Vector3) -> Vector3 {
        self.multiply_direction(v) + self.translation()
    }

    /// Transforms a direction (implicit w = 0), ignoring translation
    #[inline]
    pub fn multiply_direction(&self, v: Vector3) -> Vector3 {
        self.rotation().multiply_vector(v)
    }

    /// Composes two affine matrices; the result applies `other` first
    pub fn multiply_matrix(&self, other: &Self) -> Self {
        let rotation = self.rotation() * other.rotation();
        let translation = self.multiply_point(other.translation());
        Self::from_rotation_translation(rotation, translation)
    }

    /// The upper-left 3x3 block
    #[inline]
    pub fn rotation(&self) -> Matrix3 {
        let m = &self.data;
        Matrix3::new([
            [m[0][0], m[0][1], m[0][2]],
            [m[1][0], m[1][1], m[1][2]],
            [m[2][0], m[2][1], m[2][2]],
        ])
    }

    #[inline]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.data[0][3], self.data[1][3], self.data[2][3])
    }

    /// Convert to nalgebra Matrix4
    pub fn to_nalgebra(&self) -> na::Matrix4<Real> {
        let m = &self.data;
        na::Matrix4::new(
            m[0][0], m[0][1], m[0][2], m[0][3],
            m[1][0], m[1][1], m[1][2], m[1][3],
            m[2][0], m[2][1], m[2][2], m[2][3],
            m[3][0], m[3][1], m[3][2], m[3][3],
        )
    }
}

impl Mul for Matrix4 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply_matrix(&rhs)
    }
}
