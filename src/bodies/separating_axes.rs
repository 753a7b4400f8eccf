use crate::bodies::Pose;
use crate::math::Vector3;
use std::ops::Index;

/// Number of candidate axes carried per body
pub const SEPARATING_AXIS_COUNT: usize = 15;

/// Replacement for a degenerate single-body cross product
const FALLBACK_AXIS: Vector3 = Vector3::unit_y();

/// Candidate separating-axis normals for a body.
///
/// Layout for a single body:
/// - `0..3`: the world axes +X, +Y, +Z
/// - `3..6`: the body's local axes rotated into world space
/// - `6..15`: unit cross products `world[i] x rotated[j]`, row-major in `i`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparatingAxes([Vector3; SEPARATING_AXIS_COUNT]);

impl SeparatingAxes {
    /// Builds the axis set from the rotation of `pose`
    pub fn from_pose(pose: &Pose) -> Self {
        let world = Vector3::axes();
        let rotated = pose.world_axes();

        let mut axes = [Vector3::ZERO; SEPARATING_AXIS_COUNT];
        axes[..3].copy_from_slice(&world);
        axes[3..6].copy_from_slice(&rotated);
        fill_cross_products(&mut axes, &world, &rotated, FALLBACK_AXIS);

        Self(axes)
    }

    /// Axis set for testing this body against `other`.
    ///
    /// Layout: `0..3` are this body's rotated axes, `3..6` are `other`'s
    /// rotated axes and `6..15` their pairwise unit cross products. A
    /// degenerate cross product falls back to entry `1` of this set (this
    /// body's rotated Y axis), not to a world axis.
    ///
    /// This fallback differs from [`from_pose`](Self::from_pose), which uses
    /// world +Y. The mismatch may be unintended; it is kept
    /// until the intended axis is confirmed.
    pub fn against(&self, other: &SeparatingAxes) -> Self {
        let own = self.rotated_axes();
        let theirs = other.rotated_axes();

        let mut axes = [Vector3::ZERO; SEPARATING_AXIS_COUNT];
        axes[..3].copy_from_slice(&own);
        axes[3..6].copy_from_slice(&theirs);
        let fallback = axes[1];
        fill_cross_products(&mut axes, &own, &theirs, fallback);

        Self(axes)
    }

    /// World-aligned axes (entries `0..3`)
    #[inline]
    pub fn world_axes(&self) -> [Vector3; 3] {
        [self.0[0], self.0[1], self.0[2]]
    }

    /// Rotated body axes (entries `3..6`)
    #[inline]
    pub fn rotated_axes(&self) -> [Vector3; 3] {
        [self.0[3], self.0[4], self.0[5]]
    }

    #[inline]
    pub fn as_slice(&self) -> &[Vector3] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vector3> {
        self.0.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        SEPARATING_AXIS_COUNT
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Index<usize> for SeparatingAxes {
    type Output = Vector3;

    #[inline]
    fn index(&self, index: usize) -> &Vector3 {
        &self.0[index]
    }
}

fn fill_cross_products(
    axes: &mut [Vector3; SEPARATING_AXIS_COUNT],
    first: &[Vector3; 3],
    second: &[Vector3; 3],
    fallback: Vector3,
) {
    let crosses = axes[6..].iter_mut();
    let pairs = first.iter().flat_map(|a| second.iter().map(move |b| (a, b)));
    for (slot, (a, b)) in crosses.zip(pairs) {
        let normal = a.cross_unit(b);
        *slot = if normal.is_zero() { fallback } else { normal };
    }
}
