use crate::bodies::physics_handoff::PhysicsPoseReader;
use crate::bodies::{BodyMotion, CellPos, Pose, SeparatingAxes, TransformDirection};
use crate::core::config::GeometryConfig;
use crate::core::WorldBorder;
use crate::error::StreamingError;
use crate::math::{Aabb, Orientation, Vector3};
use crate::Result;

use bitflags::bitflags;
use std::sync::Arc;

bitflags! {
    /// Optional stages of [`TransformManager::refresh_all`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RefreshFlags: u8 {
        /// Re-seed both physics slots from the new tick pose (first load only)
        const INIT_PHYSICS = 0x01;

        /// Recompute the world bounding box from the occupied cells
        const BOUNDING_BOX = 0x02;
    }
}

/// Pose history and derived collision geometry for a single body.
///
/// Every slot except the render pose is populated at construction, so reads
/// never observe a missing pose. Slots hold shared immutable snapshots and
/// are only ever replaced, never mutated.
#[derive(Debug, Clone)]
pub struct TransformManager {
    /// Local point that sits on the body's world position
    pivot: Vector3,

    /// Whether this instance mirrors a remote authority (observer side)
    is_remote: bool,

    geometry: GeometryConfig,

    current_tick: Arc<Pose>,
    prev_tick: Arc<Pose>,
    render: Option<Arc<Pose>>,

    // Written by the physics integrator only.
    current_physics: Arc<Pose>,
    prev_physics: Arc<Pose>,

    normals: SeparatingAxes,
    bounding_box: Aabb,
}

impl TransformManager {
    /// Creates a manager whose every pose slot starts at `motion`
    pub fn new(pivot: Vector3, motion: BodyMotion, geometry: GeometryConfig) -> Self {
        let pose = Arc::new(Pose::new(motion.position, motion.orientation, pivot));
        Self {
            pivot,
            is_remote: false,
            geometry,
            normals: SeparatingAxes::from_pose(&pose),
            bounding_box: Aabb::from_point(motion.position),
            current_tick: pose.clone(),
            prev_tick: pose.clone(),
            render: None,
            current_physics: pose.clone(),
            prev_physics: pose,
        }
    }

    /// Marks this manager as an observer-side mirror; render poses are only
    /// served on remote instances
    pub fn with_remote(mut self, is_remote: bool) -> Self {
        self.set_remote(is_remote);
        self
    }

    pub fn set_remote(&mut self, is_remote: bool) {
        self.is_remote = is_remote;
    }

    #[inline]
    pub fn pivot(&self) -> Vector3 {
        self.pivot
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.is_remote
    }

    /// World position of the current tick pose
    #[inline]
    pub fn position(&self) -> Vector3 {
        self.current_tick.position()
    }

    #[inline]
    pub fn current_tick(&self) -> &Arc<Pose> {
        &self.current_tick
    }

    #[inline]
    pub fn prev_tick(&self) -> &Arc<Pose> {
        &self.prev_tick
    }

    /// Pose used for drawing; falls back to the tick pose on the authority or
    /// while no render pose has been supplied
    pub fn render_pose(&self) -> &Arc<Pose> {
        match &self.render {
            Some(render) if self.is_remote => render,
            _ => &self.current_tick,
        }
    }

    #[inline]
    pub fn current_physics(&self) -> &Arc<Pose> {
        &self.current_physics
    }

    #[inline]
    pub fn prev_physics(&self) -> &Arc<Pose> {
        &self.prev_physics
    }

    #[inline]
    pub fn normals(&self) -> &SeparatingAxes {
        &self.normals
    }

    #[inline]
    pub fn bounding_box(&self) -> Aabb {
        self.bounding_box
    }

    /// Replaces the current tick pose. The world boundary must already have
    /// been enforced on `position` this tick.
    pub fn update_current_tick(&mut self, position: Vector3, orientation: Orientation) {
        self.current_tick = Arc::new(Pose::new(position, orientation, self.pivot));
    }

    /// Replaces the render pose; never read by authoritative logic
    pub fn update_render(&mut self, position: Vector3, orientation: Orientation) {
        self.render = Some(Arc::new(Pose::new(position, orientation, self.pivot)));
    }

    /// Shifts the current tick pose into the previous slot
    pub fn advance_tick(&mut self) {
        self.prev_tick = self.current_tick.clone();
    }

    /// Replaces the current physics pose, shifting the old one into the
    /// previous slot
    pub fn set_current_physics(&mut self, pose: Arc<Pose>) {
        self.prev_physics = std::mem::replace(&mut self.current_physics, pose);
    }

    /// Shifts the current physics pose into the previous slot
    pub fn advance_physics(&mut self) {
        self.prev_physics = self.current_physics.clone();
    }

    /// Applies every pose published by the physics thread since the last call.
    /// Returns true if at least one pose arrived.
    pub fn sync_physics(&mut self, reader: &PhysicsPoseReader) -> bool {
        let mut received = false;
        for pose in reader.drain() {
            self.set_current_physics(pose);
            received = true;
        }
        received
    }

    /// Converts a world point into the body's local frame using the tick pose
    #[inline]
    pub fn transform_to_local(&self, point: Vector3) -> Vector3 {
        self.current_tick.transform_point(point, TransformDirection::WorldToLocal)
    }

    /// Converts a local point into world space using the tick pose
    #[inline]
    pub fn transform_to_world(&self, point: Vector3) -> Vector3 {
        self.current_tick.transform_point(point, TransformDirection::LocalToWorld)
    }

    /// Recomputes the separating-axis normals from the tick pose
    pub fn refresh_normals(&mut self) -> &SeparatingAxes {
        self.normals = SeparatingAxes::from_pose(&self.current_tick);
        &self.normals
    }

    /// Axis set for a pairwise separating-axis test against `other`, reusing
    /// both bodies' cached normals
    pub fn cross_normals_with(&self, other: &TransformManager) -> SeparatingAxes {
        self.normals.against(&other.normals)
    }

    /// Recomputes the world bounding box from the occupied cells, placed by
    /// the physics pose.
    ///
    /// An empty cell set leaves the previous box untouched. A box whose
    /// average edge exceeds the configured ceiling means the pose or cell data
    /// is corrupt and is reported as [`StreamingError::GeometryInvariantViolation`].
    pub fn refresh_world_bounding_box(&mut self, cells: &[CellPos]) -> Result<Aabb> {
        let to_world = self.current_physics.matrix(TransformDirection::LocalToWorld);
        let centers = cells
            .iter()
            .map(|&cell| to_world.multiply_point(cell_center(cell)));

        let Some(tight) = Aabb::from_points(centers) else {
            return Ok(self.bounding_box);
        };

        let grown = tight.grow(self.geometry.bounding_box_margin);
        let average_edge_length = grown.average_edge_length();
        // NaN extents fail this check too.
        if !(average_edge_length < self.geometry.max_average_edge_length) {
            return Err(StreamingError::GeometryInvariantViolation {
                average_edge_length,
                bounds: grown,
            });
        }

        self.bounding_box = grown;
        Ok(grown)
    }

    /// Pulls `position` back so the bounding box lies inside `border` along X
    /// and Z. The stored box moves with it. Returns the applied correction.
    pub fn enforce_world_boundary(&mut self, position: &mut Vector3, border: &WorldBorder) -> Vector3 {
        let correction = border.correction_for(&self.bounding_box);
        if !correction.is_zero() {
            *position += correction;
            self.bounding_box = self.bounding_box.translate(correction);
        }
        correction
    }

    /// Runs the per-tick refresh in its required order: boundary clamp,
    /// tick pose, optional physics seeding, optional bounding box, normals.
    ///
    /// With [`RefreshFlags::INIT_PHYSICS`] the physics slots and bounding box
    /// are first placed at `motion`, so the boundary clamp measures the body's
    /// real extent rather than whatever box it held before. Bounding boxes
    /// are never recomputed on remote instances.
    pub fn refresh_all(
        &mut self,
        motion: &mut BodyMotion,
        cells: &[CellPos],
        border: &WorldBorder,
        flags: RefreshFlags,
    ) -> Result<()> {
        let refresh_box = flags.contains(RefreshFlags::BOUNDING_BOX) && !self.is_remote;

        if flags.contains(RefreshFlags::INIT_PHYSICS) {
            let placed = Arc::new(Pose::new(motion.position, motion.orientation, self.pivot));
            self.current_physics = placed.clone();
            self.prev_physics = placed;
            if refresh_box {
                self.refresh_world_bounding_box(cells)?;
            }
        }

        self.enforce_world_boundary(&mut motion.position, border);
        self.update_current_tick(motion.position, motion.orientation);

        if flags.contains(RefreshFlags::INIT_PHYSICS) {
            self.current_physics = self.current_tick.clone();
            self.prev_physics = self.current_tick.clone();
        }
        if refresh_box {
            self.refresh_world_bounding_box(cells)?;
        }
        self.refresh_normals();
        Ok(())
    }
}

/// Center of a cell in the body's local frame
#[inline]
pub fn cell_center(cell: CellPos) -> Vector3 {
    Vector3::from(cell) + Vector3::new(0.5, 0.5, 0.5)
}
