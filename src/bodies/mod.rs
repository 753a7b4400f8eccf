mod pose;
mod separating_axes;
mod transform_manager;
mod load_state;
pub mod physics_handoff;

pub use self::pose::{Pose, TransformDirection};
pub use self::separating_axes::{SeparatingAxes, SEPARATING_AXIS_COUNT};
pub use self::transform_manager::{cell_center, RefreshFlags, TransformManager};
pub use self::load_state::LoadState;
pub use self::physics_handoff::{physics_channel, PhysicsPoseReader, PhysicsPoseWriter};

use crate::core::config::GeometryConfig;
use crate::core::{ObserverHandle, WorldBorder};
use crate::math::{Orientation, Vector3};
use crate::Result;

use std::sync::Arc;

/// Integer coordinates of an occupied cell in a body's local frame
pub type CellPos = [i32; 3];

/// Live position source of a body, moved by gameplay and clamped by the
/// world border before each tick pose is built
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyMotion {
    pub position: Vector3,
    pub orientation: Orientation,
}

impl BodyMotion {
    pub fn new(position: Vector3, orientation: Orientation) -> Self {
        Self { position, orientation }
    }
}

/// A simulated rigid body made of occupied cells
#[derive(Debug)]
pub struct Body {
    motion: BodyMotion,
    cells: Arc<[CellPos]>,
    transform: TransformManager,
    load_state: LoadState,

    /// Observers currently watching, mirrored from the proximity controller
    watchers: Vec<ObserverHandle>,

    physics: Option<PhysicsPoseReader>,
}

impl Body {
    /// Creates an unloaded body from its persisted placement
    pub fn new(
        motion: BodyMotion,
        pivot: Vector3,
        cells: Vec<CellPos>,
        geometry: GeometryConfig,
    ) -> Self {
        Self {
            motion,
            cells: cells.into(),
            transform: TransformManager::new(pivot, motion, geometry),
            load_state: LoadState::Unloaded,
            watchers: Vec::new(),
            physics: None,
        }
    }

    /// Attaches the reading end of a physics hand-off. Without one, the
    /// physics slots follow the tick pose.
    pub fn with_physics_source(mut self, reader: PhysicsPoseReader) -> Self {
        self.physics = Some(reader);
        self
    }

    #[inline]
    pub fn motion(&self) -> BodyMotion {
        self.motion
    }

    #[inline]
    pub fn set_motion(&mut self, motion: BodyMotion) {
        self.motion = motion;
    }

    /// World position used for residency decisions: the tick pose while
    /// resident, the persisted placement otherwise
    pub fn position(&self) -> Vector3 {
        if self.load_state.is_resident() {
            self.transform.position()
        } else {
            self.motion.position
        }
    }

    #[inline]
    pub fn cells(&self) -> &Arc<[CellPos]> {
        &self.cells
    }

    #[inline]
    pub fn transform(&self) -> &TransformManager {
        &self.transform
    }

    #[inline]
    pub fn transform_mut(&mut self) -> &mut TransformManager {
        &mut self.transform
    }

    #[inline]
    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    #[inline]
    pub fn watchers(&self) -> &[ObserverHandle] {
        &self.watchers
    }

    pub(crate) fn set_watchers(&mut self, watchers: Vec<ObserverHandle>) {
        self.watchers = watchers;
    }

    /// Moves the body into `state`. Coming up from unloaded re-seeds the pose
    /// history and geometry from the persisted placement.
    pub(crate) fn set_load_state(&mut self, state: LoadState, border: &WorldBorder) -> Result<()> {
        if !self.load_state.is_resident() && state.is_resident() {
            self.discard_stale_physics();
            self.transform.refresh_all(
                &mut self.motion,
                &self.cells,
                border,
                RefreshFlags::INIT_PHYSICS | RefreshFlags::BOUNDING_BOX,
            )?;
            self.transform.advance_tick();
        }
        if !state.is_resident() {
            self.watchers.clear();
        }
        self.load_state = state;
        Ok(())
    }

    /// Drops physics poses that piled up while the body was not simulated
    pub(crate) fn discard_stale_physics(&mut self) -> usize {
        self.physics.as_ref().map_or(0, |reader| reader.discard())
    }

    /// Per-tick transform refresh of a resident body: boundary clamp, tick
    /// pose, physics poses, bounding box, normals, then the tick shift.
    pub(crate) fn tick_transforms(&mut self, border: &WorldBorder) -> Result<()> {
        let transform = &mut self.transform;
        transform.enforce_world_boundary(&mut self.motion.position, border);
        transform.update_current_tick(self.motion.position, self.motion.orientation);

        match &self.physics {
            Some(reader) => {
                transform.sync_physics(reader);
            }
            None => {
                let pose = transform.current_tick().clone();
                transform.set_current_physics(pose);
            }
        }

        if !transform.is_remote() {
            transform.refresh_world_bounding_box(&self.cells)?;
        }
        transform.refresh_normals();
        transform.advance_tick();
        Ok(())
    }
}
