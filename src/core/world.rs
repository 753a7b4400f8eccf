use crate::bodies::{Body, BodyMotion, CellPos, LoadState};
use crate::core::storage::Storage;
use crate::core::{
    BodyHandle, BodyStorage, DisconnectNotifier, LoadIntent, LoadQueue, NotificationSink,
    ObserverHandle, ObserverRegistry, ProximityController, StreamingConfig, WorldBorder,
};
use crate::error::StreamingError;
use crate::math::Vector3;
use crate::Result;

use log::{debug, error, info, warn};

/// One simulated world: its bodies, observers, border and the tick pipeline
/// that streams bodies to observers.
#[derive(Debug)]
pub struct World {
    /// Every known body, loaded or not
    bodies: BodyStorage<Body>,

    observers: ObserverRegistry,

    border: WorldBorder,

    config: StreamingConfig,

    proximity: ProximityController,

    /// Residency intents produced this tick and applied before watcher updates
    load_queue: LoadQueue,

    /// Monotonic tick counter stamped on spawn and unload notifications
    tick: u64,
}

impl World {
    /// Creates a world with default settings
    pub fn new(border: WorldBorder) -> Result<Self> {
        Self::with_config(border, StreamingConfig::default())
    }

    pub fn with_config(border: WorldBorder, config: StreamingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            bodies: BodyStorage::new(),
            observers: ObserverRegistry::new(),
            border,
            proximity: ProximityController::new(config.proximity)?,
            config,
            load_queue: LoadQueue::new(),
            tick: 0,
        })
    }

    pub fn config(&self) -> &StreamingConfig {
        &self.config
    }

    pub fn border(&self) -> &WorldBorder {
        &self.border
    }

    /// Number of completed ticks
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn proximity(&self) -> &ProximityController {
        &self.proximity
    }

    /// Registers a persisted body; it starts unloaded
    pub fn add_body(&mut self, motion: BodyMotion, pivot: Vector3, cells: Vec<CellPos>) -> BodyHandle {
        let body = Body::new(motion, pivot, cells, self.config.geometry);
        self.insert_body(body)
    }

    /// Registers an already constructed body, e.g. one with a physics source
    pub fn insert_body(&mut self, mut body: Body) -> BodyHandle {
        body.transform_mut().set_remote(self.config.is_remote);
        let handle = self.bodies.add(body);
        info!("registered body {:?}", handle);
        handle
    }

    /// Forgets a body. Its watchers are sent an unload on the next tick.
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<Body> {
        let body = self.bodies.remove(handle).ok_or_else(|| {
            StreamingError::ResourceNotFound(format!("Body with handle {:?} not found", handle))
        })?;
        info!("removed body {:?}", handle);
        Ok(body)
    }

    pub fn body(&self, handle: BodyHandle) -> Result<&Body> {
        self.bodies.get_body(handle)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut Body> {
        self.bodies.get_body_mut(handle)
    }

    pub fn bodies(&self) -> &BodyStorage<Body> {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Moves a body's live position source. Residency decisions see the new
    /// placement on the next tick, and a resident body's poses follow it.
    pub fn set_body_motion(&mut self, handle: BodyHandle, motion: BodyMotion) -> Result<()> {
        self.bodies.get_body_mut(handle)?.set_motion(motion);
        Ok(())
    }

    pub fn add_observer(&mut self, position: Vector3) -> ObserverHandle {
        self.observers.connect(position)
    }

    pub fn move_observer(&mut self, observer: ObserverHandle, position: Vector3) -> Result<()> {
        self.observers.set_position(observer, position)
    }

    /// Disconnects an observer from the tick thread
    pub fn disconnect_observer(&mut self, observer: ObserverHandle) -> bool {
        self.observers.disconnect(observer)
    }

    /// Handle for reporting disconnects from other threads
    pub fn disconnect_notifier(&self) -> DisconnectNotifier {
        self.observers.disconnect_notifier()
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    /// Runs one world tick: residency decisions, watcher updates with their
    /// notifications, then the transform refresh of every resident body.
    ///
    /// A [`GeometryInvariantViolation`](crate::error::StreamingError::GeometryInvariantViolation)
    /// aborts the tick and is returned to the caller.
    pub fn tick(&mut self, sink: &mut impl NotificationSink) -> Result<()> {
        self.observers.drain_disconnects();
        let observers = self.observers.snapshot();

        self.proximity
            .determine_load_and_unload(&self.bodies, &observers, &mut self.load_queue);
        self.apply_load_intents()?;

        self.proximity
            .update_watchers_and_notify(&mut self.bodies, &observers, self.tick, sink);

        for handle in self.bodies.handles() {
            let Some(body) = self.bodies.get_mut(handle) else {
                continue;
            };
            if !body.load_state().is_resident() {
                let dropped = body.discard_stale_physics();
                if dropped > 0 {
                    debug!("dropped {} physics poses of unloaded body {:?}", dropped, handle);
                }
                continue;
            }
            if let Err(err) = body.tick_transforms(&self.border) {
                error!("body {:?} failed its transform refresh: {}", handle, err);
                return Err(err);
            }
        }

        self.tick += 1;
        Ok(())
    }

    fn apply_load_intents(&mut self) -> Result<()> {
        let intents: Vec<LoadIntent> = self.load_queue.drain().collect();
        for intent in intents {
            let handle = intent.body();
            let Some(body) = self.bodies.get_mut(handle) else {
                warn!("ignoring {:?} for unknown body", intent);
                continue;
            };
            let state = match intent {
                LoadIntent::Load(_) => LoadState::Loaded,
                LoadIntent::LoadBackground(_) => LoadState::BackgroundLoaded,
                LoadIntent::Unload(_) => LoadState::Unloaded,
            };
            if body.load_state() == state {
                continue;
            }
            info!("{:?}: {:?} -> {:?}", handle, body.load_state(), state);
            if let Err(err) = body.set_load_state(state, &self.border) {
                error!("body {:?} failed to load: {}", handle, err);
                return Err(err);
            }
        }
        Ok(())
    }
}
