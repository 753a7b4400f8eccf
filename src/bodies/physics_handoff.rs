//! Hand-off of physics poses from the integrator thread to the tick thread.
//!
//! The physics thread is the only writer. It publishes complete, immutable
//! poses; the tick thread drains them without taking a lock and may lag by
//! one tick. Poses published while the body is not resident describe a
//! simulation that is no longer current and are discarded unread.

use crate::bodies::Pose;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

/// Creates a connected writer/reader pair for one body
pub fn physics_channel() -> (PhysicsPoseWriter, PhysicsPoseReader) {
    let (tx, rx) = mpsc::channel();
    (PhysicsPoseWriter { tx }, PhysicsPoseReader { rx })
}

/// Physics-thread end of the hand-off
#[derive(Debug, Clone)]
pub struct PhysicsPoseWriter {
    tx: Sender<Arc<Pose>>,
}

impl PhysicsPoseWriter {
    /// Publishes a finished pose. Returns false once the body has been dropped.
    pub fn publish(&self, pose: Pose) -> bool {
        self.tx.send(Arc::new(pose)).is_ok()
    }
}

/// Tick-thread end of the hand-off
#[derive(Debug)]
pub struct PhysicsPoseReader {
    rx: Receiver<Arc<Pose>>,
}

impl PhysicsPoseReader {
    /// Every pose published since the last drain, oldest first
    pub fn drain(&self) -> impl Iterator<Item = Arc<Pose>> + '_ {
        self.rx.try_iter()
    }

    /// Drops every pending pose. Returns how many were dropped.
    pub fn discard(&self) -> usize {
        self.rx.try_iter().count()
    }
}
