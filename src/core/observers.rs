use crate::core::ObserverHandle;
use crate::error::StreamingError;
use crate::math::Vector3;
use crate::Result;

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};

/// Copy of one observer's state taken at the start of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverSnapshot {
    pub handle: ObserverHandle,
    pub position: Vector3,
}

/// Cloneable handle that network contexts use to report a lost session.
///
/// Reports are queued and only take effect when the tick thread drains them.
#[derive(Debug, Clone)]
pub struct DisconnectNotifier {
    tx: Sender<ObserverHandle>,
}

impl DisconnectNotifier {
    /// Queues a disconnect. Returns false once the registry is gone.
    pub fn notify(&self, observer: ObserverHandle) -> bool {
        self.tx.send(observer).is_ok()
    }
}

/// Connected observers and their live positions
#[derive(Debug)]
pub struct ObserverRegistry {
    positions: HashMap<ObserverHandle, Vector3>,
    next_id: u32,
    disconnect_tx: Sender<ObserverHandle>,
    disconnect_rx: Receiver<ObserverHandle>,
}

impl Default for ObserverRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ObserverRegistry {
    pub fn new() -> Self {
        let (disconnect_tx, disconnect_rx) = mpsc::channel();
        Self {
            positions: HashMap::new(),
            next_id: 1,
            disconnect_tx,
            disconnect_rx,
        }
    }

    /// Registers a newly connected observer
    pub fn connect(&mut self, position: Vector3) -> ObserverHandle {
        let handle = ObserverHandle(self.next_id);
        self.next_id += 1;
        self.positions.insert(handle, position);
        handle
    }

    /// Removes an observer immediately; returns false if it was not connected
    pub fn disconnect(&mut self, observer: ObserverHandle) -> bool {
        self.positions.remove(&observer).is_some()
    }

    pub fn disconnect_notifier(&self) -> DisconnectNotifier {
        DisconnectNotifier {
            tx: self.disconnect_tx.clone(),
        }
    }

    /// Applies every disconnect queued through a [`DisconnectNotifier`].
    /// Returns the observers that were actually removed.
    pub fn drain_disconnects(&mut self) -> Vec<ObserverHandle> {
        let queued: Vec<_> = self.disconnect_rx.try_iter().collect();
        queued
            .into_iter()
            .filter(|&observer| self.disconnect(observer))
            .collect()
    }

    pub fn set_position(&mut self, observer: ObserverHandle, position: Vector3) -> Result<()> {
        let slot = self.positions.get_mut(&observer).ok_or_else(|| {
            StreamingError::ResourceNotFound(format!("Observer with handle {:?} not connected", observer))
        })?;
        *slot = position;
        Ok(())
    }

    pub fn position(&self, observer: ObserverHandle) -> Option<Vector3> {
        self.positions.get(&observer).copied()
    }

    pub fn is_connected(&self, observer: ObserverHandle) -> bool {
        self.positions.contains_key(&observer)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Copies the connected set, ordered by handle. Tick logic iterates this
    /// copy so that membership changes cannot disturb an iteration.
    pub fn snapshot(&self) -> Vec<ObserverSnapshot> {
        let mut snapshot: Vec<_> = self
            .positions
            .iter()
            .map(|(&handle, &position)| ObserverSnapshot { handle, position })
            .collect();
        snapshot.sort_unstable_by_key(|o| o.handle);
        snapshot
    }
}
