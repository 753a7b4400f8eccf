use crate::bodies::{CellPos, Pose};
use crate::core::{BodyHandle, ObserverHandle};
use std::collections::VecDeque;
use std::sync::Arc;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A message addressed to a single observer
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Notification {
    /// Full geometry of a body, sent to a new watcher ahead of its spawn
    StateTransfer {
        body: BodyHandle,
        cells: Arc<[CellPos]>,
    },

    /// The body has entered the observer's view
    Spawn {
        body: BodyHandle,
        pose: Pose,
        tick: u64,
    },

    /// The body has left the observer's view
    Unload {
        body: BodyHandle,
        tick: u64,
    },

    /// Current poses of every body the observer kept watching this tick
    IndexUpdate {
        entries: Vec<(BodyHandle, Pose)>,
    },
}

impl Notification {
    /// Short name of the variant, used in logs and tests
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::StateTransfer { .. } => "state_transfer",
            Notification::Spawn { .. } => "spawn",
            Notification::Unload { .. } => "unload",
            Notification::IndexUpdate { .. } => "index_update",
        }
    }
}

/// Outgoing message transport. Messages to one observer must be delivered in
/// the order they are sent.
pub trait NotificationSink {
    fn send(&mut self, observer: ObserverHandle, notification: Notification);
}

/// In-memory FIFO of addressed notifications
#[derive(Debug, Default)]
pub struct Outbox {
    messages: VecDeque<(ObserverHandle, Notification)>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the next message from the queue
    pub fn next_message(&mut self) -> Option<(ObserverHandle, Notification)> {
        self.messages.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = (ObserverHandle, Notification)> + '_ {
        self.messages.drain(..)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Messages addressed to `observer`, in send order
    pub fn for_observer(&self, observer: ObserverHandle) -> Vec<&Notification> {
        self.messages
            .iter()
            .filter(|(to, _)| *to == observer)
            .map(|(_, n)| n)
            .collect()
    }

    /// Messages of a given kind addressed to `observer`
    pub fn of_kind(&self, observer: ObserverHandle, kind: &str) -> Vec<&Notification> {
        self.for_observer(observer)
            .into_iter()
            .filter(|n| n.kind() == kind)
            .collect()
    }
}

impl NotificationSink for Outbox {
    fn send(&mut self, observer: ObserverHandle, notification: Notification) {
        self.messages.push_back((observer, notification));
    }
}
