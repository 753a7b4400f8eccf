use crate::core::BodyHandle;
use std::collections::VecDeque;

/// Receiver of residency decisions. Implementations may act on them later;
/// the proximity controller never waits for an outcome.
pub trait BodyLoader {
    fn queue_load(&mut self, body: BodyHandle);

    fn queue_load_background(&mut self, body: BodyHandle);

    fn queue_unload(&mut self, body: BodyHandle);
}

/// A single residency decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadIntent {
    Load(BodyHandle),
    LoadBackground(BodyHandle),
    Unload(BodyHandle),
}

impl LoadIntent {
    pub fn body(&self) -> BodyHandle {
        match *self {
            LoadIntent::Load(body) | LoadIntent::LoadBackground(body) | LoadIntent::Unload(body) => body,
        }
    }
}

/// FIFO of pending intents; an intent already waiting is not queued twice
#[derive(Debug, Default)]
pub struct LoadQueue {
    intents: VecDeque<LoadIntent>,
}

impl LoadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: LoadIntent) {
        if !self.intents.contains(&intent) {
            self.intents.push_back(intent);
        }
    }

    pub fn next_intent(&mut self) -> Option<LoadIntent> {
        self.intents.pop_front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = LoadIntent> + '_ {
        self.intents.drain(..)
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LoadIntent> {
        self.intents.iter()
    }
}

impl BodyLoader for LoadQueue {
    fn queue_load(&mut self, body: BodyHandle) {
        self.push(LoadIntent::Load(body));
    }

    fn queue_load_background(&mut self, body: BodyHandle) {
        self.push(LoadIntent::LoadBackground(body));
    }

    fn queue_unload(&mut self, body: BodyHandle) {
        self.push(LoadIntent::Unload(body));
    }
}
