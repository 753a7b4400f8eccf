use std::collections::HashMap;
use crate::core::BodyHandle;
use crate::error::StreamingError;
use crate::Result;

/// Generic handle-keyed storage
pub trait Storage<T, H> {
    /// Adds an item to the storage and returns its handle
    fn add(&mut self, item: T) -> H;

    fn get(&self, handle: H) -> Option<&T>;

    fn get_mut(&mut self, handle: H) -> Option<&mut T>;

    fn remove(&mut self, handle: H) -> Option<T>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns every handle in ascending order
    fn handles(&self) -> Vec<H>;
}

/// Registry of every known body in a world, loaded or not
#[derive(Debug)]
pub struct BodyStorage<T> {
    items: HashMap<BodyHandle, T>,
    next_id: u32,
}

impl<T> Default for BodyStorage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BodyStorage<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            next_id: 1, // Start at 1, so 0 can represent invalid handle
        }
    }

    /// Gets a body by its handle, returning an error if not found
    pub fn get_body(&self, handle: BodyHandle) -> Result<&T> {
        self.get(handle)
            .ok_or_else(|| StreamingError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    /// Gets a mutable reference to a body by its handle, returning an error if not found
    pub fn get_body_mut(&mut self, handle: BodyHandle) -> Result<&mut T> {
        self.get_mut(handle)
            .ok_or_else(|| StreamingError::ResourceNotFound(format!("Body with handle {:?} not found", handle)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &T)> {
        self.items.iter().map(|(h, item)| (*h, item))
    }
}

impl<T> Storage<T, BodyHandle> for BodyStorage<T> {
    fn add(&mut self, item: T) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        self.items.insert(handle, item);
        handle
    }

    fn get(&self, handle: BodyHandle) -> Option<&T> {
        self.items.get(&handle)
    }

    fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut T> {
        self.items.get_mut(&handle)
    }

    fn remove(&mut self, handle: BodyHandle) -> Option<T> {
        self.items.remove(&handle)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn handles(&self) -> Vec<BodyHandle> {
        let mut handles: Vec<_> = self.items.keys().copied().collect();
        handles.sort_unstable();
        handles
    }
}
