//! Object pooling for frequently spawned objects.

use tracing::debug;

/// Implemented by pooled objects that need to reset on reuse.
pub trait Poolable {
    /// Called when the object is handed out. Use instead of construction-time setup.
    fn on_spawn(&mut self) {}
    /// Called when the object goes back to the pool.
    fn on_despawn(&mut self) {}
}

/// Index of a pooled object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolHandle(usize);

struct Slot<T> {
    object: T,
    active: bool,
}

pub struct ObjectPool<T> {
    slots: Vec<Slot<T>>,
    factory: Box<dyn FnMut() -> T>,
    can_grow: bool,
}

impl<T: Poolable> ObjectPool<T> {
    /// Pre-fills `size` inactive objects from `factory`.
    pub fn new(size: usize, can_grow: bool, mut factory: impl FnMut() -> T + 'static) -> Self {
        let slots = (0..size)
            .map(|_| Slot {
                object: factory(),
                active: false,
            })
            .collect();
        Self {
            slots,
            factory: Box::new(factory),
            can_grow,
        }
    }

    /// Hands out the first inactive object, growing the pool if allowed.
    ///
    /// Returns `None` when every object is in use and the pool may not grow.
    pub fn spawn(&mut self) -> Option<PoolHandle> {
        let index = match self.slots.iter().position(|s| !s.active) {
            Some(index) => index,
            None if self.can_grow => {
                self.slots.push(Slot {
                    object: (self.factory)(),
                    active: false,
                });
                debug!(size = self.slots.len(), "Object pool grew");
                self.slots.len() - 1
            }
            None => return None,
        };

        let slot = &mut self.slots[index];
        slot.object.on_spawn();
        slot.active = true;
        Some(PoolHandle(index))
    }

    /// Returns an object to the pool. Despawning an inactive object does nothing.
    pub fn despawn(&mut self, handle: PoolHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            if slot.active {
                slot.object.on_despawn();
                slot.active = false;
            }
        }
    }

    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.slots.get(handle.0).filter(|s| s.active).map(|s| &s.object)
    }

    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.0)
            .filter(|s| s.active)
            .map(|s| &mut s.object)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.active).count()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
