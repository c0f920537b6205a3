//! Body registry
//!
//! The registry is the sole owner of every registered body. Bodies live in
//! generational slots: removing a body bumps its slot generation, so any
//! handle issued before the removal stops resolving. Iteration always runs
//! in slot order, which makes pair enumeration reproducible.

use crate::body::{BodyHandle, RigidBody};

/// Vacant slots an imported registry may hold beyond its body count
pub const MAX_VACANT_SLOTS: usize = 1 << 16;

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    body: Option<RigidBody>,
}

impl Slot {
    fn vacant() -> Self {
        Slot {
            generation: 0,
            body: None,
        }
    }
}

/// Generational slot storage for rigid bodies
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl BodyRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        BodyRegistry {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Rebuild a registry that keeps the given handles
    ///
    /// Fails if two entries share a slot index, or if an index lies more
    /// than [`MAX_VACANT_SLOTS`] past the number of entries. Slots between
    /// the given indices are left vacant and reused by later insertions.
    pub fn from_entries<I>(entries: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (BodyHandle, RigidBody)>,
    {
        let entries: Vec<_> = entries.into_iter().collect();
        let max_index = entries.len() + MAX_VACANT_SLOTS;
        if let Some((handle, _)) = entries
            .iter()
            .find(|(handle, _)| handle.index() as usize > max_index)
        {
            return Err(format!(
                "body slot in {} exceeds the limit of {}",
                handle, max_index
            ));
        }

        let mut registry = BodyRegistry::new();
        for (handle, body) in entries {
            let index = handle.index() as usize;
            if index >= registry.slots.len() {
                registry.slots.resize_with(index + 1, Slot::vacant);
            }
            let slot = &mut registry.slots[index];
            if slot.body.is_some() {
                return Err(format!("duplicate body slot in {}", handle));
            }
            slot.generation = handle.generation();
            slot.body = Some(body);
            registry.len += 1;
        }

        registry.rebuild_free_list();
        Ok(registry)
    }

    /// Carry slot generations over from the registry this one replaces
    ///
    /// Every vacant slot is moved past the generations `previous` handed
    /// out, so handles into `previous` cannot resolve to bodies inserted
    /// later. Occupied slots keep the generation they were built with.
    pub fn retire_handles_from(&mut self, previous: &BodyRegistry) {
        if previous.slots.len() > self.slots.len() {
            self.slots.resize_with(previous.slots.len(), Slot::vacant);
        }
        for (slot, old) in self.slots.iter_mut().zip(&previous.slots) {
            if slot.body.is_some() {
                continue;
            }
            let retired = if old.body.is_some() {
                old.generation.wrapping_add(1)
            } else {
                old.generation
            };
            slot.generation = slot.generation.max(retired);
        }
        self.rebuild_free_list();
    }

    // Lowest vacant index is handed out first
    fn rebuild_free_list(&mut self) {
        self.free = self
            .slots
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, slot)| slot.body.is_none())
            .map(|(index, _)| index as u32)
            .collect();
    }

    /// Take ownership of a body and return its handle
    pub fn insert(&mut self, body: RigidBody) -> BodyHandle {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            return BodyHandle::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            body: Some(body),
        });
        BodyHandle::new(index, 0)
    }

    /// Remove a body, invalidating every outstanding handle to it
    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        let slot = self.slots.get_mut(handle.index() as usize)?;
        if slot.generation != handle.generation() || slot.body.is_none() {
            return None;
        }
        let body = slot.body.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index());
        self.len -= 1;
        body
    }

    /// Check if a handle still refers to a registered body
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Borrow a body
    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.slots
            .get(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.body.as_ref())
    }

    /// Mutably borrow a body
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.slots
            .get_mut(handle.index() as usize)
            .filter(|slot| slot.generation == handle.generation())
            .and_then(|slot| slot.body.as_mut())
    }

    /// Mutably borrow two distinct bodies at once
    pub fn pair_mut(
        &mut self,
        a: BodyHandle,
        b: BodyHandle,
    ) -> Option<(&mut RigidBody, &mut RigidBody)> {
        let (ia, ib) = (a.index() as usize, b.index() as usize);
        if ia == ib || !self.contains(a) || !self.contains(b) {
            return None;
        }

        let (slot_a, slot_b) = if ia < ib {
            let (head, tail) = self.slots.split_at_mut(ib);
            (&mut head[ia], &mut tail[0])
        } else {
            let (head, tail) = self.slots.split_at_mut(ia);
            (&mut tail[0], &mut head[ib])
        };
        Some((slot_a.body.as_mut()?, slot_b.body.as_mut()?))
    }

    /// Number of registered bodies
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the registry holds no bodies
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every body
    ///
    /// Slots are kept and their generations bumped, so handles issued
    /// before the clear stay stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.body.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index as u32);
        }
        self.len = 0;
    }

    /// Iterate over registered bodies in slot order
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.body
                .as_ref()
                .map(|body| (BodyHandle::new(index as u32, slot.generation), body))
        })
    }

    /// Mutably iterate over registered bodies in slot order
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (BodyHandle, &mut RigidBody)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.body
                .as_mut()
                .map(|body| (BodyHandle::new(index as u32, generation), body))
        })
    }
}
