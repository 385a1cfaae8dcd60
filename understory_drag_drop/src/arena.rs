// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational handles for items, containers, and groups.
//!
//! Items and containers refer to each other (an item knows its container, a
//! container lists its items and its siblings). None of those references own
//! anything: they are small copyable keys resolved through the [`DragDrop`]
//! context that owns every slot.
//!
//! [`DragDrop`]: crate::DragDrop

use alloc::vec::Vec;
use core::fmt;

macro_rules! key_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32, u32);

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({}v{})", stringify!($name), self.0, self.1)
            }
        }

        impl ArenaKey for $name {
            fn from_parts(idx: u32, generation: u32) -> Self {
                Self(idx, generation)
            }

            fn idx(self) -> usize {
                self.0 as usize
            }

            fn generation(self) -> u32 {
                self.1
            }
        }
    };
}

key_type! {
    /// Handle to a [`DragItem`](crate::DragItem) owned by a [`DragDrop`](crate::DragDrop).
    ///
    /// Stale handles never alias a different live item: freeing a slot bumps its
    /// generation.
    ItemKey
}

key_type! {
    /// Handle to a [`DropContainer`](crate::DropContainer) owned by a [`DragDrop`](crate::DragDrop).
    ///
    /// This is distinct from the container's string id, which is the
    /// integrator-facing name used for `connected_to` lookups.
    ContainerKey
}

key_type! {
    /// Handle to a [`ContainerGroup`](crate::ContainerGroup).
    GroupKey
}

pub(crate) trait ArenaKey: Copy {
    fn from_parts(idx: u32, generation: u32) -> Self;
    fn idx(self) -> usize;
    fn generation(self) -> u32;
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot storage with generation-checked access.
#[derive(Debug)]
pub(crate) struct Arena<K, T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    _key: core::marker::PhantomData<K>,
}

impl<K: ArenaKey, T> Default for Arena<K, T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            _key: core::marker::PhantomData,
        }
    }
}

impl<K: ArenaKey, T> Arena<K, T> {
    /// Reserve the key the next [`insert`](Self::insert) will return.
    pub(crate) fn next_key(&self) -> K {
        match self.free.last() {
            Some(&idx) => K::from_parts(idx, self.slots[idx as usize].generation + 1),
            None => {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "More than u32::MAX live drag items or containers is not a supported workload"
                )]
                let idx = self.slots.len() as u32;
                K::from_parts(idx, 1)
            }
        }
    }

    pub(crate) fn insert(&mut self, value: T) -> K {
        let key = self.next_key();
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation = key.generation();
            slot.value = Some(value);
        } else {
            self.slots.push(Slot {
                generation: key.generation(),
                value: Some(value),
            });
        }
        key
    }

    pub(crate) fn remove(&mut self, key: K) -> Option<T> {
        let slot = self.slots.get_mut(key.idx())?;
        if slot.generation != key.generation() {
            return None;
        }
        let value = slot.value.take()?;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "Slot indices originate from u32 keys"
        )]
        self.free.push(key.idx() as u32);
        Some(value)
    }

    pub(crate) fn get(&self, key: K) -> Option<&T> {
        let slot = self.slots.get(key.idx())?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.value.as_ref()
    }

    pub(crate) fn get_mut(&mut self, key: K) -> Option<&mut T> {
        let slot = self.slots.get_mut(key.idx())?;
        if slot.generation != key.generation() {
            return None;
        }
        slot.value.as_mut()
    }

    pub(crate) fn contains(&self, key: K) -> bool {
        self.get(key).is_some()
    }

    /// Live keys in slot order.
    pub(crate) fn keys(&self) -> Vec<K> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.value.is_some())
            .map(|(idx, slot)| {
                #[expect(
                    clippy::cast_possible_truncation,
                    reason = "Slot indices originate from u32 keys"
                )]
                let idx = idx as u32;
                K::from_parts(idx, slot.generation)
            })
            .collect()
    }

    /// Remove every value, keeping slot generations so old keys stay stale.
    pub(crate) fn clear(&mut self) {
        for key in self.keys() {
            self.remove(key);
        }
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }
}
