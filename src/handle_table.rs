//! Generational registry of loaded fonts.
//!
//! A handle packs a slot index and the slot's generation. Destroying a font
//! bumps the generation, so a stale handle misses instead of reaching a font
//! that later reused the slot. A slot whose generation would wrap is retired
//! and never reused, which keeps handles unique for the life of the table.

use std::fmt;
use std::num::NonZeroU64;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

/// Opaque, non-zero identifier of a loaded font.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontHandle(NonZeroU64);

impl FontHandle {
    fn new(slot: usize, generation: u32) -> Option<Self> {
        let index = u32::try_from(slot).ok()?.checked_add(1)?;
        NonZeroU64::new((u64::from(generation) << 32) | u64::from(index)).map(Self)
    }

    /// Rebuild a handle from [`FontHandle::to_raw`]; `None` for zero.
    pub fn from_raw(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn to_raw(self) -> u64 {
        self.0.get()
    }

    fn slot(self) -> Option<usize> {
        let index = (self.0.get() & 0xFFFF_FFFF) as usize;
        index.checked_sub(1)
    }

    fn generation(self) -> u32 {
        (self.0.get() >> 32) as u32
    }
}

impl fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FontHandle({:#x})", self.0)
    }
}

impl fmt::Display for FontHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<Arc<Mutex<T>>>,
}

struct Slots<T> {
    slots: Vec<Slot<T>>,
    /// Empty slots that may be reused
    free: Vec<usize>,
    live: usize,
}

/// Thread-safe handle table. Each entry sits behind its own mutex so that
/// calls on different handles never wait on each other beyond the brief
/// table lookup.
pub struct HandleTable<T> {
    inner: RwLock<Slots<T>>,
}

impl<T> Default for HandleTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HandleTable<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Slots {
                slots: Vec::new(),
                free: Vec::new(),
                live: 0,
            }),
        }
    }

    /// Store `value` and return its new handle, or `None` if the table has
    /// run out of addressable slots.
    pub fn insert(&self, value: T) -> Option<FontHandle> {
        let mut inner = self.inner.write();
        let (slot, generation) = match inner.free.last() {
            Some(&slot) => (slot, inner.slots[slot].generation),
            None => (inner.slots.len(), 0),
        };
        let handle = FontHandle::new(slot, generation)?;

        if inner.free.pop().is_none() {
            inner.slots.push(Slot {
                generation,
                value: None,
            });
        }
        inner.slots[slot].value = Some(Arc::new(Mutex::new(value)));
        inner.live += 1;
        Some(handle)
    }

    /// Remove the entry for `handle`. Calls already holding the entry finish
    /// normally; the value is dropped when the last of them completes.
    pub fn remove(&self, handle: FontHandle) -> Option<Arc<Mutex<T>>> {
        let mut inner = self.inner.write();
        let index = handle.slot()?;
        let slot = inner.slots.get_mut(index)?;
        if slot.generation != handle.generation() {
            return None;
        }
        let value = slot.value.take()?;

        match slot.generation.checked_add(1) {
            Some(next) => {
                slot.generation = next;
                inner.free.push(index);
            }
            None => log::debug!("Retiring handle slot {} after generation wrap", index),
        }
        inner.live -= 1;
        Some(value)
    }

    pub fn get(&self, handle: FontHandle) -> Option<Arc<Mutex<T>>> {
        let inner = self.inner.read();
        let slot = inner.slots.get(handle.slot()?)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.value.clone()
    }

    pub fn contains(&self, handle: FontHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.read().live
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
