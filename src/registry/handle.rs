//! Handles to registered strings

use std::{
    fmt,
    sync::atomic::{AtomicU32, Ordering},
};

/// Registry id counter, shared by every registry in the process
static REGISTRY_ID_COUNTER: AtomicU32 = AtomicU32::new(1);

/// Get the next registry id
pub(crate) fn next_registry_id() -> u32 {
    REGISTRY_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Opaque reference to one string owned by a [`Registry`](super::Registry)
///
/// A handle names a slot and the generation that slot had when the string
/// was registered. Once the string is destroyed or torn down the slot's
/// generation moves on and the handle is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringHandle {
    registry: u32,
    slot: u32,
    generation: u32,
}

impl StringHandle {
    pub(crate) fn new(registry: u32, slot: u32, generation: u32) -> Self {
        Self {
            registry,
            slot,
            generation,
        }
    }

    /// Rebuild a handle from its raw form for the given registry
    pub(crate) fn from_raw(registry: u32, raw: u64) -> Option<Self> {
        let slot_plus_one = (raw & 0xFFFF_FFFF) as u32;
        if slot_plus_one == 0 {
            return None;
        }

        Some(Self {
            registry,
            slot: slot_plus_one - 1,
            generation: (raw >> 32) as u32,
        })
    }

    /// Encode as a non-zero integer for the C API
    pub fn to_raw(self) -> u64 {
        (u64::from(self.generation) << 32) | (u64::from(self.slot) + 1)
    }

    /// Slot index in the owning registry
    pub fn slot(&self) -> usize {
        self.slot as usize
    }

    /// Generation of the slot at registration time
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Id of the registry that issued this handle
    pub fn registry_id(&self) -> u32 {
        self.registry
    }
}

impl fmt::Display for StringHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}:{}v{}", self.registry, self.slot, self.generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_form_is_never_zero() {
        let handle = StringHandle::new(1, 0, 0);
        assert_ne!(handle.to_raw(), 0);
        assert_eq!(StringHandle::from_raw(1, handle.to_raw()), Some(handle));
        assert_eq!(StringHandle::from_raw(1, 0), None);
    }

    #[test]
    fn test_raw_form_keeps_generation() {
        let handle = StringHandle::new(3, 41, 7);
        let decoded = StringHandle::from_raw(3, handle.to_raw()).unwrap();
        assert_eq!(decoded.slot(), 41);
        assert_eq!(decoded.generation(), 7);
    }

    #[test]
    fn test_registry_ids_are_unique() {
        let a = next_registry_id();
        let b = next_registry_id();
        assert_ne!(a, b);
    }
}
