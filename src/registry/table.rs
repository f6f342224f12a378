//! Slot table backing the registry
//!
//! The table is plain data; the registry wraps it in its lock.

use std::collections::BTreeSet;

use log::debug;

use crate::{
    buffers::ByteString,
    error::{Result, TwineError},
};

use super::{config::RegistryConfig, stats::RegistryStats};

/// One table entry
#[derive(Debug, Default)]
struct Slot {
    /// Bumped every time the slot's string is released
    generation: u32,
    string: Option<ByteString>,
}

/// Arena of optional strings addressed by slot index
#[derive(Debug)]
pub(crate) struct SlotTable {
    /// All slots, `slots.len()` is the capacity
    slots: Vec<Slot>,
    /// One past the highest index occupied since the table was created
    high_watermark: usize,
    /// Released indices below the watermark, lowest reused first
    vacated: BTreeSet<usize>,
    /// Indices whose generation is exhausted; never handed out again
    retired: BTreeSet<usize>,
    /// Generation fresh slots start at, above any generation handed out
    generation_floor: u32,
    /// Whether the table was released by a teardown
    released: bool,
    config: RegistryConfig,
    stats: RegistryStats,
}

fn allocate_slots(count: usize, generation: u32) -> Result<Vec<Slot>> {
    let mut slots = Vec::new();
    slots
        .try_reserve_exact(count)
        .map_err(|_| TwineError::allocation(count.saturating_mul(std::mem::size_of::<Slot>())))?;
    slots.resize_with(count, || Slot {
        generation,
        string: None,
    });
    Ok(slots)
}

impl SlotTable {
    /// Create a table with `config.initial_slots` empty slots
    pub(crate) fn new(config: RegistryConfig) -> Result<Self> {
        let slots = allocate_slots(config.initial_slots, 0)?;
        let stats = RegistryStats {
            slot_capacity: slots.len(),
            ..RegistryStats::default()
        };

        Ok(Self {
            slots,
            high_watermark: 0,
            vacated: BTreeSet::new(),
            retired: BTreeSet::new(),
            generation_floor: 0,
            released: false,
            config,
            stats,
        })
    }

    /// Store `string` in a free slot, returning `(slot, generation)`
    pub(crate) fn register(&mut self, string: ByteString) -> Result<(u32, u32)> {
        if self.released {
            self.reinitialize()?;
        }

        let slot = match self.vacated.pop_first() {
            Some(slot) => slot,
            None => loop {
                if self.high_watermark == self.slots.len() {
                    self.grow()?;
                }
                let slot = self.high_watermark;
                self.high_watermark += 1;
                if !self.retired.contains(&slot) {
                    break slot;
                }
            },
        };

        let entry = &mut self.slots[slot];
        entry.string = Some(string);
        self.stats.record_registration();
        self.stats.high_watermark = self.high_watermark;

        // grow() keeps the slot count within u32
        Ok((slot as u32, entry.generation))
    }

    /// Take the string out of its slot, leaving the slot vacated
    pub(crate) fn unregister(&mut self, slot: u32, generation: u32) -> Result<ByteString> {
        let index = slot as usize;
        let entry = self
            .slots
            .get_mut(index)
            .filter(|entry| entry.generation == generation)
            .ok_or_else(|| TwineError::invalid_handle(slot, generation))?;

        let string = entry
            .string
            .take()
            .ok_or_else(|| TwineError::invalid_handle(slot, generation))?;

        match entry.generation.checked_add(1) {
            Some(next) => {
                entry.generation = next;
                self.vacated.insert(index);
            }
            None => {
                self.retired.insert(index);
                debug!("slot {} retired after exhausting its generations", index);
            }
        }
        self.stats.record_release(1);

        Ok(string)
    }

    /// Shared access to a live string
    pub(crate) fn get(&self, slot: u32, generation: u32) -> Result<&ByteString> {
        self.slots
            .get(slot as usize)
            .filter(|entry| entry.generation == generation)
            .and_then(|entry| entry.string.as_ref())
            .ok_or_else(|| TwineError::invalid_handle(slot, generation))
    }

    /// Exclusive access to a live string
    pub(crate) fn get_mut(&mut self, slot: u32, generation: u32) -> Result<&mut ByteString> {
        self.slots
            .get_mut(slot as usize)
            .filter(|entry| entry.generation == generation)
            .and_then(|entry| entry.string.as_mut())
            .ok_or_else(|| TwineError::invalid_handle(slot, generation))
    }

    /// Release every remaining string and the table itself
    ///
    /// Returns the number of strings released; 0 if already released.
    pub(crate) fn teardown(&mut self) -> usize {
        if self.released {
            return 0;
        }

        let mut released = 0;
        let mut floor = self.generation_floor;

        for (index, entry) in self.slots[..self.high_watermark].iter_mut().enumerate() {
            if entry.string.take().is_some() {
                released += 1;
            }
            // Handles at the last generation can only be kept invalid by retiring
            if entry.generation == u32::MAX {
                self.retired.insert(index);
            }
            floor = floor.max(entry.generation.saturating_add(1));
        }

        let slot_count = self.slots.len();
        self.slots = Vec::new();
        self.vacated.clear();
        self.high_watermark = 0;
        self.generation_floor = floor;
        self.released = true;

        self.stats.record_release(released);
        self.stats.slot_capacity = 0;
        self.stats.high_watermark = 0;
        self.stats.teardowns += 1;

        debug!(
            "registry teardown released {} strings and {} slots",
            released, slot_count
        );

        released
    }

    /// Live `(slot, generation)` pairs in ascending slot order
    pub(crate) fn live_entries(&self) -> Vec<(u32, u32)> {
        self.slots[..self.high_watermark]
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.string.is_some())
            .map(|(index, entry)| (index as u32, entry.generation))
            .collect()
    }

    pub(crate) fn live_count(&self) -> usize {
        self.stats.live
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn high_watermark(&self) -> usize {
        self.high_watermark
    }

    pub(crate) fn is_released(&self) -> bool {
        self.released
    }

    pub(crate) fn stats(&self) -> RegistryStats {
        self.stats.clone()
    }

    /// Grow by the configured factor, keeping every slot at its index
    fn grow(&mut self) -> Result<()> {
        let current = self.slots.len();
        let target = self.config.grown_slots(current);
        if target <= current {
            return Err(TwineError::allocation(target));
        }

        let additional = target - current;
        self.slots.try_reserve_exact(additional).map_err(|_| {
            TwineError::allocation(additional.saturating_mul(std::mem::size_of::<Slot>()))
        })?;

        let generation = self.generation_floor;
        self.slots.resize_with(target, || Slot {
            generation,
            string: None,
        });

        self.stats.slot_capacity = target;
        self.stats.grow_events += 1;
        debug!("registry table grew from {} to {} slots", current, target);

        Ok(())
    }

    /// Re-create a released table at its initial size
    fn reinitialize(&mut self) -> Result<()> {
        self.slots = allocate_slots(self.config.initial_slots, self.generation_floor)?;
        self.released = false;
        self.stats.slot_capacity = self.slots.len();

        debug!(
            "registry table re-created with {} slots after teardown",
            self.slots.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(initial_slots: usize) -> SlotTable {
        SlotTable::new(RegistryConfig::default().with_initial_slots(initial_slots)).unwrap()
    }

    fn string(bytes: &[u8]) -> ByteString {
        ByteString::from_bytes(bytes).unwrap()
    }

    #[test]
    fn test_lowest_vacated_slot_is_reused() {
        let mut table = table(8);
        let slots: Vec<_> = (0..4).map(|_| table.register(string(b"x")).unwrap()).collect();

        table.unregister(slots[2].0, slots[2].1).unwrap();
        table.unregister(slots[1].0, slots[1].1).unwrap();

        let (slot, generation) = table.register(string(b"y")).unwrap();
        assert_eq!(slot, 1);
        assert_eq!(generation, slots[1].1 + 1);
        assert_eq!(table.high_watermark(), 4);
    }

    #[test]
    fn test_grow_preserves_indices() {
        let mut table = table(2);
        let a = table.register(string(b"a")).unwrap();
        let b = table.register(string(b"b")).unwrap();
        assert_eq!(table.capacity(), 2);

        let c = table.register(string(b"c")).unwrap();
        assert_eq!(table.capacity(), 4);
        assert_eq!(c.0, 2);

        assert_eq!(table.get(a.0, a.1).unwrap(), b"a");
        assert_eq!(table.get(b.0, b.1).unwrap(), b"b");
        assert_eq!(table.stats().grow_events, 1);
    }

    #[test]
    fn test_stale_generation_is_rejected() {
        let mut table = table(4);
        let (slot, generation) = table.register(string(b"a")).unwrap();
        table.unregister(slot, generation).unwrap();

        assert!(table.get(slot, generation).is_err());
        assert!(table.unregister(slot, generation).is_err());
    }

    #[test]
    fn test_exhausted_slot_is_retired() {
        let mut table = table(4);
        let (slot, _) = table.register(string(b"a")).unwrap();
        table.slots[slot as usize].generation = u32::MAX;
        table.unregister(slot, u32::MAX).unwrap();

        assert!(table.get(slot, u32::MAX).is_err());
        let (next, _) = table.register(string(b"b")).unwrap();
        assert_eq!(next, slot + 1);

        // Every slot now starts at the last generation; slot 0 must stay out
        assert_eq!(table.teardown(), 1);
        let (first, generation) = table.register(string(b"c")).unwrap();
        assert_eq!(first, slot + 1);
        assert_eq!(generation, u32::MAX);
        assert!(table.get(slot, u32::MAX).is_err());
    }

    #[test]
    fn test_teardown_then_reuse() {
        let mut table = table(4);
        let (slot, generation) = table.register(string(b"a")).unwrap();
        table.register(string(b"b")).unwrap();

        assert_eq!(table.teardown(), 2);
        assert!(table.is_released());
        assert_eq!(table.capacity(), 0);
        assert_eq!(table.teardown(), 0);

        let (new_slot, new_generation) = table.register(string(b"c")).unwrap();
        assert_eq!(new_slot, slot);
        assert_ne!(new_generation, generation);
        assert!(table.get(slot, generation).is_err());
        assert_eq!(table.capacity(), 4);
    }
}
