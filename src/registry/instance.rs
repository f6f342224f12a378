//! Instance registry owning every live string

use std::sync::Mutex;

use log::debug;

use crate::{
    buffers::ByteString,
    error::{Result, TwineError},
};

use super::{
    config::RegistryConfig,
    guard::TableGuard,
    handle::{next_registry_id, StringHandle},
    stats::RegistryStats,
    table::SlotTable,
};

/// Table of live strings with bulk teardown
///
/// All strings constructed through a registry are owned by it and reached
/// through [`StringHandle`]s. A single lock serializes slot assignment,
/// removal, table growth and every buffer operation, held for one
/// operation at a time.
///
/// Dropping a registry tears it down.
#[derive(Debug)]
pub struct Registry {
    id: u32,
    config: RegistryConfig,
    table: Mutex<SlotTable>,
}

impl Registry {
    /// Create a registry with the default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a registry with a custom configuration
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        config.validate()?;

        let registry = Self {
            id: next_registry_id(),
            config,
            table: Mutex::new(SlotTable::new(config)?),
        };
        debug!(
            "created registry {} with {} slots",
            registry.id, config.initial_slots
        );

        Ok(registry)
    }

    /// Id stamped into every handle this registry issues
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Decode a raw handle produced by [`StringHandle::to_raw`]
    pub fn handle_from_raw(&self, raw: u64) -> Option<StringHandle> {
        StringHandle::from_raw(self.id, raw)
    }

    // Lifecycle

    /// Construct a string from optional initial bytes and register it
    pub fn construct(&self, initial: Option<&[u8]>) -> Result<StringHandle> {
        let string = ByteString::new(initial, self.config.growth)?;
        self.register(string)
    }

    /// Hand ownership of an existing string to the registry
    pub fn register(&self, string: ByteString) -> Result<StringHandle> {
        let mut table = self.lock()?;
        let (slot, generation) = table.register(string)?;
        Ok(StringHandle::new(self.id, slot, generation))
    }

    /// Remove a string from the registry without releasing it
    pub fn unregister(&self, handle: StringHandle) -> Result<ByteString> {
        self.check_owner(handle)?;
        self.lock()?.unregister(handle.slot() as u32, handle.generation())
    }

    /// Remove a string from the registry and release it
    pub fn destroy(&self, handle: StringHandle) -> Result<()> {
        self.unregister(handle).map(drop)
    }

    /// Release every remaining string and the slot table
    ///
    /// Returns how many strings were released. Calling it again, or on an
    /// empty registry, releases nothing. The next construction re-creates
    /// the table. A lock poisoned by a panicking thread does not prevent the
    /// teardown.
    pub fn teardown_all(&self) -> Result<usize> {
        Ok(self.lock()?.teardown())
    }

    // Buffer operations

    /// Insert `bytes` at `at`
    pub fn insert(&self, handle: StringHandle, bytes: &[u8], at: usize) -> Result<()> {
        self.with_mut(handle, |string| string.insert(bytes, at))
    }

    /// Append `bytes`
    pub fn append(&self, handle: StringHandle, bytes: &[u8]) -> Result<()> {
        self.with_mut(handle, |string| string.append(bytes))
    }

    /// Prepend `bytes`
    pub fn prepend(&self, handle: StringHandle, bytes: &[u8]) -> Result<()> {
        self.with_mut(handle, |string| string.prepend(bytes))
    }

    /// Append the content of `source` to `target`; both may be the same string
    pub fn concat(&self, target: StringHandle, source: StringHandle) -> Result<()> {
        self.check_owner(target)?;
        self.check_owner(source)?;

        let mut table = self.lock()?;
        let bytes = table
            .get(source.slot() as u32, source.generation())?
            .to_vec();
        table
            .get_mut(target.slot() as u32, target.generation())?
            .append(&bytes)
    }

    /// Remove and return the byte at `at`
    pub fn remove(&self, handle: StringHandle, at: usize) -> Result<u8> {
        self.with_mut(handle, |string| string.remove(at))
    }

    /// Read the byte at `at`
    pub fn get(&self, handle: StringHandle, at: usize) -> Result<u8> {
        self.with(handle, |string| string.get(at))?
    }

    /// Overwrite the byte at `at`, returning the previous value
    pub fn set(&self, handle: StringHandle, at: usize, byte: u8) -> Result<u8> {
        self.with_mut(handle, |string| string.set(at, byte))
    }

    /// Offset of the first occurrence of `pattern`; empty patterns match at 0
    pub fn find(&self, handle: StringHandle, pattern: &[u8]) -> Result<Option<usize>> {
        self.with(handle, |string| string.find(pattern))
    }

    /// Register a duplicate of `[i, len)`; `None` when `i == 0` or `i >= len`
    pub fn substring_from(&self, handle: StringHandle, i: usize) -> Result<Option<StringHandle>> {
        self.duplicate(handle, |string| string.substring_from(i))
    }

    /// Register a duplicate of `[i, j)`; `None` unless `i < j <= len`
    pub fn substring(
        &self,
        handle: StringHandle,
        i: usize,
        j: usize,
    ) -> Result<Option<StringHandle>> {
        self.duplicate(handle, |string| string.substring(i, j))
    }

    /// Register a full duplicate with its own buffer
    pub fn copy(&self, handle: StringHandle) -> Result<StringHandle> {
        self.duplicate(handle, |string| string.copy().map(Some))?
            .ok_or_else(|| TwineError::invalid_handle(handle.slot() as u32, handle.generation()))
    }

    /// Drop the content of a string, keeping its allocation
    pub fn clear(&self, handle: StringHandle) -> Result<()> {
        self.with_mut(handle, |string| {
            string.clear();
            Ok(())
        })
    }

    // Accessors

    /// Run `f` with shared access to a string, under the registry lock
    ///
    /// Calls into this same registry from inside `f` fail with
    /// [`TwineError::Concurrency`] rather than waiting on the lock `f` runs
    /// under. Locking another registry from `f` while a second thread does
    /// the reverse can still deadlock.
    pub fn with<R>(&self, handle: StringHandle, f: impl FnOnce(&ByteString) -> R) -> Result<R> {
        self.check_owner(handle)?;
        let table = self.lock()?;
        let string = table.get(handle.slot() as u32, handle.generation())?;
        Ok(f(string))
    }

    /// Logical length of a string
    pub fn len(&self, handle: StringHandle) -> Result<usize> {
        self.with(handle, ByteString::len)
    }

    /// Allocated capacity of a string
    pub fn capacity(&self, handle: StringHandle) -> Result<usize> {
        self.with(handle, ByteString::capacity)
    }

    /// Copy out the content of a string
    pub fn to_vec(&self, handle: StringHandle) -> Result<Vec<u8>> {
        self.with(handle, ByteString::to_vec)
    }

    /// Whether the handle still names a live string in this registry
    pub fn is_live(&self, handle: StringHandle) -> bool {
        self.with(handle, |_| ()).is_ok()
    }

    /// Handles of all live strings in ascending slot order
    pub fn handles(&self) -> Result<Vec<StringHandle>> {
        let table = self.lock()?;
        Ok(table
            .live_entries()
            .into_iter()
            .map(|(slot, generation)| StringHandle::new(self.id, slot, generation))
            .collect())
    }

    /// Number of live strings
    pub fn live_count(&self) -> Result<usize> {
        Ok(self.lock()?.live_count())
    }

    /// Current slot count of the table
    pub fn slot_capacity(&self) -> Result<usize> {
        Ok(self.lock()?.capacity())
    }

    /// One past the highest slot occupied since the table was created
    pub fn high_watermark(&self) -> Result<usize> {
        Ok(self.lock()?.high_watermark())
    }

    /// Whether the table is currently released
    pub fn is_torn_down(&self) -> Result<bool> {
        Ok(self.lock()?.is_released())
    }

    /// Statistics snapshot
    pub fn stats(&self) -> Result<RegistryStats> {
        Ok(self.lock()?.stats())
    }

    // Private helpers

    fn lock(&self) -> Result<TableGuard<'_>> {
        TableGuard::acquire(self.id, &self.table)
    }

    fn check_owner(&self, handle: StringHandle) -> Result<()> {
        if handle.registry_id() != self.id {
            return Err(TwineError::invalid_handle(
                handle.slot() as u32,
                handle.generation(),
            ));
        }
        Ok(())
    }

    fn with_mut<R>(
        &self,
        handle: StringHandle,
        f: impl FnOnce(&mut ByteString) -> Result<R>,
    ) -> Result<R> {
        self.check_owner(handle)?;
        let mut table = self.lock()?;
        let string = table.get_mut(handle.slot() as u32, handle.generation())?;
        f(string)
    }

    /// Build a new string from a live one and register it, under one lock
    fn duplicate(
        &self,
        handle: StringHandle,
        f: impl FnOnce(&ByteString) -> Result<Option<ByteString>>,
    ) -> Result<Option<StringHandle>> {
        self.check_owner(handle)?;
        let mut table = self.lock()?;

        let duplicate = f(table.get(handle.slot() as u32, handle.generation())?)?;
        duplicate
            .map(|string| {
                let (slot, generation) = table.register(string)?;
                Ok(StringHandle::new(self.id, slot, generation))
            })
            .transpose()
    }
}

impl Drop for Registry {
    fn drop(&mut self) {
        let table = match self.table.get_mut() {
            Ok(table) => table,
            Err(poisoned) => poisoned.into_inner(),
        };
        let released = table.teardown();
        if released > 0 {
            debug!("registry {} dropped with {} live strings", self.id, released);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_handle_is_rejected() {
        let a = Registry::new().unwrap();
        let b = Registry::new().unwrap();

        let handle = a.construct(Some(b"abc")).unwrap();
        assert!(matches!(
            b.len(handle),
            Err(TwineError::InvalidHandle { .. })
        ));
        assert!(b.destroy(handle).is_err());
        assert_eq!(a.len(handle).unwrap(), 3);
    }

    #[test]
    fn test_self_concat_doubles_content() {
        let registry = Registry::new().unwrap();
        let handle = registry.construct(Some(b"ab")).unwrap();

        registry.concat(handle, handle).unwrap();
        assert_eq!(registry.to_vec(handle).unwrap(), b"abab");
    }

    #[test]
    fn test_copy_of_empty_string() {
        let registry = Registry::new().unwrap();
        let handle = registry.construct(None).unwrap();

        let copy = registry.copy(handle).unwrap();
        assert_ne!(copy, handle);
        assert_eq!(registry.len(copy).unwrap(), 0);
    }
}
