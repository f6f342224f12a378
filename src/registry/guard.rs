//! Registry lock guard
//!
//! Tracks which registries the current thread has locked, so that a call
//! made from inside [`Registry::with`](super::Registry::with) on the same
//! registry fails instead of deadlocking on the non-reentrant mutex.

use std::{
    cell::RefCell,
    ops::{Deref, DerefMut},
    sync::{Mutex, MutexGuard},
};

use log::warn;

use crate::error::{Result, TwineError};

use super::table::SlotTable;

thread_local! {
    /// Ids of the registries whose lock this thread holds
    static HELD: RefCell<Vec<u32>> = RefCell::new(Vec::new());
}

/// Exclusive access to a registry's slot table
pub(crate) struct TableGuard<'a> {
    registry: u32,
    guard: MutexGuard<'a, SlotTable>,
}

impl<'a> TableGuard<'a> {
    /// Lock `table` on behalf of registry `registry`
    ///
    /// A poisoned lock is recovered: a panic while the lock was held cannot
    /// leave the table half-updated, since closures only get shared access
    /// and every table write completes before anything that may panic.
    pub(crate) fn acquire(registry: u32, table: &'a Mutex<SlotTable>) -> Result<Self> {
        let reentrant = HELD
            .try_with(|held| held.borrow().contains(&registry))
            .unwrap_or(false);
        if reentrant {
            return Err(TwineError::concurrency(format!(
                "registry {} called from a closure holding its lock",
                registry
            )));
        }

        let guard = match table.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("registry {} lock poisoned by a panic, recovering", registry);
                poisoned.into_inner()
            }
        };

        let _ = HELD.try_with(|held| held.borrow_mut().push(registry));
        Ok(Self { registry, guard })
    }
}

impl Deref for TableGuard<'_> {
    type Target = SlotTable;

    fn deref(&self) -> &SlotTable {
        &self.guard
    }
}

impl DerefMut for TableGuard<'_> {
    fn deref_mut(&mut self) -> &mut SlotTable {
        &mut self.guard
    }
}

impl Drop for TableGuard<'_> {
    fn drop(&mut self) {
        let _ = HELD.try_with(|held| {
            let mut held = held.borrow_mut();
            if let Some(position) = held.iter().rposition(|&id| id == self.registry) {
                held.remove(position);
            }
        });
    }
}
