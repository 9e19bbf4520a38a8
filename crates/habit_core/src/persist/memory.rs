//! In-process snapshot store for headless hosts and tests.

use crate::persist::{PersistError, PersistResult, SnapshotStore};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Map-backed snapshot store.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slots: RefCell<BTreeMap<String, String>>,
    fail_saves: Cell<bool>,
    save_count: Cell<usize>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store whose `slot` already holds `payload`.
    pub fn with_snapshot(slot: &str, payload: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .slots
            .borrow_mut()
            .insert(slot.to_string(), payload.into());
        store
    }

    /// Makes subsequent saves fail with `PersistError::Unavailable`.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }

    /// Current raw payload of `slot`.
    pub fn payload(&self, slot: &str) -> Option<String> {
        self.slots.borrow().get(slot).cloned()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load_snapshot(&self, slot: &str) -> PersistResult<Option<String>> {
        Ok(self.payload(slot))
    }

    fn save_snapshot(&self, slot: &str, payload: &str) -> PersistResult<()> {
        if self.fail_saves.get() {
            return Err(PersistError::Unavailable("saves disabled".to_string()));
        }
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), payload.to_string());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
