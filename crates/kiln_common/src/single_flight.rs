//! Keyed memoisation where concurrent callers for one key share a single
//! computation.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use parking_lot::Mutex;

type Slot<V> = Arc<Mutex<Option<V>>>;

/// A map of lazily computed values, one computation per key.
///
/// The first caller for a key runs the initialiser while holding that key's
/// slot lock; concurrent callers for the same key block on the slot and then
/// receive the stored value. Callers for different keys only contend on the
/// short-lived table lock. A failed initialiser stores nothing, so the next
/// caller retries.
pub struct SingleFlight<K, V> {
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K: Eq + Hash + Clone, V: Clone> SingleFlight<K, V> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the value for `key`, computing it with `init` if no caller
    /// has stored one yet.
    pub fn get_or_try_init<E>(
        &self,
        key: &K,
        init: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(key.clone()).or_default())
        };

        let mut value = slot.lock();
        if let Some(existing) = value.as_ref() {
            return Ok(existing.clone());
        }
        let computed = init()?;
        *value = Some(computed.clone());
        Ok(computed)
    }

    /// Returns the stored value for `key` without computing anything.
    ///
    /// Blocks while another caller is computing the value for `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        let slot = self.slots.lock().get(key).cloned()?;
        let value = slot.lock();
        value.clone()
    }

    /// Returns the number of keys with a stored value.
    ///
    /// Keys whose computation is still in flight are not counted.
    pub fn len(&self) -> usize {
        self.slots
            .lock()
            .values()
            .filter(|slot| slot.try_lock().is_some_and(|v| v.is_some()))
            .count()
    }

    /// Returns `true` if no value has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops the stored value for `key`, so the next caller recomputes it.
    pub fn forget(&self, key: &K) {
        self.slots.lock().remove(key);
    }

    /// Drops every stored value.
    pub fn clear(&self) {
        self.slots.lock().clear();
    }
}

impl<K: Eq + Hash + Clone, V: Clone> Default for SingleFlight<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
