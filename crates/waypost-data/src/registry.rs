// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The generic registry of uniquely-named records.
//!
//! One `RwLock` guards both indices (id → record, name key → id) as a single
//! compound structure, so an observer can never see an id in one index
//! without its name in the other: every mutation updates both under the same
//! write lock.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use waypost_core::{name_key, NamedRecord, RecordId, RegistryError};

#[derive(Default)]
struct Indexes<T> {
    by_id: HashMap<RecordId, Arc<T>>,
    by_name: HashMap<String, RecordId>,
}

/// A thread-safe store of records of one kind, indexed by stable id and by
/// case-insensitive name.
///
/// The registry holds the only authoritative copy of each record; callers
/// get `Arc` handles and mutate records in place through the records' own
/// interior locks. Iteration order of [`values`](NamedRegistry::values) is
/// unspecified — callers needing a stable order (role priority, line order)
/// sort explicitly.
pub struct NamedRegistry<T: NamedRecord> {
    inner: RwLock<Indexes<T>>,
}

impl<T: NamedRecord> NamedRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Indexes {
                by_id: HashMap::new(),
                by_name: HashMap::new(),
            }),
        }
    }

    /// Inserts a record under its current name.
    ///
    /// Fails with [`RegistryError::DuplicateName`] when the name is already
    /// taken (case-insensitively), leaving the registry untouched.
    pub fn insert(&self, record: Arc<T>) -> Result<(), RegistryError> {
        let name = record.name();
        let key = name_key(&name);
        let mut inner = self.inner.write().unwrap();
        if inner.by_name.contains_key(&key) {
            return Err(RegistryError::DuplicateName(name));
        }
        inner.by_name.insert(key, record.id());
        inner.by_id.insert(record.id(), record);
        Ok(())
    }

    /// Looks a record up by id.
    pub fn get(&self, id: RecordId) -> Option<Arc<T>> {
        self.inner.read().unwrap().by_id.get(&id).cloned()
    }

    /// Looks a record up by name, case-insensitively.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<T>> {
        let inner = self.inner.read().unwrap();
        let id = inner.by_name.get(&name_key(name))?;
        inner.by_id.get(id).cloned()
    }

    /// Returns `true` if a record with this name exists (case-insensitive).
    pub fn contains_name(&self, name: &str) -> bool {
        self.inner
            .read()
            .unwrap()
            .by_name
            .contains_key(&name_key(name))
    }

    /// Removes the record with this name from both indices in one step.
    ///
    /// Returns the removed record so the caller can run teardown (e.g.
    /// despawn a live projection) against it.
    pub fn remove_by_name(&self, name: &str) -> Option<Arc<T>> {
        let mut inner = self.inner.write().unwrap();
        let id = inner.by_name.remove(&name_key(name))?;
        inner.by_id.remove(&id)
    }

    /// Renames a record, keeping the name index and the record's own name in
    /// agreement under a single lock.
    pub fn rename(&self, current: &str, new: &str) -> Result<(), RegistryError> {
        let current_key = name_key(current);
        let new_key = name_key(new);
        let mut inner = self.inner.write().unwrap();

        let Some(&id) = inner.by_name.get(&current_key) else {
            return Err(RegistryError::UnknownRecord(current.to_string()));
        };
        // Renaming only by case ("spawn" -> "Spawn") maps to the same key.
        if new_key != current_key && inner.by_name.contains_key(&new_key) {
            return Err(RegistryError::DuplicateName(new.to_string()));
        }

        inner.by_name.remove(&current_key);
        inner.by_name.insert(new_key, id);
        if let Some(record) = inner.by_id.get(&id) {
            record.set_name(new);
        }
        Ok(())
    }

    /// A snapshot of all records. Iteration order is unspecified.
    pub fn values(&self) -> Vec<Arc<T>> {
        self.inner.read().unwrap().by_id.values().cloned().collect()
    }

    /// The number of records.
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().by_id.len()
    }

    /// Returns `true` if the registry holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().by_id.is_empty()
    }

    /// Removes every record.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.by_id.clear();
        inner.by_name.clear();
    }
}

impl<T: NamedRecord> Default for NamedRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock as StdRwLock;

    struct Waypoint {
        id: RecordId,
        name: StdRwLock<String>,
    }

    impl Waypoint {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                id: RecordId::new(),
                name: StdRwLock::new(name.to_string()),
            })
        }
    }

    impl NamedRecord for Waypoint {
        fn id(&self) -> RecordId {
            self.id
        }

        fn name(&self) -> String {
            self.name.read().unwrap().clone()
        }

        fn set_name(&self, name: &str) {
            *self.name.write().unwrap() = name.to_string();
        }
    }

    #[test]
    fn insert_then_lookup_any_case() {
        let registry = NamedRegistry::new();
        let record = Waypoint::new("Spawn");
        registry.insert(Arc::clone(&record)).unwrap();

        for variant in ["Spawn", "spawn", "SPAWN", "sPaWn"] {
            let found = registry.get_by_name(variant).unwrap();
            assert_eq!(found.id(), record.id());
        }
        assert_eq!(registry.get(record.id()).unwrap().id(), record.id());
    }

    #[test]
    fn duplicate_name_rejected_without_mutation() {
        let registry = NamedRegistry::new();
        registry.insert(Waypoint::new("Spawn")).unwrap();

        let err = registry.insert(Waypoint::new("SPAWN")).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("SPAWN".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_clears_both_indices() {
        let registry = NamedRegistry::new();
        let record = Waypoint::new("market");
        registry.insert(Arc::clone(&record)).unwrap();

        let removed = registry.remove_by_name("MARKET").unwrap();
        assert_eq!(removed.id(), record.id());
        assert!(registry.get_by_name("market").is_none());
        assert!(registry.get(record.id()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_missing_returns_none() {
        let registry = NamedRegistry::<Waypoint>::new();
        assert!(registry.remove_by_name("ghost").is_none());
    }

    #[test]
    fn rename_moves_the_name_index() {
        let registry = NamedRegistry::new();
        let record = Waypoint::new("old");
        registry.insert(Arc::clone(&record)).unwrap();

        registry.rename("OLD", "new").unwrap();
        assert!(registry.get_by_name("old").is_none());
        assert_eq!(registry.get_by_name("NEW").unwrap().id(), record.id());
        assert_eq!(record.name(), "new");
    }

    #[test]
    fn rename_rejects_collisions_and_unknowns() {
        let registry = NamedRegistry::new();
        registry.insert(Waypoint::new("a")).unwrap();
        registry.insert(Waypoint::new("b")).unwrap();

        assert_eq!(
            registry.rename("a", "B").unwrap_err(),
            RegistryError::DuplicateName("B".to_string())
        );
        assert_eq!(
            registry.rename("ghost", "c").unwrap_err(),
            RegistryError::UnknownRecord("ghost".to_string())
        );
        // Case-only rename of the same record is allowed.
        registry.rename("a", "A").unwrap();
        assert_eq!(registry.get_by_name("a").unwrap().name(), "A");
    }

    #[test]
    fn concurrent_inserts_keep_indices_consistent() {
        use std::thread;

        let registry = Arc::new(NamedRegistry::new());
        let mut handles = Vec::new();
        for t in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for i in 0..50 {
                    registry
                        .insert(Waypoint::new(&format!("wp-{t}-{i}")))
                        .unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(registry.len(), 200);
        for record in registry.values() {
            // Every id visible in the snapshot resolves through its name too.
            let by_name = registry.get_by_name(&record.name()).unwrap();
            assert_eq!(by_name.id(), record.id());
        }
    }
}
