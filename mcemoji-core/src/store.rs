//! Ordered, index-stable store of emoji records

use crate::names::{letters, NameGenerator, RandomNameGenerator};
use crate::record::{is_valid_name, is_valid_permission, parse_metric, AssetRecord, Field};
use crate::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Number of generator candidates tried before falling back to `emoji_<letters>`
const MAX_FALLBACK_ATTEMPTS: usize = 32;

/// Holds the records of one editing session
///
/// Slots are never compacted: removing a record leaves a tombstone so every
/// other record keeps the index it was given by [`Store::add`].
pub struct Store {
    slots: Vec<Option<AssetRecord>>,
    /// Names of the live records
    live_names: HashSet<String>,
    names: Box<dyn NameGenerator>,
}

impl Store {
    /// Creates an empty store using random fallback names
    pub fn new() -> Self {
        Self::with_name_generator(RandomNameGenerator::new())
    }

    /// Creates an empty store with a custom fallback name generator
    pub fn with_name_generator<G>(generator: G) -> Self
    where
        G: NameGenerator + 'static,
    {
        Self {
            slots: Vec::new(),
            live_names: HashSet::new(),
            names: Box::new(generator),
        }
    }

    /// Adds a record and returns its index
    ///
    /// Fields are taken as given. If a live record already uses `name`, the
    /// new record is stored under a generated name instead.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        image: Vec<u8>,
        ascent: u32,
        height: u32,
        permission: Option<String>,
    ) -> usize {
        let requested = name.into();
        let name = if self.contains_name(&requested) {
            let fallback = self.fallback_name();
            debug!(
                requested = %requested,
                fallback = %fallback,
                "emoji name already in use, renamed"
            );
            fallback
        } else {
            requested
        };

        let index = self.slots.len();
        self.live_names.insert(name.clone());
        self.slots
            .push(Some(AssetRecord::new(name, image, ascent, height, permission)));
        index
    }

    /// Edits one field of a live record
    ///
    /// `raw` is validated before anything is changed; a rejected edit leaves
    /// the record exactly as it was. An empty permission clears it.
    pub fn update(&mut self, index: usize, field: Field, raw: &str) -> Result<()> {
        if self.get(index).is_none() {
            return Err(Error::RecordNotFound(index));
        }
        let rejected = || Error::ValidationRejected {
            field,
            value: raw.to_string(),
        };

        match field {
            Field::Name => {
                if !is_valid_name(raw) {
                    return Err(rejected());
                }
                if self.get(index).is_some_and(|record| record.name == raw) {
                    return Ok(());
                }
                if self.live_names.contains(raw) {
                    return Err(Error::NameTaken(raw.to_string()));
                }
                let old = std::mem::replace(&mut self.record_mut(index)?.name, raw.to_string());
                self.live_names.remove(&old);
                self.live_names.insert(raw.to_string());
            }
            Field::Ascent => {
                let value = parse_metric(raw).ok_or_else(rejected)?;
                self.record_mut(index)?.ascent = value;
            }
            Field::Height => {
                let value = parse_metric(raw).ok_or_else(rejected)?;
                self.record_mut(index)?.height = value;
            }
            Field::Permission => {
                let value = if raw.is_empty() {
                    None
                } else if is_valid_permission(raw) {
                    Some(raw.to_string())
                } else {
                    return Err(rejected());
                };
                self.record_mut(index)?.permission = value;
            }
        }

        Ok(())
    }

    /// Tombstones the record at `index`; unknown or removed indices are ignored
    pub fn remove(&mut self, index: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            if let Some(record) = slot.take() {
                self.live_names.remove(&record.name);
                debug!(index, name = %record.name, "emoji removed");
            }
        }
    }

    /// Gets a live record by index
    pub fn get(&self, index: usize) -> Option<&AssetRecord> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Iterates live records in insertion order
    pub fn live_records(&self) -> impl Iterator<Item = &AssetRecord> + Clone + '_ {
        self.slots.iter().flatten()
    }

    /// Iterates live records together with their indices
    pub fn live_entries(&self) -> impl Iterator<Item = (usize, &AssetRecord)> + Clone + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|record| (index, record)))
    }

    /// Checks whether a live record uses `name`
    pub fn contains_name(&self, name: &str) -> bool {
        self.live_names.contains(name)
    }

    /// Returns the number of slots, tombstones included
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of live records
    pub fn live_count(&self) -> usize {
        self.live_names.len()
    }

    /// Checks whether the store has no live records
    pub fn is_empty(&self) -> bool {
        self.live_names.is_empty()
    }

    fn record_mut(&mut self, index: usize) -> Result<&mut AssetRecord> {
        self.slots
            .get_mut(index)
            .and_then(Option::as_mut)
            .ok_or(Error::RecordNotFound(index))
    }

    fn fallback_name(&mut self) -> String {
        for _ in 0..MAX_FALLBACK_ATTEMPTS {
            let candidate = self.names.generate_fallback_name();
            if !candidate.is_empty() && !self.contains_name(&candidate) {
                return candidate;
            }
        }

        // The generator keeps colliding; count upwards from the slot count.
        let mut counter = self.slots.len();
        loop {
            let candidate = format!("emoji_{}", letters(counter));
            if !self.contains_name(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("slots", &self.slots).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(name: &'static str) -> impl FnMut() -> String {
        move || name.to_string()
    }

    fn store_with(names: &[&str]) -> Store {
        let mut store = Store::with_name_generator(fixed("fallback"));
        for name in names {
            store.add(*name, vec![0; 4], 8, 9, None);
        }
        store
    }

    fn live_names(store: &Store) -> Vec<&str> {
        store.live_records().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_add_returns_sequential_indices() {
        let mut store = Store::new();
        assert_eq!(store.add("smile", vec![1], 8, 9, None), 0);
        assert_eq!(store.add("sad", vec![2], 8, 9, None), 1);
        assert_eq!(store.get(1).map(|r| r.name.as_str()), Some("sad"));
        assert_eq!(store.live_count(), 2);
    }

    #[test]
    fn test_collision_uses_fallback_name() {
        let mut store = store_with(&["foo"]);
        let index = store.add("foo", vec![], 8, 9, None);
        assert_eq!(store.get(index).map(|r| r.name.as_str()), Some("fallback"));
        assert_eq!(live_names(&store), vec!["foo", "fallback"]);
    }

    #[test]
    fn test_collision_with_random_generator_is_unique() {
        let mut store = Store::with_name_generator(RandomNameGenerator::seeded(7));
        store.add("foo", vec![], 8, 9, None);
        let index = store.add("foo", vec![], 8, 9, None);
        let renamed = &store.get(index).unwrap().name;
        assert_ne!(renamed, "foo");
        assert_eq!(store.live_records().filter(|r| &r.name == renamed).count(), 1);
    }

    #[test]
    fn test_colliding_generator_falls_back_to_counter() {
        let mut store = store_with(&["foo", "fallback"]);
        let index = store.add("foo", vec![], 8, 9, None);
        assert_eq!(store.get(index).unwrap().name, "emoji_c");

        let index = store.add("foo", vec![], 8, 9, None);
        assert_eq!(store.get(index).unwrap().name, "emoji_d");
    }

    #[test]
    fn test_name_of_removed_record_can_be_reused() {
        let mut store = store_with(&["foo"]);
        store.remove(0);
        let index = store.add("foo", vec![], 8, 9, None);
        assert_eq!(index, 1);
        assert_eq!(store.get(1).unwrap().name, "foo");
    }

    #[test]
    fn test_remove_keeps_indices_stable() {
        let mut store = store_with(&["a", "b", "c"]);
        store.remove(1);

        assert!(store.get(1).is_none());
        assert_eq!(store.get(2).unwrap().name, "c");
        assert_eq!(store.len(), 3);
        assert_eq!(live_names(&store), vec!["a", "c"]);

        let index = store.add("d", vec![], 8, 9, None);
        assert_eq!(index, 3);
        assert!(store.get(1).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = store_with(&["a", "b"]);
        store.remove(0);
        store.remove(0);
        store.remove(99);
        assert_eq!(live_names(&store), vec!["b"]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_live_records_is_restartable() {
        let store = store_with(&["a", "b", "c"]);
        let iter = store.live_records();
        let first: Vec<_> = iter.clone().map(|r| r.name.clone()).collect();
        let second: Vec<_> = iter.map(|r| r.name.clone()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_is_empty_ignores_tombstones() {
        let mut store = store_with(&["a"]);
        assert!(!store.is_empty());
        store.remove(0);
        assert!(store.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_valid_fields() {
        let mut store = store_with(&["smile"]);
        store.update(0, Field::Name, "grin").unwrap();
        store.update(0, Field::Ascent, "10").unwrap();
        store.update(0, Field::Height, "12").unwrap();
        store.update(0, Field::Permission, "emojis.grin").unwrap();

        let record = store.get(0).unwrap();
        assert_eq!(record.name, "grin");
        assert_eq!(record.ascent, 10);
        assert_eq!(record.height, 12);
        assert_eq!(record.permission.as_deref(), Some("emojis.grin"));

        store.update(0, Field::Permission, "").unwrap();
        assert_eq!(store.get(0).unwrap().permission, None);
    }

    #[test]
    fn test_rejected_update_leaves_record_unchanged() {
        let mut store = store_with(&["smile"]);
        let before = store.get(0).cloned();

        for (field, value) in [
            (Field::Name, "9lives"),
            (Field::Name, ""),
            (Field::Name, "waytoolongforaname"),
            (Field::Ascent, "abc"),
            (Field::Ascent, "-3"),
            (Field::Height, "1.5"),
            (Field::Permission, "Emojis.Smile"),
        ] {
            let err = store.update(0, field, value).unwrap_err();
            assert!(
                matches!(err, Error::ValidationRejected { field: f, .. } if f == field),
                "{field}: {err}"
            );
        }

        assert_eq!(store.get(0).cloned(), before);
    }

    #[test]
    fn test_rename_to_live_name_is_rejected() {
        let mut store = store_with(&["smile", "sad"]);
        let err = store.update(1, Field::Name, "smile").unwrap_err();
        assert!(matches!(err, Error::NameTaken(name) if name == "smile"));
        assert_eq!(store.get(1).unwrap().name, "sad");

        // renaming a record to its own name is fine
        store.update(1, Field::Name, "sad").unwrap();
    }

    #[test]
    fn test_update_removed_record() {
        let mut store = store_with(&["smile"]);
        store.remove(0);
        assert!(matches!(
            store.update(0, Field::Ascent, "3"),
            Err(Error::RecordNotFound(0))
        ));
        assert!(matches!(
            store.update(5, Field::Ascent, "3"),
            Err(Error::RecordNotFound(5))
        ));
    }

    #[test]
    fn test_rename_frees_the_old_name() {
        let mut store = store_with(&["smile", "sad"]);
        store.update(0, Field::Name, "grin").unwrap();
        assert!(!store.contains_name("smile"));
        assert!(store.contains_name("grin"));

        // the old name is free again, the new one is not
        assert_eq!(store.add("smile", vec![], 8, 9, None), 2);
        assert_eq!(store.get(2).unwrap().name, "smile");
        store.add("grin", vec![], 8, 9, None);
        assert_eq!(store.get(3).unwrap().name, "fallback");

        store.remove(0);
        assert!(!store.contains_name("grin"));
        assert_eq!(live_names(&store), vec!["sad", "smile", "fallback"]);
        assert_eq!(store.live_count(), 3);
    }

    #[test]
    fn test_many_records() {
        let mut store = Store::with_name_generator(fixed("fallback"));
        for i in 0..50_000 {
            store.add(letters(i), vec![], 8, 9, None);
        }
        assert_eq!(store.live_count(), 50_000);
        assert!(store.contains_name(&letters(49_999)));

        let index = store.add(letters(0), vec![], 8, 9, None);
        assert_eq!(store.get(index).unwrap().name, "fallback");
    }
}
