//! Reversible value/placeholder ledger
//!
//! [`MappingStore`] assigns each distinct sensitive value one stable
//! placeholder and remembers it in both directions. The store is
//! append-only: an entry, once registered, is never removed or renumbered.
//!
//! # Thread Safety
//!
//! All state sits behind one mutex, so the check-then-insert sequence in
//! [`get_or_create_placeholder`](MappingStore::get_or_create_placeholder)
//! is a single critical section and two concurrent callers can never mint
//! two placeholders for the same value.

use super::placeholder::{format_placeholder, parse_placeholder};
use crate::domain::{Category, Result, VeilError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// One value/placeholder pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderEntry {
    /// Original sensitive value (exact-match key)
    pub original: String,
    /// Placeholder token issued for it
    pub placeholder: String,
    /// Category the value was first registered under
    pub category: Category,
}

/// Serialized form of the whole store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSnapshot {
    /// Snapshot format version
    pub version: u32,
    /// Entries in issue order
    pub entries: Vec<PlaceholderEntry>,
    /// Highest number issued per placeholder prefix
    pub counters: BTreeMap<String, u64>,
    /// When the snapshot was taken
    pub saved_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MappingState {
    entries: Vec<PlaceholderEntry>,
    by_value: HashMap<String, usize>,
    by_placeholder: HashMap<String, usize>,
    counters: HashMap<String, u64>,
    dirty: bool,
}

impl MappingState {
    fn push(&mut self, entry: PlaceholderEntry) {
        let idx = self.entries.len();
        self.by_value.insert(entry.original.clone(), idx);
        self.by_placeholder.insert(entry.placeholder.clone(), idx);
        self.entries.push(entry);
    }

    fn next_placeholder(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format_placeholder(prefix, *counter);
            if !self.by_placeholder.contains_key(&candidate) {
                return candidate;
            }
        }
    }
}

/// Bidirectional, append-only mapping between values and placeholders
#[derive(Debug, Default)]
pub struct MappingStore {
    state: Mutex<MappingState>,
}

impl MappingStore {
    /// Snapshot format version written by [`snapshot`](Self::snapshot)
    pub const SNAPSHOT_VERSION: u32 = 1;

    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from a persisted snapshot
    pub fn from_snapshot(snapshot: MappingSnapshot) -> Result<Self> {
        let store = Self::new();
        store.restore(snapshot)?;
        Ok(store)
    }

    fn lock(&self) -> MutexGuard<'_, MappingState> {
        // The state is consistent after every statement that mutates it, so a
        // panic elsewhere while holding the lock cannot leave it half-written.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the placeholder for `value`, minting one if it is new
    ///
    /// Idempotent: the same value always yields the same placeholder for
    /// the lifetime of the store, regardless of the category passed on
    /// later calls.
    pub fn get_or_create_placeholder(&self, value: &str, category: &Category) -> String {
        self.assign(value, category).0
    }

    /// Like [`get_or_create_placeholder`](Self::get_or_create_placeholder),
    /// also reporting whether a new entry was created
    pub fn assign(&self, value: &str, category: &Category) -> (String, bool) {
        let mut state = self.lock();

        if let Some(&idx) = state.by_value.get(value) {
            return (state.entries[idx].placeholder.clone(), false);
        }

        let placeholder = state.next_placeholder(&category.placeholder_prefix());
        state.push(PlaceholderEntry {
            original: value.to_string(),
            placeholder: placeholder.clone(),
            category: category.clone(),
        });
        state.dirty = true;

        tracing::debug!(category = %category, placeholder = %placeholder, "Registered new placeholder");
        (placeholder, true)
    }

    /// Look up the original value for a placeholder
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::UnknownPlaceholder`] if this store never issued
    /// the token.
    pub fn resolve(&self, placeholder: &str) -> Result<String> {
        let state = self.lock();
        state
            .by_placeholder
            .get(placeholder)
            .map(|&idx| state.entries[idx].original.clone())
            .ok_or_else(|| VeilError::UnknownPlaceholder(placeholder.to_string()))
    }

    /// Forward lookup without creating an entry
    pub fn lookup(&self, value: &str) -> Option<String> {
        let state = self.lock();
        state
            .by_value
            .get(value)
            .map(|&idx| state.entries[idx].placeholder.clone())
    }

    /// All entries in issue order
    pub fn entries(&self) -> Vec<PlaceholderEntry> {
        self.lock().entries.clone()
    }

    /// Number of registered values
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Check if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Highest number issued for a placeholder prefix
    pub fn high_water_mark(&self, prefix: &str) -> u64 {
        self.lock().counters.get(prefix).copied().unwrap_or(0)
    }

    /// Whether entries were added since the last snapshot was persisted
    pub fn is_dirty(&self) -> bool {
        self.lock().dirty
    }

    /// Mark the current state as persisted
    pub fn mark_clean(&self) {
        self.lock().dirty = false;
    }

    /// Flag the state as not yet persisted
    pub fn mark_dirty(&self) {
        self.lock().dirty = true;
    }

    /// Serialize the full bijection and numbering state
    pub fn snapshot(&self) -> MappingSnapshot {
        Self::snapshot_of(&self.lock())
    }

    /// Take a snapshot and clear the dirty flag in one step
    ///
    /// Entries registered after the checkpoint set the flag again, so none
    /// is lost between snapshotting and marking clean.
    pub fn checkpoint(&self) -> MappingSnapshot {
        let mut state = self.lock();
        state.dirty = false;
        Self::snapshot_of(&state)
    }

    fn snapshot_of(state: &MappingState) -> MappingSnapshot {
        MappingSnapshot {
            version: Self::SNAPSHOT_VERSION,
            entries: state.entries.clone(),
            counters: state
                .counters
                .iter()
                .map(|(prefix, n)| (prefix.clone(), *n))
                .collect(),
            saved_at: Utc::now(),
        }
    }

    /// Replace the store contents with a snapshot
    ///
    /// Rebuilds both lookup directions. Each prefix counter becomes the
    /// larger of the persisted counter and the highest number on record,
    /// so newly minted tokens never collide with restored ones.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::StoreCorrupt`] if the snapshot version is
    /// unsupported, a token is malformed, or the entries are not a bijection.
    /// The store is left unchanged on error.
    pub fn restore(&self, snapshot: MappingSnapshot) -> Result<()> {
        if snapshot.version > Self::SNAPSHOT_VERSION {
            return Err(VeilError::StoreCorrupt(format!(
                "unsupported mapping snapshot version {}",
                snapshot.version
            )));
        }

        let mut rebuilt = MappingState {
            counters: snapshot.counters.into_iter().collect(),
            ..Default::default()
        };

        for entry in snapshot.entries {
            let (prefix, number) = parse_placeholder(&entry.placeholder).ok_or_else(|| {
                VeilError::StoreCorrupt(format!("malformed placeholder '{}'", entry.placeholder))
            })?;

            if rebuilt.by_value.contains_key(&entry.original) {
                return Err(VeilError::StoreCorrupt(format!(
                    "value mapped twice (second placeholder '{}')",
                    entry.placeholder
                )));
            }
            if rebuilt.by_placeholder.contains_key(&entry.placeholder) {
                return Err(VeilError::StoreCorrupt(format!(
                    "placeholder '{}' mapped to two values",
                    entry.placeholder
                )));
            }

            let counter = rebuilt.counters.entry(prefix.to_string()).or_insert(0);
            *counter = (*counter).max(number);

            rebuilt.push(entry);
        }

        let restored = rebuilt.entries.len();
        *self.lock() = rebuilt;

        tracing::info!(entries = restored, "Mapping store restored");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category::new(name).unwrap()
    }

    #[test]
    fn test_idempotent_mapping() {
        let store = MappingStore::new();
        let first = store.get_or_create_placeholder("Jane Doe", &category("PERSON"));
        let second = store.get_or_create_placeholder("Jane Doe", &category("PERSON"));
        assert_eq!(first, "[PERSON_1]");
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_same_value_other_category_reuses_placeholder() {
        let store = MappingStore::new();
        let first = store.get_or_create_placeholder("Orion", &category("ORG"));
        let second = store.get_or_create_placeholder("Orion", &category("PROJECT"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_per_category_numbering() {
        let store = MappingStore::new();
        assert_eq!(store.get_or_create_placeholder("a", &category("PERSON")), "[PERSON_1]");
        assert_eq!(store.get_or_create_placeholder("b@x.io", &category("EMAIL")), "[EMAIL_1]");
        assert_eq!(store.get_or_create_placeholder("c", &category("PERSON")), "[PERSON_2]");
        assert_eq!(store.high_water_mark("PERSON"), 2);
    }

    #[test]
    fn test_resolve_and_unknown() {
        let store = MappingStore::new();
        let token = store.get_or_create_placeholder("jane@x.com", &category("EMAIL"));
        assert_eq!(store.resolve(&token).unwrap(), "jane@x.com");

        assert!(matches!(
            store.resolve("[EMAIL_7]"),
            Err(VeilError::UnknownPlaceholder(t)) if t == "[EMAIL_7]"
        ));
    }

    #[test]
    fn test_assign_reports_creation_and_dirty_flag() {
        let store = MappingStore::new();
        assert!(!store.is_dirty());
        assert!(store.assign("x", &category("ORG")).1);
        assert!(store.is_dirty());
        store.mark_clean();
        assert!(!store.assign("x", &category("ORG")).1);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_snapshot_restore_preserves_placeholders() {
        let store = MappingStore::new();
        let jane = store.get_or_create_placeholder("Jane Doe", &category("PERSON"));
        store.get_or_create_placeholder("jane@x.com", &category("EMAIL"));

        let restored = MappingStore::from_snapshot(store.snapshot()).unwrap();
        assert_eq!(
            restored.get_or_create_placeholder("Jane Doe", &category("PERSON")),
            jane
        );
        assert_eq!(restored.resolve("[EMAIL_1]").unwrap(), "jane@x.com");
        assert_eq!(
            restored.get_or_create_placeholder("John Roe", &category("PERSON")),
            "[PERSON_2]"
        );
        assert_eq!(restored.len(), 3);
    }

    #[test]
    fn test_restore_recomputes_high_water_mark() {
        let snapshot = MappingSnapshot {
            version: 1,
            entries: vec![PlaceholderEntry {
                original: "Acme".to_string(),
                placeholder: "[ORG_5]".to_string(),
                category: category("ORG"),
            }],
            counters: BTreeMap::new(),
            saved_at: Utc::now(),
        };

        let store = MappingStore::from_snapshot(snapshot).unwrap();
        assert_eq!(store.high_water_mark("ORG"), 5);
        assert_eq!(store.get_or_create_placeholder("Globex", &category("ORG")), "[ORG_6]");
    }

    #[test]
    fn test_restore_keeps_higher_persisted_counter() {
        let mut counters = BTreeMap::new();
        counters.insert("ORG".to_string(), 9);
        let snapshot = MappingSnapshot {
            version: 1,
            entries: Vec::new(),
            counters,
            saved_at: Utc::now(),
        };

        let store = MappingStore::from_snapshot(snapshot).unwrap();
        assert_eq!(store.get_or_create_placeholder("Globex", &category("ORG")), "[ORG_10]");
    }

    #[test]
    fn test_restore_rejects_broken_bijection() {
        let entry = |original: &str, placeholder: &str| PlaceholderEntry {
            original: original.to_string(),
            placeholder: placeholder.to_string(),
            category: category("ORG"),
        };

        for entries in [
            vec![entry("Acme", "[ORG_1]"), entry("Globex", "[ORG_1]")],
            vec![entry("Acme", "[ORG_1]"), entry("Acme", "[ORG_2]")],
            vec![entry("Acme", "ORG-1")],
        ] {
            let store = MappingStore::new();
            store.get_or_create_placeholder("kept", &category("ORG"));
            let result = store.restore(MappingSnapshot {
                version: 1,
                entries,
                counters: BTreeMap::new(),
                saved_at: Utc::now(),
            });
            assert!(matches!(result, Err(VeilError::StoreCorrupt(_))));
            assert_eq!(store.lookup("kept").as_deref(), Some("[ORG_1]"));
        }
    }

    #[test]
    fn test_restore_rejects_future_version() {
        let result = MappingStore::from_snapshot(MappingSnapshot {
            version: 99,
            entries: Vec::new(),
            counters: BTreeMap::new(),
            saved_at: Utc::now(),
        });
        assert!(matches!(result, Err(VeilError::StoreCorrupt(_))));
    }

    #[test]
    fn test_concurrent_assignment_is_consistent() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MappingStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    (0..50)
                        .map(|i| store.get_or_create_placeholder(&format!("user{i}"), &category("PERSON")))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let results: Vec<Vec<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for other in &results[1..] {
            assert_eq!(other, &results[0]);
        }
        assert_eq!(store.len(), 50);
        assert_eq!(store.high_water_mark("PERSON"), 50);
    }
}
