use std::sync::Arc;

use serde_json::Value;

use crate::json::{get_json, set_json};
use crate::kv::KeyValueStore;
use crate::FAVORITES_KEY;

/// Favorite facility ids, read once from the store and persisted on every
/// toggle.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    ids: Vec<i64>,
}

impl FavoritesStore {
    /// Loads the persisted set. Non-integer and duplicate entries are dropped.
    #[must_use]
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let mut ids: Vec<i64> = Vec::new();
        for id in get_json::<Vec<Value>>(store.as_ref(), FAVORITES_KEY, Vec::new())
            .iter()
            .filter_map(Value::as_i64)
        {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        Self { store, ids }
    }

    /// Adds `facility_id` if absent, removes it if present, then persists.
    ///
    /// Returns the updated set.
    pub fn toggle(&mut self, facility_id: i64) -> &[i64] {
        if let Some(pos) = self.ids.iter().position(|&id| id == facility_id) {
            self.ids.remove(pos);
        } else {
            self.ids.push(facility_id);
        }
        if let Err(error) = set_json(self.store.as_ref(), FAVORITES_KEY, &self.ids) {
            tracing::warn!(facility_id, %error, "failed to persist favorites");
        }
        &self.ids
    }

    #[must_use]
    pub fn is_favorite(&self, facility_id: i64) -> bool {
        self.ids.contains(&facility_id)
    }

    #[must_use]
    pub fn ids(&self) -> &[i64] {
        &self.ids
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::kv::MemoryStore;

    fn as_set(ids: &[i64]) -> BTreeSet<i64> {
        ids.iter().copied().collect()
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut favorites = FavoritesStore::load(Arc::new(MemoryStore::new()));
        assert_eq!(favorites.toggle(5), &[5]);
        assert!(favorites.is_favorite(5));
        assert!(favorites.toggle(5).is_empty());
        assert!(!favorites.is_favorite(5));
    }

    #[test]
    fn toggle_twice_restores_the_set() {
        let store = Arc::new(MemoryStore::with_entries([(FAVORITES_KEY, "[1,2,3]")]));
        let mut favorites = FavoritesStore::load(store);
        for id in [2, 9] {
            let before = as_set(favorites.ids());
            favorites.toggle(id);
            favorites.toggle(id);
            assert_eq!(as_set(favorites.ids()), before);
        }
    }

    #[test]
    fn toggle_persists_immediately() {
        let store = Arc::new(MemoryStore::new());
        let mut favorites = FavoritesStore::load(store.clone());
        favorites.toggle(7);
        favorites.toggle(3);
        assert_eq!(store.get(FAVORITES_KEY).as_deref(), Some("[7,3]"));

        let reloaded = FavoritesStore::load(store);
        assert!(reloaded.is_favorite(7));
        assert!(reloaded.is_favorite(3));
    }

    #[test]
    fn corrupt_favorites_load_as_empty() {
        let store = Arc::new(MemoryStore::with_entries([(FAVORITES_KEY, "undefined")]));
        assert!(FavoritesStore::load(store).ids().is_empty());
    }

    #[test]
    fn non_integer_and_duplicate_entries_are_dropped() {
        let store = Arc::new(MemoryStore::with_entries([(
            FAVORITES_KEY,
            r#"[1, "2", 1, null, 3.5, 4]"#,
        )]));
        assert_eq!(FavoritesStore::load(store).ids(), &[1, 4]);
    }
}
