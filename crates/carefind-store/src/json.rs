//! Tolerant JSON reads and writes over a [`KeyValueStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::kv::KeyValueStore;

/// Reads `key` as JSON, yielding `fallback` when the key is absent, holds the
/// literal text `undefined`, or does not parse as `T`.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str, fallback: T) -> T {
    let Some(raw) = store.get(key) else {
        return fallback;
    };
    if raw.is_empty() || raw == "undefined" {
        return fallback;
    }
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(key, %error, "persisted value is not valid JSON; using fallback");
            fallback
        }
    }
}

/// Serializes `value` as JSON and stores it under `key`.
///
/// # Errors
///
/// Returns [`StoreError::Serialize`] if `value` cannot be serialized, or the
/// backend's error if it cannot be persisted.
pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Serialize {
        key: key.to_string(),
        source,
    })?;
    store.set(key, raw)
}

/// Removes keys whose value is the literal `undefined`, or which look like
/// JSON (start with `{` or `[`) but fail to parse. Keys in `keep` are left
/// untouched. Returns the removed keys.
///
/// # Errors
///
/// Returns the backend's error if a removal cannot be persisted.
pub fn sanitize(store: &dyn KeyValueStore, keep: &[&str]) -> Result<Vec<String>, StoreError> {
    let mut removed = Vec::new();
    for key in store.keys() {
        if keep.contains(&key.as_str()) {
            continue;
        }
        let Some(raw) = store.get(&key) else {
            continue;
        };
        let trimmed = raw.trim();
        let looks_like_json = trimmed.starts_with('{') || trimmed.starts_with('[');
        let corrupt = raw == "undefined"
            || (looks_like_json && serde_json::from_str::<serde_json::Value>(trimmed).is_err());
        if corrupt {
            store.remove(&key)?;
            tracing::info!(key, "removed corrupt persisted value");
            removed.push(key);
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;

    #[test]
    fn absent_key_yields_fallback() {
        let store = MemoryStore::new();
        let value: Vec<String> = get_json(&store, "search_history", vec!["x".to_string()]);
        assert_eq!(value, vec!["x".to_string()]);
    }

    #[test]
    fn literal_undefined_yields_fallback() {
        let store = MemoryStore::with_entries([("search_history", "undefined")]);
        let value: Vec<String> = get_json(&store, "search_history", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn unparseable_value_yields_fallback() {
        let store = MemoryStore::with_entries([("favorites", "[1, 2")]);
        let value: Vec<i64> = get_json(&store, "favorites", Vec::new());
        assert!(value.is_empty());
    }

    #[test]
    fn wrong_type_yields_fallback() {
        let store = MemoryStore::with_entries([("favorites", r#"{"a":1}"#)]);
        let value: Vec<i64> = get_json(&store, "favorites", vec![9]);
        assert_eq!(value, vec![9]);
    }

    #[test]
    fn corrupt_key_does_not_affect_other_keys() {
        let store = MemoryStore::with_entries([("favorites", "garbage"), ("search_history", r#"["a"]"#)]);
        let favorites: Vec<i64> = get_json(&store, "favorites", Vec::new());
        let history: Vec<String> = get_json(&store, "search_history", Vec::new());
        assert!(favorites.is_empty());
        assert_eq!(history, vec!["a".to_string()]);
    }

    #[test]
    fn set_then_get_returns_value() {
        let store = MemoryStore::new();
        set_json(&store, "favorites", &[3_i64, 1]).unwrap();
        assert_eq!(store.get("favorites").as_deref(), Some("[3,1]"));
        let value: Vec<i64> = get_json(&store, "favorites", Vec::new());
        assert_eq!(value, vec![3, 1]);
    }

    #[test]
    fn sanitize_removes_undefined_and_broken_json_only() {
        let store = MemoryStore::with_entries([
            ("a", "undefined"),
            ("b", "[1,"),
            ("c", r#"{"ok":true}"#),
            ("d", "plain text"),
            ("token", "undefined"),
        ]);
        let removed = sanitize(&store, &["token"]).unwrap();
        assert_eq!(removed, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.keys(), vec!["c", "d", "token"]);
    }
}
