//! Recent-search history and named saved searches.
//!
//! Both collections live only in the [`KeyValueStore`]; every operation
//! re-reads the persisted value, so a clear or delete is visible to every
//! reader immediately. Read-modify-write cycles are not atomic across
//! processes sharing one store.

use std::sync::Arc;

use carefind_core::FilterState;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::json::{get_json, set_json};
use crate::kv::KeyValueStore;
use crate::{SAVED_SEARCHES_KEY, SEARCH_HISTORY_KEY};

/// Maximum number of history entries kept.
pub const HISTORY_LIMIT: usize = 10;

const SAVED_NAME_PREFIX: &str = "検索: ";
const SAVED_NAME_FALLBACK: &str = "条件検索";
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 7;

/// A named snapshot of filter criteria and the ids it matched when saved.
///
/// Only `id` is required when reading. Every other field falls back to its
/// default when absent or of the wrong JSON type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub filters: FilterState,
    /// Point-in-time cache; not re-derived when the search is applied.
    #[serde(default, deserialize_with = "integer_ids")]
    pub facility_ids: Vec<i64>,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(T::deserialize(raw).unwrap_or_default())
}

/// Keeps the integer elements of an array; anything else reads as empty.
fn integer_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().filter_map(Value::as_i64).collect(),
        _ => Vec::new(),
    })
}

/// RFC 3339 text or epoch milliseconds.
fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match Value::deserialize(deserializer)? {
        Value::String(text) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|at| at.with_timezone(&Utc)),
        Value::Number(millis) => millis.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    Ok(parsed.unwrap_or_default())
}

/// Sets the free-text query from a history entry.
///
/// This does not record history; only a fresh submit does.
pub fn apply_history_entry(filter: &mut FilterState, entry: &str) {
    filter.search_query = entry.to_string();
}

/// Restores all five filter dimensions from a saved search.
///
/// Fields missing from older snapshots were already defaulted to their
/// sentinel when the entry was read.
pub fn apply_saved_search(filter: &mut FilterState, saved: &SavedSearch) {
    *filter = saved.filters.clone();
}

fn generate_id() -> String {
    let mut rng = rand::rng();
    (0..ID_LEN)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect()
}

fn saved_search_name(query: &str) -> String {
    let label = if query.is_empty() {
        SAVED_NAME_FALLBACK
    } else {
        query
    };
    format!("{SAVED_NAME_PREFIX}{label}")
}

/// Search history and saved searches over a shared store.
#[derive(Clone)]
pub struct SearchMemory {
    store: Arc<dyn KeyValueStore>,
}

impl SearchMemory {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Persisted history, most recent first. Non-string entries are dropped.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        get_json::<Vec<Value>>(self.store.as_ref(), SEARCH_HISTORY_KEY, Vec::new())
            .into_iter()
            .filter_map(|entry| match entry {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Moves `query` to the front of the history, keeping at most
    /// [`HISTORY_LIMIT`] distinct entries. An empty query is ignored.
    ///
    /// Returns the resulting history.
    pub fn record_search(&self, query: &str) -> Vec<String> {
        if query.is_empty() {
            return self.history();
        }
        let mut next = Vec::with_capacity(HISTORY_LIMIT);
        next.push(query.to_string());
        next.extend(self.history().into_iter().filter(|entry| entry != query));
        next.truncate(HISTORY_LIMIT);
        self.persist(SEARCH_HISTORY_KEY, &next);
        next
    }

    /// Replaces the persisted history with an empty list.
    pub fn clear_history(&self) {
        self.persist::<[String]>(SEARCH_HISTORY_KEY, &[]);
    }

    /// Persisted saved searches, newest first.
    ///
    /// Entries that are not objects, or whose `id` is missing or not a
    /// string, are dropped.
    #[must_use]
    pub fn saved_searches(&self) -> Vec<SavedSearch> {
        get_json::<Vec<Value>>(self.store.as_ref(), SAVED_SEARCHES_KEY, Vec::new())
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|entry| match serde_json::from_value::<SavedSearch>(entry) {
                Ok(saved) => Some(saved),
                Err(error) => {
                    tracing::debug!(%error, "skipping malformed saved search");
                    None
                }
            })
            .collect()
    }

    #[must_use]
    pub fn find_saved_search(&self, id: &str) -> Option<SavedSearch> {
        self.saved_searches().into_iter().find(|saved| saved.id == id)
    }

    /// Prepends a new saved search built from `filters` and the ids that
    /// matched it. Saving identical criteria twice yields two entries.
    pub fn save_current_search(&self, filters: &FilterState, matched_ids: Vec<i64>) -> SavedSearch {
        let saved = SavedSearch {
            id: generate_id(),
            name: saved_search_name(&filters.search_query),
            filters: filters.clone(),
            facility_ids: matched_ids,
            created_at: Utc::now(),
        };
        let mut next = Vec::new();
        next.push(saved.clone());
        next.extend(self.saved_searches());
        self.persist(SAVED_SEARCHES_KEY, &next);
        tracing::info!(id = %saved.id, name = %saved.name, "saved search");
        saved
    }

    /// Removes the saved search with `id`. Returns `false` (and writes
    /// nothing) when no entry has that id.
    pub fn delete_saved_search(&self, id: &str) -> bool {
        let current = self.saved_searches();
        let before = current.len();
        let next: Vec<SavedSearch> = current.into_iter().filter(|saved| saved.id != id).collect();
        if next.len() == before {
            return false;
        }
        self.persist(SAVED_SEARCHES_KEY, &next);
        true
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(error) = set_json(self.store.as_ref(), key, value) {
            tracing::warn!(key, %error, "failed to persist search memory");
        }
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
