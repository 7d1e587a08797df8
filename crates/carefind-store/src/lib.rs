//! Client-side persistence: a string-keyed store port plus the search memory
//! and favorites built on it.

pub mod error;
pub mod favorites;
pub mod history;
pub mod json;
pub mod kv;

pub use error::StoreError;
pub use favorites::FavoritesStore;
pub use history::{apply_history_entry, apply_saved_search, SavedSearch, SearchMemory};
pub use json::{get_json, sanitize, set_json};
pub use kv::{FileStore, KeyValueStore, MemoryStore};

/// Key holding the JSON array of favorite facility ids.
pub const FAVORITES_KEY: &str = "favorites";
/// Key holding the JSON array of recent search strings.
pub const SEARCH_HISTORY_KEY: &str = "search_history";
/// Key holding the JSON array of saved searches.
pub const SAVED_SEARCHES_KEY: &str = "saved_searches";
