//! One user's browse session: filter state over the catalog, plus the
//! search memory and favorites persisted for that user.

use std::sync::Arc;

use carefind_core::{Facility, FilterState, LocationFilter, ServiceFilter, WeekdayFilter};
use carefind_store::{
    apply_history_entry, apply_saved_search, FavoritesStore, KeyValueStore, SavedSearch,
    SearchMemory,
};

use crate::catalog::FacilityCatalog;
use crate::source::FacilitySource;

pub struct BrowseSession<S> {
    catalog: FacilityCatalog<S>,
    filter: FilterState,
    memory: SearchMemory,
    favorites: FavoritesStore,
}

impl<S: FacilitySource> BrowseSession<S> {
    /// Starts a session with an unconstrained filter. Favorites are read from
    /// `store` once, here.
    #[must_use]
    pub fn new(catalog: FacilityCatalog<S>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            catalog,
            filter: FilterState::default(),
            memory: SearchMemory::new(Arc::clone(&store)),
            favorites: FavoritesStore::load(store),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &FacilityCatalog<S> {
        &self.catalog
    }

    #[must_use]
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    #[must_use]
    pub fn memory(&self) -> &SearchMemory {
        &self.memory
    }

    /// Loads the catalog. See [`FacilityCatalog::load`].
    pub async fn load(&self) -> bool {
        self.catalog.load().await
    }

    /// The facilities passing every active filter, in fetch order.
    #[must_use]
    pub fn results(&self) -> Arc<[Facility]> {
        self.catalog.filtered_view(&self.filter)
    }

    /// Sets the free-text query and records it in the history.
    ///
    /// Returns the updated history.
    pub fn submit_search(&mut self, query: impl Into<String>) -> Vec<String> {
        self.filter.search_query = query.into();
        self.memory.record_search(&self.filter.search_query)
    }

    pub fn set_service(&mut self, service: impl Into<ServiceFilter>) {
        self.filter.selected_service = service.into();
    }

    pub fn set_location(&mut self, location: impl Into<LocationFilter>) {
        self.filter.selected_location = location.into();
    }

    pub fn set_city_query(&mut self, city: impl Into<String>) {
        self.filter.city_query = city.into();
    }

    pub fn set_weekday(&mut self, weekday: impl Into<WeekdayFilter>) {
        self.filter.selected_weekday = weekday.into();
    }

    /// Replaces the whole filter state without touching the history.
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    /// Reuses a history entry as the query. The history itself is unchanged.
    pub fn apply_history_entry(&mut self, entry: &str) {
        apply_history_entry(&mut self.filter, entry);
    }

    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.memory.history()
    }

    pub fn clear_history(&self) {
        self.memory.clear_history();
    }

    /// Saves the current criteria together with the ids currently matching.
    pub fn save_current_search(&self) -> SavedSearch {
        let matched: Vec<i64> = self.results().iter().map(|facility| facility.id).collect();
        self.memory.save_current_search(&self.filter, matched)
    }

    #[must_use]
    pub fn saved_searches(&self) -> Vec<SavedSearch> {
        self.memory.saved_searches()
    }

    pub fn apply_saved_search(&mut self, saved: &SavedSearch) {
        apply_saved_search(&mut self.filter, saved);
    }

    /// Applies the saved search with `id`. Returns the applied entry, or
    /// `None` (leaving the filter untouched) if no such entry exists.
    pub fn apply_saved_search_by_id(&mut self, id: &str) -> Option<SavedSearch> {
        let saved = self.memory.find_saved_search(id)?;
        self.apply_saved_search(&saved);
        Some(saved)
    }

    pub fn delete_saved_search(&self, id: &str) -> bool {
        self.memory.delete_saved_search(id)
    }

    /// Flips favorite membership for `facility_id` and returns the new set.
    pub fn toggle_favorite(&mut self, facility_id: i64) -> &[i64] {
        self.favorites.toggle(facility_id)
    }

    #[must_use]
    pub fn is_favorite(&self, facility_id: i64) -> bool {
        self.favorites.is_favorite(facility_id)
    }

    #[must_use]
    pub fn favorite_ids(&self) -> &[i64] {
        self.favorites.ids()
    }

    /// Favorited facilities present in the catalog, in fetch order.
    #[must_use]
    pub fn favorite_facilities(&self) -> Vec<Facility> {
        self.catalog
            .facilities()
            .iter()
            .filter(|facility| self.favorites.is_favorite(facility.id))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
