//! The in-memory facility collection and its derived filtered view.

use std::borrow::Cow;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use carefind_core::{filter_facilities, Facility, FilterState};

use crate::source::FacilitySource;

#[derive(Default)]
struct CatalogState {
    facilities: Arc<[Facility]>,
    /// Ticket handed to the most recently started load.
    issued: u64,
    /// Ticket of the load whose result is currently held; 0 before any.
    applied: u64,
    in_flight: usize,
}

fn lock_state(state: &Mutex<CatalogState>) -> MutexGuard<'_, CatalogState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Counts one outstanding load until dropped, including when the load future
/// is cancelled mid-fetch.
struct InFlight<'a>(&'a Mutex<CatalogState>);

impl<'a> InFlight<'a> {
    fn enter(state: &'a Mutex<CatalogState>) -> (Self, u64) {
        let mut guard = lock_state(state);
        guard.issued += 1;
        guard.in_flight += 1;
        (Self(state), guard.issued)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = lock_state(self.0);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

/// Facilities fetched from a [`FacilitySource`].
///
/// Overlapping loads are allowed. A load's result is applied only if no
/// later-started load has already applied its own, so the most recently
/// issued fetch always wins regardless of completion order.
pub struct FacilityCatalog<S> {
    source: S,
    state: Mutex<CatalogState>,
}

impl<S: FacilitySource> FacilityCatalog<S> {
    #[must_use]
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(CatalogState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, CatalogState> {
        lock_state(&self.state)
    }

    /// Fetches the full collection and replaces the held one.
    ///
    /// A failed fetch is logged and treated as an empty collection. Returns
    /// `false` when the result was discarded because a later load had already
    /// been applied. Dropping the returned future before it completes
    /// abandons the fetch and leaves the held collection unchanged.
    pub async fn load(&self) -> bool {
        let (in_flight, ticket) = InFlight::enter(&self.state);

        let facilities = match self.source.fetch_facilities().await {
            Ok(facilities) => facilities,
            Err(error) => {
                tracing::warn!(
                    ticket,
                    error = %error,
                    "facility fetch failed; showing an empty list"
                );
                Vec::new()
            }
        };

        let applied = self.apply(ticket, facilities);
        drop(in_flight);
        applied
    }

    fn apply(&self, ticket: u64, facilities: Vec<Facility>) -> bool {
        let mut state = self.state();
        if ticket <= state.applied {
            tracing::debug!(ticket, applied = state.applied, "discarding stale facility fetch");
            return false;
        }
        let count = facilities.len();
        state.facilities = facilities.into();
        state.applied = ticket;
        tracing::info!(ticket, count, "facility catalog loaded");
        true
    }

    /// `true` while at least one load is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().in_flight > 0
    }

    /// `true` once any load has completed and been applied.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.state().applied > 0
    }

    /// The full collection, in fetch order.
    #[must_use]
    pub fn facilities(&self) -> Arc<[Facility]> {
        Arc::clone(&self.state().facilities)
    }

    #[must_use]
    pub fn find(&self, facility_id: i64) -> Option<Facility> {
        self.facilities()
            .iter()
            .find(|facility| facility.id == facility_id)
            .cloned()
    }

    /// The facilities matching `filter`, in fetch order.
    ///
    /// An unconstrained filter returns the held collection itself.
    #[must_use]
    pub fn filtered_view(&self, filter: &FilterState) -> Arc<[Facility]> {
        let all = self.facilities();
        let narrowed = match filter_facilities(&all, filter) {
            Cow::Borrowed(_) => None,
            Cow::Owned(matching) => Some(matching),
        };
        narrowed.map_or(all, Arc::from)
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
