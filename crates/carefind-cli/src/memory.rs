//! Handlers for the persisted per-user state: history, saved searches and
//! favorites.

use std::sync::Arc;

use carefind_browse::{BrowseSession, FacilitySource};
use carefind_core::FilterState;
use carefind_store::{KeyValueStore, SavedSearch, SearchMemory};
use clap::Subcommand;

/// Sub-commands available under `history`.
#[derive(Debug, Subcommand)]
pub enum HistoryCommands {
    /// Show recent searches, most recent first
    List,
    /// Forget all recent searches
    Clear,
}

/// Sub-commands available under `saved`.
#[derive(Debug, Subcommand)]
pub enum SavedCommands {
    /// Show saved searches, newest first
    List,
    /// Re-run a saved search against freshly fetched facilities
    Apply {
        /// Saved search id
        id: String,
    },
    /// Delete a saved search
    Delete {
        /// Saved search id
        id: String,
    },
}

/// Sub-commands available under `favorites`.
#[derive(Debug, Subcommand)]
pub enum FavoritesCommands {
    /// Show favorited facilities present in the current listing
    List,
    /// Add or remove a facility from the favorites
    Toggle {
        /// Facility id
        id: i64,
    },
}

pub(crate) fn run_history(store: Arc<dyn KeyValueStore>, command: &HistoryCommands) {
    let memory = SearchMemory::new(store);
    match command {
        HistoryCommands::List => {
            let history = memory.history();
            if history.is_empty() {
                println!("no recent searches");
            }
            for (i, entry) in history.iter().enumerate() {
                println!("{:>2}. {entry}", i + 1);
            }
        }
        HistoryCommands::Clear => {
            memory.clear_history();
            println!("search history cleared");
        }
    }
}

/// One-line summary of the active dimensions of a filter.
pub(crate) fn describe_filters(filters: &FilterState) -> String {
    let parts: Vec<String> = [
        ("query", filters.search_query.clone()),
        ("service", String::from(filters.selected_service.clone())),
        ("prefecture", String::from(filters.selected_location.clone())),
        ("city", filters.city_query.clone()),
        ("weekday", String::from(filters.selected_weekday)),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty() && value != "all")
    .map(|(name, value)| format!("{name}={value}"))
    .collect();

    if parts.is_empty() {
        "(no filters)".to_string()
    } else {
        parts.join(" ")
    }
}

fn print_saved(saved: &[SavedSearch]) {
    if saved.is_empty() {
        println!("no saved searches; use `browse --save` to create one");
        return;
    }
    println!("{:<9}{:<18}{:<7}{:<24}FILTERS", "ID", "SAVED AT", "HITS", "NAME");
    for entry in saved {
        println!(
            "{:<9}{:<18}{:<7}{:<24}{}",
            entry.id,
            entry.created_at.format("%Y-%m-%d %H:%M"),
            entry.facility_ids.len(),
            entry.name,
            describe_filters(&entry.filters)
        );
    }
}

/// # Errors
///
/// Returns an error if `apply` names a saved search that does not exist.
pub(crate) async fn run_saved<S: FacilitySource>(
    session: &mut BrowseSession<S>,
    command: &SavedCommands,
) -> anyhow::Result<()> {
    match command {
        SavedCommands::List => print_saved(&session.saved_searches()),
        SavedCommands::Apply { id } => {
            let saved = session
                .apply_saved_search_by_id(id)
                .ok_or_else(|| anyhow::anyhow!("saved search '{id}' not found"))?;
            session.load().await;
            println!("{}: {}", saved.name, describe_filters(&saved.filters));
            let results = session.results();
            crate::print_facilities(results.iter(), |facility_id| {
                session.is_favorite(facility_id)
            });
        }
        SavedCommands::Delete { id } => {
            if session.delete_saved_search(id) {
                println!("deleted saved search {id}");
            } else {
                println!("no saved search with id {id}");
            }
        }
    }
    Ok(())
}

pub(crate) async fn run_favorites<S: FacilitySource>(
    session: &mut BrowseSession<S>,
    command: &FavoritesCommands,
) {
    match command {
        FavoritesCommands::List => {
            session.load().await;
            let favorites = session.favorite_facilities();
            crate::print_facilities(favorites.iter(), |_| true);
            let missing = session.favorite_ids().len().saturating_sub(favorites.len());
            if missing > 0 {
                println!("{missing} favorited ids are not in the current listing");
            }
        }
        FavoritesCommands::Toggle { id } => {
            session.toggle_favorite(*id);
            if session.is_favorite(*id) {
                println!("added {id} to favorites");
            } else {
                println!("removed {id} from favorites");
            }
        }
    }
}
