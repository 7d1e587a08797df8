//! The `browse` command: load the catalog, apply filters, print matches.

use carefind_browse::{BrowseSession, FacilitySource};
use carefind_core::{service_label, Weekday};
use clap::Args;

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Free-text query over name and description; recorded in the search
    /// history
    #[arg(long, short)]
    pub query: Option<String>,

    /// Service type, by key (e.g. home_nursing) or exact label
    #[arg(long)]
    pub service: Option<String>,

    /// Prefecture that must appear in the location (e.g. 東京都)
    #[arg(long)]
    pub prefecture: Option<String>,

    /// City or ward name, matched case-insensitively within the location
    #[arg(long)]
    pub city: Option<String>,

    /// Only facilities open or limited on this day (mon..sun)
    #[arg(long)]
    pub weekday: Option<Weekday>,

    /// Save the resulting criteria as a named search
    #[arg(long)]
    pub save: bool,

    /// Only show favorited facilities
    #[arg(long)]
    pub favorites_only: bool,
}

/// Resolve a service option key to its label; anything else is taken as a
/// literal label.
pub(crate) fn resolve_service(input: &str) -> String {
    service_label(input).unwrap_or(input).to_string()
}

/// Apply the command-line filters to the session, in the order a user would
/// set them.
pub(crate) fn apply_args<S: FacilitySource>(session: &mut BrowseSession<S>, args: &BrowseArgs) {
    if let Some(service) = args.service.as_deref() {
        session.set_service(resolve_service(service).as_str());
    }
    if let Some(prefecture) = args.prefecture.as_deref() {
        session.set_location(prefecture);
    }
    if let Some(city) = args.city.as_deref() {
        session.set_city_query(city);
    }
    if let Some(day) = args.weekday {
        session.set_weekday(day);
    }
    if let Some(query) = args.query.as_deref() {
        session.submit_search(query);
    }
}

pub(crate) async fn run_browse<S: FacilitySource>(
    session: &mut BrowseSession<S>,
    args: &BrowseArgs,
) {
    session.load().await;
    apply_args(session, args);

    let results = session.results();
    if args.favorites_only {
        crate::print_facilities(
            results.iter().filter(|f| session.is_favorite(f.id)),
            |id| session.is_favorite(id),
        );
    } else {
        crate::print_facilities(results.iter(), |id| session.is_favorite(id));
    }

    if args.save {
        let saved = session.save_current_search();
        println!(
            "saved \"{}\" as {} ({} facilities)",
            saved.name,
            saved.id,
            saved.facility_ids.len()
        );
    }
}
