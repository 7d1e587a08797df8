use std::fmt;
use std::future::Future;

use carefind_core::{DayStatus, Weekday};
use carefind_store::{MemoryStore, FAVORITES_KEY, SEARCH_HISTORY_KEY};

use super::*;

#[derive(Debug)]
struct Never;

impl fmt::Display for Never {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("never fails")
    }
}

impl std::error::Error for Never {}

struct StaticSource(Vec<Facility>);

impl FacilitySource for StaticSource {
    type Error = Never;

    fn fetch_facilities(&self) -> impl Future<Output = Result<Vec<Facility>, Self::Error>> + Send {
        let facilities = self.0.clone();
        async move { Ok(facilities) }
    }
}

fn facilities() -> Vec<Facility> {
    let mut sakura = Facility::new(1, "さくらデイサービス", "東京都世田谷区", "デイサービス");
    sakura.availability.set(Weekday::Mon, DayStatus::Open);
    sakura.availability.set(Weekday::Sat, DayStatus::Limited);
    let mut aoba = Facility::new(2, "あおば訪問看護", "神奈川県横浜市", "訪問看護");
    aoba.availability.set(Weekday::Mon, DayStatus::Open);
    let mut himawari = Facility::new(3, "ひまわりデイ", "東京都練馬区", "デイサービス");
    himawari.availability.set(Weekday::Sat, DayStatus::Closed);
    vec![sakura, aoba, himawari]
}

async fn session_with(store: Arc<MemoryStore>) -> BrowseSession<StaticSource> {
    let session = BrowseSession::new(FacilityCatalog::new(StaticSource(facilities())), store);
    session.load().await;
    session
}

fn ids(facilities: &[Facility]) -> Vec<i64> {
    facilities.iter().map(|f| f.id).collect()
}

#[tokio::test]
async fn fresh_session_shows_everything() {
    let session = session_with(Arc::new(MemoryStore::new())).await;
    assert_eq!(session.filter(), &FilterState::default());
    assert_eq!(ids(&session.results()), vec![1, 2, 3]);
}

#[tokio::test]
async fn submit_search_filters_and_records_history() {
    let store = Arc::new(MemoryStore::new());
    let mut session = session_with(store.clone()).await;

    let history = session.submit_search("デイ");
    assert_eq!(history, vec!["デイ"]);
    assert_eq!(ids(&session.results()), vec![1, 3]);
    assert_eq!(store.get(SEARCH_HISTORY_KEY).as_deref(), Some(r#"["デイ"]"#));
}

#[tokio::test]
async fn dimension_setters_combine_with_and() {
    let mut session = session_with(Arc::new(MemoryStore::new())).await;
    session.set_location("東京都");
    assert_eq!(ids(&session.results()), vec![1, 3]);
    session.set_weekday(Weekday::Sat);
    assert_eq!(ids(&session.results()), vec![1]);
    session.set_service("訪問看護");
    assert!(session.results().is_empty());

    session.set_service("all");
    session.set_location("all");
    session.set_weekday("all");
    session.set_city_query("横浜");
    assert_eq!(ids(&session.results()), vec![2]);
}

#[tokio::test]
async fn applying_history_entry_does_not_reorder_history() {
    let mut session = session_with(Arc::new(MemoryStore::new())).await;
    session.submit_search("さくら");
    session.submit_search("あおば");
    session.apply_history_entry("さくら");
    assert_eq!(session.filter().search_query, "さくら");
    assert_eq!(session.history(), vec!["あおば", "さくら"]);
    assert_eq!(ids(&session.results()), vec![1]);
}

#[tokio::test]
async fn saved_search_captures_matching_ids_and_restores_filter() {
    let mut session = session_with(Arc::new(MemoryStore::new())).await;
    session.set_weekday(Weekday::Mon);
    session.submit_search("デイ");
    let saved = session.save_current_search();
    assert_eq!(saved.name, "検索: デイ");
    assert_eq!(saved.facility_ids, vec![1]);

    session.set_filter(FilterState::default());
    let applied = session.apply_saved_search_by_id(&saved.id).expect("saved entry exists");
    assert_eq!(applied.id, saved.id);
    assert_eq!(session.filter().selected_weekday, WeekdayFilter::Day(Weekday::Mon));
    assert_eq!(ids(&session.results()), vec![1]);
}

#[tokio::test]
async fn applying_unknown_saved_search_leaves_filter_unchanged() {
    let mut session = session_with(Arc::new(MemoryStore::new())).await;
    session.set_city_query("練馬");
    assert!(session.apply_saved_search_by_id("nope123").is_none());
    assert_eq!(session.filter().city_query, "練馬");
}

#[tokio::test]
async fn delete_saved_search_removes_it() {
    let session = session_with(Arc::new(MemoryStore::new())).await;
    let saved = session.save_current_search();
    assert!(session.delete_saved_search(&saved.id));
    assert!(session.saved_searches().is_empty());
    assert!(!session.delete_saved_search(&saved.id));
}

#[tokio::test]
async fn favorites_toggle_and_resolve_against_catalog() {
    let store = Arc::new(MemoryStore::new());
    let mut session = session_with(store.clone()).await;
    session.toggle_favorite(3);
    session.toggle_favorite(99);
    session.toggle_favorite(1);

    assert!(session.is_favorite(3));
    assert!(!session.is_favorite(2));
    assert_eq!(store.get(FAVORITES_KEY).as_deref(), Some("[3,99,1]"));
    // 99 is not in the catalog; results follow fetch order.
    assert_eq!(ids(&session.favorite_facilities()), vec![1, 3]);
}

#[tokio::test]
async fn favorites_are_read_from_store_at_start() {
    let store = Arc::new(MemoryStore::with_entries([(FAVORITES_KEY, "[2]")]));
    let session = session_with(store).await;
    assert_eq!(session.favorite_ids(), &[2]);
    assert_eq!(ids(&session.favorite_facilities()), vec![2]);
}

#[tokio::test]
async fn clear_history_empties_it() {
    let mut session = session_with(Arc::new(MemoryStore::new())).await;
    session.submit_search("さくら");
    session.clear_history();
    assert!(session.history().is_empty());
    assert_eq!(session.filter().search_query, "さくら");
}
