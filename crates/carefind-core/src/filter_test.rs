use super::*;
use crate::facility::{Availability, DayStatus};

fn facility(id: i64, name: &str, location: &str, service: &str) -> Facility {
    Facility::new(id, name, location, service)
}

fn with_day(mut f: Facility, day: Weekday, status: DayStatus) -> Facility {
    f.availability.set(day, status);
    f
}

fn sample() -> Vec<Facility> {
    let mut a = facility(1, "ひだまり訪問介護", "東京都渋谷区神宮前1-1-1", "訪問介護");
    a.description = "Home Care for seniors".to_string();
    a.availability = Availability {
        mon: DayStatus::Open,
        tue: DayStatus::Open,
        wed: DayStatus::Limited,
        ..Availability::default()
    };
    let b = with_day(
        facility(2, "さくらデイサービス", "大阪府大阪市北区梅田2-2-2", "デイサービス"),
        Weekday::Sat,
        DayStatus::Limited,
    );
    let mut c = facility(3, "Green Home", "東京都八王子市元本郷町3-3", "グループホーム");
    c.description = "認知症対応".to_string();
    vec![a, b, c]
}

fn ids(list: &[Facility]) -> Vec<i64> {
    list.iter().map(|f| f.id).collect()
}

#[test]
fn unconstrained_filter_borrows_the_input() {
    let list = sample();
    let view = filter_facilities(&list, &FilterState::default());
    assert!(matches!(view, Cow::Borrowed(_)));
    assert!(std::ptr::eq(view.as_ptr(), list.as_ptr()));
    assert_eq!(view.len(), list.len());
}

#[test]
fn default_state_is_unconstrained() {
    assert!(FilterState::default().is_unconstrained());
    let state = FilterState {
        city_query: "区".to_string(),
        ..FilterState::default()
    };
    assert!(!state.is_unconstrained());
}

#[test]
fn search_query_matches_name_or_description_case_insensitively() {
    let list = sample();
    let state = FilterState {
        search_query: "home".to_string(),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_facilities(&list, &state)), vec![1, 3]);
}

#[test]
fn search_query_with_no_match_yields_empty() {
    let list = sample();
    let state = FilterState {
        search_query: "存在しない".to_string(),
        ..FilterState::default()
    };
    assert!(filter_facilities(&list, &state).is_empty());
}

#[test]
fn empty_description_is_not_a_wildcard() {
    let list = vec![facility(9, "abc", "東京都", "x")];
    let state = FilterState {
        search_query: "zzz".to_string(),
        ..FilterState::default()
    };
    assert!(filter_facilities(&list, &state).is_empty());
}

#[test]
fn service_filter_is_exact_and_case_sensitive() {
    let list = vec![
        facility(1, "a", "東京都", "Day Service"),
        facility(2, "b", "東京都", "day service"),
        facility(3, "c", "東京都", "Day Service Plus"),
    ];
    let state = FilterState {
        selected_service: ServiceFilter::from("Day Service"),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_facilities(&list, &state)), vec![1]);
}

#[test]
fn prefecture_filter_matches_address_substring() {
    let list = vec![facility(1, "a", "東京都渋谷区神宮前1-1-1", "x")];
    let tokyo = FilterState {
        selected_location: LocationFilter::from("東京都"),
        ..FilterState::default()
    };
    let osaka = FilterState {
        selected_location: LocationFilter::from("大阪府"),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_facilities(&list, &tokyo)), vec![1]);
    assert!(filter_facilities(&list, &osaka).is_empty());
}

#[test]
fn city_query_is_case_insensitive_substring_of_location() {
    let list = vec![
        facility(1, "a", "Shibuya-ku, Tokyo", "x"),
        facility(2, "b", "Kita-ku, Osaka", "x"),
    ];
    let state = FilterState {
        city_query: "SHIBUYA".to_string(),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_facilities(&list, &state)), vec![1]);
}

#[test]
fn weekday_filter_excludes_closed_days() {
    let list = vec![
        with_day(facility(1, "a", "東京都", "x"), Weekday::Sat, DayStatus::Closed),
        with_day(facility(2, "b", "東京都", "x"), Weekday::Sat, DayStatus::Limited),
    ];
    let state = FilterState {
        selected_weekday: WeekdayFilter::Day(Weekday::Sat),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_facilities(&list, &state)), vec![2]);
}

#[test]
fn weekday_filter_accepts_open_days() {
    let list = sample();
    let state = FilterState {
        selected_weekday: WeekdayFilter::Day(Weekday::Mon),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_facilities(&list, &state)), vec![1]);
}

#[test]
fn dimensions_combine_with_logical_and() {
    let list = sample();
    let state = FilterState {
        selected_location: LocationFilter::from("東京都"),
        selected_weekday: WeekdayFilter::Day(Weekday::Wed),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_facilities(&list, &state)), vec![1]);
}

#[test]
fn every_kept_facility_matches_and_every_dropped_one_fails() {
    let list = sample();
    let states = [
        FilterState {
            search_query: "ho".to_string(),
            selected_location: LocationFilter::from("東京都"),
            ..FilterState::default()
        },
        FilterState {
            city_query: "市".to_string(),
            selected_weekday: WeekdayFilter::Day(Weekday::Sat),
            ..FilterState::default()
        },
        FilterState {
            selected_service: ServiceFilter::from("グループホーム"),
            ..FilterState::default()
        },
    ];
    for state in &states {
        let view = filter_facilities(&list, state);
        let kept = ids(&view);
        for f in &list {
            let all = state.matches_query(f)
                && state.matches_service(f)
                && state.matches_location(f)
                && state.matches_city(f)
                && state.matches_weekday(f);
            assert_eq!(kept.contains(&f.id), all, "facility {} under {state:?}", f.id);
            assert_eq!(state.matches(f), all);
        }
    }
}

#[test]
fn result_preserves_input_order() {
    let mut list = sample();
    list.reverse();
    let state = FilterState {
        selected_location: LocationFilter::from("東京都"),
        ..FilterState::default()
    };
    assert_eq!(ids(&filter_facilities(&list, &state)), vec![3, 1]);
}

#[test]
fn sentinels_serialize_as_all() {
    let json = serde_json::to_value(FilterState::default()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "searchQuery": "",
            "selectedService": "all",
            "selectedLocation": "all",
            "cityQuery": "",
            "selectedWeekday": "all"
        })
    );
}

#[test]
fn snapshot_missing_fields_default_to_sentinels() {
    let state: FilterState = serde_json::from_value(serde_json::json!({
        "searchQuery": "デイ",
        "selectedWeekday": null
    }))
    .unwrap();
    assert_eq!(state.search_query, "デイ");
    assert_eq!(state.selected_service, ServiceFilter::All);
    assert_eq!(state.selected_location, LocationFilter::All);
    assert_eq!(state.city_query, "");
    assert_eq!(state.selected_weekday, WeekdayFilter::All);
}

#[test]
fn snapshot_with_unknown_weekday_defaults_to_all() {
    let state: FilterState =
        serde_json::from_value(serde_json::json!({ "selectedWeekday": "holiday" })).unwrap();
    assert_eq!(state.selected_weekday, WeekdayFilter::All);
}

#[test]
fn snapshot_with_wrong_typed_fields_reads_as_sentinels() {
    let state: FilterState = serde_json::from_value(serde_json::json!({
        "searchQuery": ["デイ"],
        "selectedService": 7,
        "selectedLocation": true,
        "cityQuery": 3,
        "selectedWeekday": 5
    }))
    .unwrap();
    assert_eq!(state, FilterState::default());
}

#[test]
fn snapshot_keeps_valid_fields_beside_wrong_typed_ones() {
    let state: FilterState = serde_json::from_value(serde_json::json!({
        "searchQuery": "ケア",
        "selectedLocation": "大阪府",
        "selectedWeekday": { "day": "mon" }
    }))
    .unwrap();
    assert_eq!(state.search_query, "ケア");
    assert_eq!(state.selected_location, LocationFilter::from("大阪府"));
    assert_eq!(state.selected_weekday, WeekdayFilter::All);
}

#[test]
fn snapshot_restores_every_field() {
    let state = FilterState {
        search_query: "ケア".to_string(),
        selected_service: ServiceFilter::from("訪問看護"),
        selected_location: LocationFilter::from("北海道"),
        city_query: "札幌".to_string(),
        selected_weekday: WeekdayFilter::Day(Weekday::Fri),
    };
    let json = serde_json::to_string(&state).unwrap();
    let restored: FilterState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, state);
}
