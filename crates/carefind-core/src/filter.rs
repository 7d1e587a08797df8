//! Browse filter state and the selector that derives the visible facilities.
//!
//! Every dimension has one "no constraint" value: the empty string for the
//! two free-text fields and an explicit `All` variant for the three choice
//! fields. `All` serializes as `"all"` so persisted snapshots keep the same
//! JSON shape the web client always wrote.
//!
//! Decoding never fails on a field's content: a value of the wrong JSON type
//! reads as that dimension's sentinel.

use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::facility::{Facility, Weekday};

const ALL: &str = "all";

/// Service-type dimension. Matches the stored label exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum ServiceFilter {
    #[default]
    All,
    Only(String),
}

impl From<Option<String>> for ServiceFilter {
    fn from(raw: Option<String>) -> Self {
        match raw {
            Some(label) if !label.is_empty() && label != ALL => ServiceFilter::Only(label),
            _ => ServiceFilter::All,
        }
    }
}

impl From<Value> for ServiceFilter {
    fn from(raw: Value) -> Self {
        Self::from(text(raw))
    }
}

impl From<&str> for ServiceFilter {
    fn from(raw: &str) -> Self {
        Self::from(Some(raw.to_string()))
    }
}

impl From<ServiceFilter> for String {
    fn from(filter: ServiceFilter) -> Self {
        match filter {
            ServiceFilter::All => ALL.to_string(),
            ServiceFilter::Only(label) => label,
        }
    }
}

/// Prefecture dimension. Matches when the address contains the label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum LocationFilter {
    #[default]
    All,
    Prefecture(String),
}

impl From<Option<String>> for LocationFilter {
    fn from(raw: Option<String>) -> Self {
        match raw {
            Some(label) if !label.is_empty() && label != ALL => LocationFilter::Prefecture(label),
            _ => LocationFilter::All,
        }
    }
}

impl From<Value> for LocationFilter {
    fn from(raw: Value) -> Self {
        Self::from(text(raw))
    }
}

impl From<&str> for LocationFilter {
    fn from(raw: &str) -> Self {
        Self::from(Some(raw.to_string()))
    }
}

impl From<LocationFilter> for String {
    fn from(filter: LocationFilter) -> Self {
        match filter {
            LocationFilter::All => ALL.to_string(),
            LocationFilter::Prefecture(label) => label,
        }
    }
}

/// Weekday dimension. Matches when the day is `open` or `limited`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Value", into = "String")]
pub enum WeekdayFilter {
    #[default]
    All,
    Day(Weekday),
}

impl From<Option<String>> for WeekdayFilter {
    /// Unrecognized codes fall back to `All`.
    fn from(raw: Option<String>) -> Self {
        raw.and_then(|code| code.parse::<Weekday>().ok())
            .map_or(WeekdayFilter::All, WeekdayFilter::Day)
    }
}

impl From<Value> for WeekdayFilter {
    fn from(raw: Value) -> Self {
        Self::from(text(raw))
    }
}

impl From<&str> for WeekdayFilter {
    fn from(raw: &str) -> Self {
        Self::from(Some(raw.to_string()))
    }
}

impl From<Weekday> for WeekdayFilter {
    fn from(day: Weekday) -> Self {
        WeekdayFilter::Day(day)
    }
}

impl From<WeekdayFilter> for String {
    fn from(filter: WeekdayFilter) -> Self {
        match filter {
            WeekdayFilter::All => ALL.to_string(),
            WeekdayFilter::Day(day) => day.code().to_string(),
        }
    }
}

/// The string inside `raw`, or `None` for any other JSON type.
fn text(raw: Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s),
        _ => None,
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// The five independent filter dimensions of a browse session.
///
/// Fields absent from a persisted snapshot deserialize to their sentinel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    #[serde(deserialize_with = "text_or_empty")]
    pub search_query: String,
    pub selected_service: ServiceFilter,
    pub selected_location: LocationFilter,
    #[serde(deserialize_with = "text_or_empty")]
    pub city_query: String,
    pub selected_weekday: WeekdayFilter,
}

impl FilterState {
    /// `true` when no dimension constrains the result.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search_query.is_empty()
            && self.selected_service == ServiceFilter::All
            && self.selected_location == LocationFilter::All
            && self.city_query.is_empty()
            && self.selected_weekday == WeekdayFilter::All
    }

    /// Case-insensitive substring of `name` or `description`.
    #[must_use]
    pub fn matches_query(&self, facility: &Facility) -> bool {
        Predicates::new(self).query(facility)
    }

    #[must_use]
    pub fn matches_service(&self, facility: &Facility) -> bool {
        Predicates::new(self).service(facility)
    }

    #[must_use]
    pub fn matches_location(&self, facility: &Facility) -> bool {
        Predicates::new(self).location(facility)
    }

    /// Case-insensitive substring of `location`.
    #[must_use]
    pub fn matches_city(&self, facility: &Facility) -> bool {
        Predicates::new(self).city(facility)
    }

    #[must_use]
    pub fn matches_weekday(&self, facility: &Facility) -> bool {
        Predicates::new(self).weekday(facility)
    }

    /// All five dimensions at once.
    #[must_use]
    pub fn matches(&self, facility: &Facility) -> bool {
        Predicates::new(self).all(facility)
    }
}

/// Filter state with its text dimensions lower-cased once per derivation.
struct Predicates<'f> {
    query: Option<String>,
    service: Option<&'f str>,
    prefecture: Option<&'f str>,
    city: Option<String>,
    weekday: Option<Weekday>,
}

impl<'f> Predicates<'f> {
    fn new(state: &'f FilterState) -> Self {
        let lowered = |text: &str| (!text.is_empty()).then(|| text.to_lowercase());
        Self {
            query: lowered(&state.search_query),
            service: match &state.selected_service {
                ServiceFilter::All => None,
                ServiceFilter::Only(label) => Some(label.as_str()),
            },
            prefecture: match &state.selected_location {
                LocationFilter::All => None,
                LocationFilter::Prefecture(label) => Some(label.as_str()),
            },
            city: lowered(&state.city_query),
            weekday: match state.selected_weekday {
                WeekdayFilter::All => None,
                WeekdayFilter::Day(day) => Some(day),
            },
        }
    }

    fn query(&self, facility: &Facility) -> bool {
        self.query.as_deref().is_none_or(|q| {
            facility.name.to_lowercase().contains(q)
                || facility.description.to_lowercase().contains(q)
        })
    }

    fn service(&self, facility: &Facility) -> bool {
        self.service.is_none_or(|label| facility.service_type == label)
    }

    fn location(&self, facility: &Facility) -> bool {
        self.prefecture.is_none_or(|label| facility.location.contains(label))
    }

    fn city(&self, facility: &Facility) -> bool {
        self.city
            .as_deref()
            .is_none_or(|q| facility.location.to_lowercase().contains(q))
    }

    fn weekday(&self, facility: &Facility) -> bool {
        self.weekday
            .is_none_or(|day| facility.availability.get(day).accepts_visits())
    }

    fn all(&self, facility: &Facility) -> bool {
        self.query(facility)
            && self.service(facility)
            && self.location(facility)
            && self.city(facility)
            && self.weekday(facility)
    }
}

/// Derives the visible subset of `facilities` for `filter`.
///
/// An unconstrained filter returns the input slice itself, borrowed. Otherwise
/// the result keeps the input order.
#[must_use]
pub fn filter_facilities<'a>(
    facilities: &'a [Facility],
    filter: &FilterState,
) -> Cow<'a, [Facility]> {
    if filter.is_unconstrained() {
        return Cow::Borrowed(facilities);
    }
    let predicates = Predicates::new(filter);
    Cow::Owned(
        facilities
            .iter()
            .filter(|facility| predicates.all(facility))
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
#[path = "filter_test.rs"]
mod tests;
