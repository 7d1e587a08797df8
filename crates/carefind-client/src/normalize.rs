//! Normalization from [`RawFacility`] wire rows to [`carefind_core::Facility`].
//!
//! Normalization never fails on field content: malformed optional values are
//! dropped and malformed availability days become `closed`.

use carefind_core::{Availability, DayStatus, Facility, Weekday};
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::types::RawFacility;

/// Decodes a `GET /facilities` body into canonical facilities.
///
/// A body that is not a JSON array yields an empty list. Elements that do not
/// decode as a [`RawFacility`] (for example, no integer `id`) are skipped.
#[must_use]
pub fn normalize_facilities(body: Value) -> Vec<Facility> {
    let Value::Array(items) = body else {
        tracing::warn!("facility list response is not a JSON array; treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<RawFacility>(item) {
            Ok(raw) => Some(normalize_facility(raw)),
            Err(error) => {
                tracing::debug!(index, %error, "skipping malformed facility row");
                None
            }
        })
        .collect()
}

/// Converts one wire row into a [`Facility`].
#[must_use]
pub fn normalize_facility(raw: RawFacility) -> Facility {
    let flat = [
        raw.mon_availability.as_deref(),
        raw.tue_availability.as_deref(),
        raw.wed_availability.as_deref(),
        raw.thu_availability.as_deref(),
        raw.fri_availability.as_deref(),
        raw.sat_availability.as_deref(),
        raw.sun_availability.as_deref(),
    ];
    let availability = normalize_availability(raw.availability.as_ref(), flat);

    Facility {
        id: raw.id,
        user_id: raw.user_id,
        name: raw.name.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        location: raw.location.unwrap_or_default(),
        service_type: raw.service_type.unwrap_or_default(),
        phone: non_empty(raw.phone),
        email: non_empty(raw.email),
        website: non_empty(raw.website),
        image_url: non_empty(raw.image_url),
        capacity: raw.capacity.as_ref().and_then(text_or_number),
        operating_hours: non_empty(raw.operating_hours),
        staff_count: raw.staff_count.as_ref().and_then(text_or_number),
        services: raw.services.as_ref().map(string_list).unwrap_or_default(),
        rating: raw.rating.as_ref().and_then(parse_rating),
        reviews: raw.reviews.as_ref().and_then(parse_count),
        availability,
        created_at: raw.created_at.as_deref().and_then(parse_timestamp),
        updated_at: raw.updated_at.as_deref().and_then(parse_timestamp),
    }
}

/// Builds a full seven-day [`Availability`].
///
/// For each day the nested object's value wins over the flat column. A nested
/// value that is not a string, a non-object `nested`, or a missing day all
/// leave that day `closed`.
#[must_use]
pub fn normalize_availability(nested: Option<&Value>, flat: [Option<&str>; 7]) -> Availability {
    let nested = nested.and_then(Value::as_object);
    let mut availability = Availability::default();

    for (day, column) in Weekday::ALL.into_iter().zip(flat) {
        let raw = nested
            .and_then(|map| map.get(day.code()))
            .and_then(Value::as_str)
            .or(column);
        availability.set(day, raw.map_or(DayStatus::Closed, DayStatus::from_raw));
    }

    availability
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn text_or_number(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn parse_rating(value: &Value) -> Option<f64> {
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    rating.is_finite().then_some(rating)
}

fn parse_count(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
