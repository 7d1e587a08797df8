//! Wire shape of one facility as returned by `GET /facilities`.
//!
//! ## Observed shape
//!
//! The API server formats rows itself, but older deployments returned the raw
//! `facilities` row. Both shapes are accepted:
//!
//! - Field names arrive in camelCase (`serviceType`, `imageUrl`) or snake_case
//!   (`service_type`, `image_url`). `service` and `address` are legacy
//!   aliases for `serviceType` and `location`.
//! - Availability is either a nested `availability` object keyed `mon`..`sun`
//!   or flat `mon_availability`..`sun_availability` columns. Values include the
//!   symbol aliases `circle`, `triangle` and `cross`.
//! - `rating` is a Postgres `numeric`, which node-postgres serializes as a
//!   string. `capacity` and `staffCount` are free text on some rows and
//!   integers on others.
//! - Any text field may be `null`.
//! - A row carrying both spellings of one field fails as a duplicate field
//!   and is skipped by the list decoder.
//!
//! Loosely-typed fields are kept as [`serde_json::Value`] and resolved in
//! [`crate::normalize`].

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct RawFacility {
    pub id: i64,

    #[serde(default, alias = "user_id", rename = "userId")]
    pub user_id: Option<i64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default, alias = "address")]
    pub location: Option<String>,

    #[serde(default, rename = "serviceType", alias = "service_type", alias = "service")]
    pub service_type: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default, rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub capacity: Option<Value>,

    #[serde(default, rename = "operatingHours", alias = "operating_hours")]
    pub operating_hours: Option<String>,

    #[serde(default, rename = "staffCount", alias = "staff_count")]
    pub staff_count: Option<Value>,

    #[serde(default)]
    pub services: Option<Value>,

    #[serde(default)]
    pub rating: Option<Value>,

    #[serde(default)]
    pub reviews: Option<Value>,

    #[serde(default)]
    pub availability: Option<Value>,

    #[serde(default)]
    pub mon_availability: Option<String>,
    #[serde(default)]
    pub tue_availability: Option<String>,
    #[serde(default)]
    pub wed_availability: Option<String>,
    #[serde(default)]
    pub thu_availability: Option<String>,
    #[serde(default)]
    pub fri_availability: Option<String>,
    #[serde(default)]
    pub sat_availability: Option<String>,
    #[serde(default)]
    pub sun_availability: Option<String>,

    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,

    #[serde(default, rename = "updatedAt", alias = "updated_at")]
    pub updated_at: Option<String>,
}
