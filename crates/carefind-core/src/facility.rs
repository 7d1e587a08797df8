//! Canonical facility records as consumed by the catalog.
//!
//! Records reach this shape only through the client normalization adapter,
//! so every [`Facility`] carries a fully-populated seven-day [`Availability`].

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Day-of-week code used as an availability key and a filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Mon => "mon",
            Weekday::Tue => "tue",
            Weekday::Wed => "wed",
            Weekday::Thu => "thu",
            Weekday::Fri => "fri",
            Weekday::Sat => "sat",
            Weekday::Sun => "sun",
        }
    }

    /// Single-character Japanese label shown in availability badges.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "月",
            Weekday::Tue => "火",
            Weekday::Wed => "水",
            Weekday::Thu => "木",
            Weekday::Fri => "金",
            Weekday::Sat => "土",
            Weekday::Sun => "日",
        }
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Weekday {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|day| day.code() == s)
            .ok_or_else(|| CoreError::InvalidWeekday(s.to_string()))
    }
}

/// Per-day service state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    Open,
    Limited,
    #[default]
    Closed,
}

impl DayStatus {
    /// Maps a raw server value onto a status.
    ///
    /// Accepts the canonical names and the symbol aliases used by older rows
    /// (`circle`, `triangle`, `cross`). Anything else is `Closed`.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "open" | "circle" => DayStatus::Open,
            "limited" | "triangle" => DayStatus::Limited,
            _ => DayStatus::Closed,
        }
    }

    /// `true` for `Open` and `Limited`; a weekday filter matches only these.
    #[must_use]
    pub fn accepts_visits(self) -> bool {
        matches!(self, DayStatus::Open | DayStatus::Limited)
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            DayStatus::Open => "〇",
            DayStatus::Limited => "△",
            DayStatus::Closed => "✕",
        }
    }
}

/// Weekly availability. Every day is always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    #[serde(default)]
    pub mon: DayStatus,
    #[serde(default)]
    pub tue: DayStatus,
    #[serde(default)]
    pub wed: DayStatus,
    #[serde(default)]
    pub thu: DayStatus,
    #[serde(default)]
    pub fri: DayStatus,
    #[serde(default)]
    pub sat: DayStatus,
    #[serde(default)]
    pub sun: DayStatus,
}

impl Availability {
    #[must_use]
    pub fn get(&self, day: Weekday) -> DayStatus {
        match day {
            Weekday::Mon => self.mon,
            Weekday::Tue => self.tue,
            Weekday::Wed => self.wed,
            Weekday::Thu => self.thu,
            Weekday::Fri => self.fri,
            Weekday::Sat => self.sat,
            Weekday::Sun => self.sun,
        }
    }

    pub fn set(&mut self, day: Weekday, status: DayStatus) {
        let slot = match day {
            Weekday::Mon => &mut self.mon,
            Weekday::Tue => &mut self.tue,
            Weekday::Wed => &mut self.wed,
            Weekday::Thu => &mut self.thu,
            Weekday::Fri => &mut self.fri,
            Weekday::Sat => &mut self.sat,
            Weekday::Sun => &mut self.sun,
        };
        *slot = status;
    }

    /// Days in `mon..sun` order paired with their status.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, DayStatus)> + '_ {
        Weekday::ALL.into_iter().map(move |day| (day, self.get(day)))
    }

    /// Badge row such as `〇〇△✕✕〇✕`.
    #[must_use]
    pub fn badges(&self) -> String {
        self.iter().map(|(_, status)| status.symbol()).collect()
    }
}

/// A care-service provider listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    pub description: String,
    /// Free-text address; prefecture and city filters match substrings of it.
    pub location: String,
    pub service_type: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub image_url: Option<String>,
    pub capacity: Option<String>,
    pub operating_hours: Option<String>,
    pub staff_count: Option<String>,
    #[serde(default)]
    pub services: Vec<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    #[serde(default)]
    pub availability: Availability,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Facility {
    /// A facility with only identity and descriptive fields set.
    #[must_use]
    pub fn new(
        id: i64,
        name: impl Into<String>,
        location: impl Into<String>,
        service_type: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id: None,
            name: name.into(),
            description: String::new(),
            location: location.into(),
            service_type: service_type.into(),
            phone: None,
            email: None,
            website: None,
            image_url: None,
            capacity: None,
            operating_hours: None,
            staff_count: None,
            services: Vec::new(),
            rating: None,
            reviews: None,
            availability: Availability::default(),
            created_at: None,
            updated_at: None,
        }
    }
}
