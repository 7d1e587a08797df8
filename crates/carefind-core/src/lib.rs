pub mod app_config;
pub mod config;
pub mod facility;
pub mod filter;
pub mod vocab;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use facility::{Availability, DayStatus, Facility, Weekday};
pub use filter::{filter_facilities, FilterState, LocationFilter, ServiceFilter, WeekdayFilter};
pub use vocab::{service_label, ServiceOption, PREFECTURES, SERVICE_OPTIONS};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid weekday code: {0}")]
    InvalidWeekday(String),
}
