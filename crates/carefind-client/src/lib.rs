pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::FacilityClient;
pub use error::ClientError;
pub use normalize::{normalize_availability, normalize_facilities, normalize_facility};
pub use types::RawFacility;
