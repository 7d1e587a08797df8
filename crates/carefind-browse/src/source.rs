//! Port for the facility-listing collaborator.

use std::future::Future;

use carefind_client::{ClientError, FacilityClient};
use carefind_core::Facility;

/// Anything that can produce the full, normalized facility collection.
pub trait FacilitySource: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetches a complete snapshot of all facilities.
    fn fetch_facilities(&self) -> impl Future<Output = Result<Vec<Facility>, Self::Error>> + Send;
}

impl FacilitySource for FacilityClient {
    type Error = ClientError;

    fn fetch_facilities(&self) -> impl Future<Output = Result<Vec<Facility>, Self::Error>> + Send {
        self.list_facilities()
    }
}
