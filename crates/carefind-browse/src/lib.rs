//! The browse pipeline: a fetched facility catalog, the filter state applied
//! to it, and the per-browser search memory and favorites around it.

pub mod catalog;
pub mod session;
pub mod source;

pub use catalog::FacilityCatalog;
pub use session::BrowseSession;
pub use source::FacilitySource;
