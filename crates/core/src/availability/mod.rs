//! Availability fetching with stale-response protection

pub mod ports;
pub mod service;

pub use ports::AvailabilityProvider;
pub use service::AvailabilityService;
