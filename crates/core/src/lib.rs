//! # Salonkit Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The slot calculator (availability windows -> bookable start times)
//! - The booking wizard state machine
//! - The payment-then-reservation saga
//! - Availability fetching with last-request-wins sequencing
//!
//! ## Architecture Principles
//! - Only depends on `salonkit-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod availability;
pub mod booking;
pub mod scheduling;

// Re-export specific items to avoid ambiguity
pub use availability::ports::AvailabilityProvider;
pub use availability::AvailabilityService;
pub use booking::ports::{PaymentGateway, ReservationGateway};
pub use booking::saga::{BookingError, BookingOutcome, BookingRequest, BookingSaga};
pub use booking::wizard::{BookingWizard, WizardStep};
pub use scheduling::compute_slots;
