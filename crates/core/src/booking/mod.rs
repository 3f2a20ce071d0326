//! Booking flow: wizard state machine and the payment-then-reservation saga

pub mod ports;
pub mod saga;
pub mod wizard;

pub use ports::{PaymentGateway, ReservationGateway};
pub use saga::{BookingError, BookingOutcome, BookingRequest, BookingSaga};
pub use wizard::{BookingWizard, WizardStep};
