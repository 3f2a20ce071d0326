//! Domain data types
//!
//! Wire-compatible models for the salon booking backend plus the derived,
//! client-only values (bookable slots, pending reservation snapshots).

pub mod availability;
pub mod catalog;
pub mod notification;
pub mod reservation;
pub mod session;
pub mod user;

pub use availability::{AvailabilityWindow, BookableSlot};
pub use catalog::{Service, ServiceSelection};
pub use notification::{AnalyticsSummary, Notification, StylistApplication};
pub use reservation::{
    NewReservation, PaymentDetails, PaymentMethod, PendingReservation, Reservation,
    ReservationPatch, ReservationStatus,
};
pub use session::TokenSet;
pub use user::{User, UserRole};
