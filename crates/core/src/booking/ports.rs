//! Port interfaces for the booking flow
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use async_trait::async_trait;
use salonkit_domain::{NewReservation, Reservation, Result};

/// Trait for third-party payment capture
///
/// The client only triggers order creation and capture; settlement is the
/// payment provider's responsibility.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment order for the given amount
    ///
    /// Returns the provider order id.
    async fn create_order(&self, amount: f64) -> Result<String>;

    /// Capture a previously created order
    ///
    /// Returns the provider payment id.
    async fn capture_order(&self, order_id: &str) -> Result<String>;
}

/// Trait for reservation persistence via the backend
///
/// The backend is the sole authority on booking conflicts; a race between
/// two customers holding the same candidate slot is resolved here, not
/// client-side.
#[async_trait]
pub trait ReservationGateway: Send + Sync {
    /// Create a reservation
    async fn create_reservation(&self, request: &NewReservation) -> Result<Reservation>;
}
