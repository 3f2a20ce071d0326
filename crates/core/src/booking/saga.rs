//! Two-phase payment-then-reservation saga
//!
//! Payment capture and reservation creation are sequential steps against
//! independent authorities. The saga makes every intermediate failure an
//! explicit, distinct outcome instead of leaving a captured payment
//! silently orphaned.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use salonkit_domain::{
    NewReservation, PaymentDetails, PaymentMethod, Reservation, SalonError,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use super::ports::{PaymentGateway, ReservationGateway};

/// Everything the saga needs to confirm one booking
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub service_ids: Vec<String>,
    pub stylist_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub total_amount: f64,
}

/// A confirmed booking with its payment references
#[derive(Debug, Clone, PartialEq)]
pub struct BookingOutcome {
    pub reservation: Reservation,
    pub order_id: String,
    pub payment_id: String,
}

/// Failure modes of the booking saga
///
/// Payment failure and booking failure are deliberately separate states:
/// a payment success followed by a reservation-creation failure leaves an
/// inconsistent state that must be surfaced, never silently retried.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Payment capture failed; nothing to compensate
    #[error("payment failed: {0}")]
    PaymentFailed(SalonError),

    /// Backend rejected the reservation as conflicting; the chosen slot may
    /// no longer be valid and the customer must re-select
    #[error("slot no longer available (payment order {order_id}): {source}")]
    SlotTaken { order_id: String, source: SalonError },

    /// Payment was captured but the reservation could not be created;
    /// terminal state requiring manual follow-up
    #[error("payment captured but booking failed (order {order_id}): {source}")]
    PaymentCapturedBookingFailed { order_id: String, source: SalonError },

    /// Request was incomplete or malformed
    #[error("invalid booking request: {0}")]
    Invalid(String),
}

/// Orchestrates payment capture followed by reservation creation
pub struct BookingSaga {
    payments: Arc<dyn PaymentGateway>,
    reservations: Arc<dyn ReservationGateway>,
}

impl BookingSaga {
    /// Create a new saga over the given gateways
    pub fn new(payments: Arc<dyn PaymentGateway>, reservations: Arc<dyn ReservationGateway>) -> Self {
        Self { payments, reservations }
    }

    /// Confirm a booking: capture payment, then create the reservation
    ///
    /// # Errors
    /// - [`BookingError::PaymentFailed`] if order creation or capture fails
    /// - [`BookingError::SlotTaken`] if the backend reports a conflict
    /// - [`BookingError::PaymentCapturedBookingFailed`] for any other
    ///   reservation-creation failure after a successful capture
    #[instrument(skip(self, request), fields(stylist_id = %request.stylist_id, date = %request.date))]
    pub async fn confirm(&self, request: BookingRequest) -> Result<BookingOutcome, BookingError> {
        if request.service_ids.is_empty() {
            return Err(BookingError::Invalid("no service selected".to_string()));
        }
        if request.total_amount <= 0.0 {
            return Err(BookingError::Invalid(format!(
                "total amount must be positive, got {}",
                request.total_amount
            )));
        }

        // Phase 1: payment capture
        let order_id = self
            .payments
            .create_order(request.total_amount)
            .await
            .map_err(BookingError::PaymentFailed)?;

        let payment_id = self
            .payments
            .capture_order(&order_id)
            .await
            .map_err(BookingError::PaymentFailed)?;

        info!(order_id = %order_id, "Payment captured");

        // Phase 2: reservation creation; the backend arbitrates conflicts
        let new_reservation = NewReservation {
            service_ids: request.service_ids,
            stylist_id: request.stylist_id,
            date: request.date,
            start_time: request.start_time,
            payment: PaymentDetails {
                method: PaymentMethod::Paypal,
                paypal_order_id: Some(order_id.clone()),
                paypal_payment_id: Some(payment_id.clone()),
            },
            total_amount: request.total_amount,
        };

        match self.reservations.create_reservation(&new_reservation).await {
            Ok(reservation) => {
                info!(reservation_id = %reservation.id, "Reservation confirmed");
                Ok(BookingOutcome { reservation, order_id, payment_id })
            }
            Err(err @ SalonError::Conflict(_)) => {
                warn!(order_id = %order_id, error = %err, "Reservation conflict after capture");
                Err(BookingError::SlotTaken { order_id, source: err })
            }
            Err(err) => {
                warn!(order_id = %order_id, error = %err, "Reservation creation failed after capture");
                Err(BookingError::PaymentCapturedBookingFailed { order_id, source: err })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{NaiveDate, NaiveTime, Utc};
    use salonkit_domain::ReservationStatus;

    use super::*;

    struct StubPayments {
        fail_capture: bool,
        captures: AtomicUsize,
    }

    impl StubPayments {
        fn new(fail_capture: bool) -> Self {
            Self { fail_capture, captures: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl PaymentGateway for StubPayments {
        async fn create_order(&self, _amount: f64) -> salonkit_domain::Result<String> {
            Ok("ORDER-1".to_string())
        }

        async fn capture_order(&self, order_id: &str) -> salonkit_domain::Result<String> {
            self.captures.fetch_add(1, Ordering::SeqCst);
            if self.fail_capture {
                Err(SalonError::Payment("capture declined".to_string()))
            } else {
                Ok(format!("PAY-{order_id}"))
            }
        }
    }

    enum ReservationBehavior {
        Succeed,
        Conflict,
        ServerError,
    }

    struct StubReservations {
        behavior: ReservationBehavior,
        calls: AtomicUsize,
    }

    impl StubReservations {
        fn new(behavior: ReservationBehavior) -> Self {
            Self { behavior, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl ReservationGateway for StubReservations {
        async fn create_reservation(
            &self,
            request: &NewReservation,
        ) -> salonkit_domain::Result<Reservation> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behavior {
                ReservationBehavior::Succeed => Ok(Reservation {
                    id: "res1".to_string(),
                    service_ids: request.service_ids.clone(),
                    stylist_id: request.stylist_id.clone(),
                    date: request.date,
                    start_time: request.start_time,
                    status: ReservationStatus::Confirmed,
                    total_amount: request.total_amount,
                    created_at: Utc::now(),
                }),
                ReservationBehavior::Conflict => {
                    Err(SalonError::Conflict("slot already booked".to_string()))
                }
                ReservationBehavior::ServerError => {
                    Err(SalonError::Internal("backend unavailable".to_string()))
                }
            }
        }
    }

    fn request() -> BookingRequest {
        BookingRequest {
            service_ids: vec!["svc1".to_string()],
            stylist_id: "sty1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            total_amount: 45.0,
        }
    }

    #[tokio::test]
    async fn happy_path_returns_reservation_with_payment_refs() {
        let saga = BookingSaga::new(
            Arc::new(StubPayments::new(false)),
            Arc::new(StubReservations::new(ReservationBehavior::Succeed)),
        );

        let outcome = saga.confirm(request()).await.unwrap();
        assert_eq!(outcome.order_id, "ORDER-1");
        assert_eq!(outcome.payment_id, "PAY-ORDER-1");
        assert_eq!(outcome.reservation.status, ReservationStatus::Confirmed);
    }

    #[tokio::test]
    async fn payment_failure_never_reaches_the_backend() {
        let reservations = Arc::new(StubReservations::new(ReservationBehavior::Succeed));
        let saga = BookingSaga::new(Arc::new(StubPayments::new(true)), reservations.clone());

        let result = saga.confirm(request()).await;
        assert!(matches!(result, Err(BookingError::PaymentFailed(_))));
        assert_eq!(reservations.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn conflict_after_capture_is_slot_taken() {
        let saga = BookingSaga::new(
            Arc::new(StubPayments::new(false)),
            Arc::new(StubReservations::new(ReservationBehavior::Conflict)),
        );

        let result = saga.confirm(request()).await;
        match result {
            Err(BookingError::SlotTaken { order_id, .. }) => assert_eq!(order_id, "ORDER-1"),
            other => panic!("expected SlotTaken, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn backend_failure_after_capture_is_terminal() {
        let reservations = Arc::new(StubReservations::new(ReservationBehavior::ServerError));
        let saga = BookingSaga::new(Arc::new(StubPayments::new(false)), reservations.clone());

        let result = saga.confirm(request()).await;
        match result {
            Err(BookingError::PaymentCapturedBookingFailed { order_id, .. }) => {
                assert_eq!(order_id, "ORDER-1");
            }
            other => panic!("expected PaymentCapturedBookingFailed, got {other:?}"),
        }
        // No blind retry: exactly one creation attempt
        assert_eq!(reservations.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_selection_is_rejected_before_payment() {
        let payments = Arc::new(StubPayments::new(false));
        let saga = BookingSaga::new(
            payments.clone(),
            Arc::new(StubReservations::new(ReservationBehavior::Succeed)),
        );

        let mut req = request();
        req.service_ids.clear();
        let result = saga.confirm(req).await;
        assert!(matches!(result, Err(BookingError::Invalid(_))));
        assert_eq!(payments.captures.load(Ordering::SeqCst), 0);
    }
}
