//! Core port implementations backed by the REST API

use async_trait::async_trait;
use chrono::NaiveDate;
use salonkit_core::{AvailabilityProvider, ReservationGateway};
use salonkit_domain::{AvailabilityWindow, NewReservation, Reservation, Result};

use super::salon::SalonApi;

#[async_trait]
impl AvailabilityProvider for SalonApi {
    async fn fetch_windows(
        &self,
        stylist_id: &str,
        day: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>> {
        self.stylist_availability(stylist_id, day).await
    }
}

#[async_trait]
impl ReservationGateway for SalonApi {
    async fn create_reservation(&self, request: &NewReservation) -> Result<Reservation> {
        SalonApi::create_reservation(self, request).await
    }
}
