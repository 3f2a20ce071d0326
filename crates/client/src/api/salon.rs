//! Typed surface over the salon backend endpoints
//!
//! Route shapes follow the backend as deployed; the stylist routes keep the
//! backend's French path segments (`coiffeuses`, `disponibilites`).

use std::sync::Arc;

use chrono::NaiveDate;
use salonkit_domain::{
    AnalyticsSummary, AvailabilityWindow, NewReservation, Notification, Reservation,
    ReservationPatch, Result, Service, StylistApplication, User,
};
use tracing::{info, instrument};

use super::auth::{AuthApi, AuthResponse, LoginRequest, RegisterRequest};
use super::client::ApiClient;
use crate::session::SessionManager;

/// High-level client for the salon platform
///
/// Combines the unauthenticated auth endpoints, the bearer-token request
/// engine, and the shared session into one facade.
pub struct SalonApi {
    client: Arc<ApiClient>,
    auth: Arc<AuthApi>,
    session: Arc<SessionManager>,
}

impl SalonApi {
    /// Assemble the facade from its parts
    pub fn new(client: Arc<ApiClient>, auth: Arc<AuthApi>, session: Arc<SessionManager>) -> Self {
        Self { client, auth, session }
    }

    /// Authenticate and store the returned token pair in the session
    ///
    /// Returns the user profile when the backend includes one.
    ///
    /// # Errors
    /// Returns `SalonError::Auth` on rejected credentials.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<Option<User>> {
        let response = self.auth.login(request).await?;
        self.establish_session(response).await
    }

    /// Create an account and store the returned token pair in the session
    ///
    /// # Errors
    /// Returns `SalonError::Conflict` when the email is already registered.
    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<Option<User>> {
        let response = self.auth.register(request).await?;
        self.establish_session(response).await
    }

    /// Clear the stored session
    ///
    /// # Errors
    /// Returns error if the token store cannot be cleared.
    pub async fn logout(&self) -> Result<()> {
        self.session.logout().await
    }

    /// Whether a session is currently held
    pub async fn is_authenticated(&self) -> bool {
        self.session.is_authenticated().await
    }

    /// List the service catalog
    ///
    /// # Errors
    /// Returns error on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.client.get("/services").await?)
    }

    /// List bookable stylists
    ///
    /// The backend endpoint returns user records; non-stylist roles are
    /// filtered out here.
    ///
    /// # Errors
    /// Returns error on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn list_stylists(&self) -> Result<Vec<User>> {
        let users: Vec<User> = self.client.get("/coiffeuses").await?;
        Ok(users.into_iter().filter(User::is_stylist).collect())
    }

    /// Fetch a stylist's availability windows for one day
    ///
    /// # Errors
    /// Returns error on transport or backend failure.
    #[instrument(skip(self), fields(stylist_id = %stylist_id, date = %date))]
    pub async fn stylist_availability(
        &self,
        stylist_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>> {
        let path = format!(
            "/disponibilites/coiffeuse/{stylist_id}?date={}",
            date.format("%Y-%m-%d")
        );
        Ok(self.client.get(&path).await?)
    }

    /// Create a reservation
    ///
    /// # Errors
    /// Returns `SalonError::Conflict` when the slot was taken by another
    /// booking between display and submission.
    #[instrument(skip(self, request), fields(stylist_id = %request.stylist_id, date = %request.date))]
    pub async fn create_reservation(&self, request: &NewReservation) -> Result<Reservation> {
        let reservation: Reservation = self.client.post("/reservations", request).await?;
        info!(reservation_id = %reservation.id, "Reservation created");
        Ok(reservation)
    }

    /// Partially update an existing reservation
    ///
    /// # Errors
    /// Returns `SalonError::Conflict` when the new slot is taken.
    #[instrument(skip(self, patch), fields(reservation_id = %reservation_id))]
    pub async fn update_reservation(
        &self,
        reservation_id: &str,
        patch: &ReservationPatch,
    ) -> Result<Reservation> {
        let path = format!("/reservations/{reservation_id}");
        Ok(self.client.patch(&path, patch).await?)
    }

    /// List the authenticated user's reservations
    ///
    /// # Errors
    /// Returns error on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn list_my_reservations(&self) -> Result<Vec<Reservation>> {
        Ok(self.client.get("/reservations/me").await?)
    }

    /// Cancel a reservation
    ///
    /// # Errors
    /// Returns `SalonError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(reservation_id = %reservation_id))]
    pub async fn cancel_reservation(&self, reservation_id: &str) -> Result<()> {
        let path = format!("/reservations/{reservation_id}");
        self.client.delete::<()>(&path).await?;
        info!(reservation_id = %reservation_id, "Reservation cancelled");
        Ok(())
    }

    /// List the authenticated user's notification feed
    ///
    /// # Errors
    /// Returns error on transport or backend failure.
    #[instrument(skip(self))]
    pub async fn list_notifications(&self) -> Result<Vec<Notification>> {
        Ok(self.client.get("/notifications").await?)
    }

    /// Mark one notification as read
    ///
    /// # Errors
    /// Returns `SalonError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(notification_id = %notification_id))]
    pub async fn mark_notification_read(&self, notification_id: &str) -> Result<Notification> {
        let path = format!("/notifications/{notification_id}/read");
        Ok(self.client.patch(&path, &serde_json::json!({})).await?)
    }

    /// Submit a stylist application
    ///
    /// # Errors
    /// Returns error on transport or backend failure.
    #[instrument(skip_all, fields(email = %application.email))]
    pub async fn submit_stylist_application(
        &self,
        application: &StylistApplication,
    ) -> Result<()> {
        self.client.post::<_, ()>("/stylist-applications", application).await?;
        info!("Stylist application submitted");
        Ok(())
    }

    /// Fetch the admin analytics summary
    ///
    /// # Errors
    /// Returns `SalonError::Auth` for non-admin callers.
    #[instrument(skip(self))]
    pub async fn analytics_summary(&self) -> Result<AnalyticsSummary> {
        Ok(self.client.get("/analytics/summary").await?)
    }

    /// Check backend reachability
    ///
    /// # Errors
    /// Returns error only on transport failure.
    pub async fn health_check(&self) -> Result<bool> {
        Ok(self.client.health_check().await?)
    }

    async fn establish_session(&self, response: AuthResponse) -> Result<Option<User>> {
        let user = response.user.clone();
        self.session.store_tokens(response.into_token_set()).await?;
        Ok(user)
    }
}
