//! Typed realtime events

use salonkit_domain::constants::{
    EVENT_APPOINTMENT_STATUS_CHANGED, EVENT_NEW_NOTIFICATION, EVENT_NOTIFICATION_UPDATED,
    EVENT_RESERVATIONS_CHANGED, EVENT_SYSTEM_ANNOUNCEMENT,
};
use salonkit_domain::{Notification, ReservationStatus, Result, SalonError};
use serde::Deserialize;

/// A decoded realtime event from the backend channel
#[derive(Debug, Clone, PartialEq)]
pub enum RealtimeEvent {
    /// A new notification arrived for the current user
    NewNotification(Notification),
    /// An existing notification changed (typically marked read elsewhere)
    NotificationUpdated(Notification),
    /// A reservation moved to a new lifecycle state
    AppointmentStatusChanged { reservation_id: String, status: ReservationStatus },
    /// Broadcast message for all connected clients
    SystemAnnouncement { message: String },
    /// The user's reservation list changed; callers should refetch
    ReservationsChanged,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusChangePayload {
    reservation_id: String,
    status: ReservationStatus,
}

#[derive(Debug, Deserialize)]
struct AnnouncementPayload {
    message: String,
}

impl RealtimeEvent {
    /// Decode a named channel event with its JSON payload
    ///
    /// Returns `Ok(None)` for event names this client does not know about;
    /// unknown events are the backend's prerogative and never an error.
    ///
    /// # Errors
    /// Returns `SalonError::Validation` when a known event carries a payload
    /// that does not match its schema.
    pub fn decode(event_name: &str, payload: &serde_json::Value) -> Result<Option<Self>> {
        let event = match event_name {
            EVENT_NEW_NOTIFICATION => Some(Self::NewNotification(parse(event_name, payload)?)),
            EVENT_NOTIFICATION_UPDATED => {
                Some(Self::NotificationUpdated(parse(event_name, payload)?))
            }
            EVENT_APPOINTMENT_STATUS_CHANGED => {
                let p: StatusChangePayload = parse(event_name, payload)?;
                Some(Self::AppointmentStatusChanged {
                    reservation_id: p.reservation_id,
                    status: p.status,
                })
            }
            EVENT_SYSTEM_ANNOUNCEMENT => {
                let p: AnnouncementPayload = parse(event_name, payload)?;
                Some(Self::SystemAnnouncement { message: p.message })
            }
            EVENT_RESERVATIONS_CHANGED => Some(Self::ReservationsChanged),
            _ => None,
        };
        Ok(event)
    }
}

fn parse<T: for<'de> Deserialize<'de>>(event_name: &str, payload: &serde_json::Value) -> Result<T> {
    serde_json::from_value(payload.clone()).map_err(|e| {
        SalonError::Validation(format!("malformed '{event_name}' payload: {e}"))
    })
}
