//! Reservation wire types and the pending-reservation snapshot
//!
//! Reservations are backend-owned entities: the client constructs the
//! creation request but never assigns identity or enforces uniqueness.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::availability::hhmm;
use super::catalog::Service;

/// How the appointment was paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Paypal,
    OnSite,
}

/// Payment capture references forwarded to the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    #[serde(rename = "paymentMethod")]
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal_order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paypal_payment_id: Option<String>,
}

/// Backend lifecycle state of a reservation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

/// A confirmed, backend-persisted appointment booking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(rename = "_id")]
    pub id: String,
    pub service_ids: Vec<String>,
    #[serde(rename = "coiffeuseId")]
    pub stylist_id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    pub status: ReservationStatus,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
}

/// Creation request for `POST /reservations`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReservation {
    pub service_ids: Vec<String>,
    #[serde(rename = "coiffeuseId")]
    pub stylist_id: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(flatten)]
    pub payment: PaymentDetails,
    pub total_amount: f64,
}

/// Partial update for `PATCH /reservations/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(with = "hhmm_opt", skip_serializing_if = "Option::is_none", default)]
    pub start_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_ids: Option<Vec<String>>,
}

/// Serde helper for optional `HH:MM` times
mod hhmm_opt {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(s) => NaiveTime::parse_from_str(&s, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

/// Serializable snapshot of an in-progress booking
///
/// Persisted by the caller across a forced login/registration detour so the
/// wizard can resume where the customer left off.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingReservation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<Service>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylist_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(with = "hhmm_opt", skip_serializing_if = "Option::is_none", default)]
    pub start_time: Option<NaiveTime>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn new_reservation_serializes_backend_field_names() {
        let request = NewReservation {
            service_ids: vec!["svc1".to_string()],
            stylist_id: "sty1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start_time: t(9, 30),
            payment: PaymentDetails {
                method: PaymentMethod::Paypal,
                paypal_order_id: Some("ORDER-1".to_string()),
                paypal_payment_id: Some("PAY-1".to_string()),
            },
            total_amount: 45.0,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["coiffeuseId"], "sty1");
        assert_eq!(json["startTime"], "09:30");
        assert_eq!(json["paymentMethod"], "paypal");
        assert_eq!(json["paypalOrderId"], "ORDER-1");
        assert_eq!(json["totalAmount"], 45.0);
    }

    #[test]
    fn patch_omits_unset_fields() {
        let patch = ReservationPatch { start_time: Some(t(11, 0)), ..Default::default() };
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json["startTime"], "11:00");
        assert!(json.get("date").is_none());
        assert!(json.get("serviceIds").is_none());
    }

    #[test]
    fn pending_reservation_round_trips() {
        let pending = PendingReservation {
            stylist_id: Some("sty1".to_string()),
            date: Some(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()),
            start_time: Some(t(10, 15)),
            ..Default::default()
        };

        let json = serde_json::to_string(&pending).unwrap();
        let parsed: PendingReservation = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pending);
    }
}
