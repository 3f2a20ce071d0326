//! Stylist availability windows and derived bookable slots
//!
//! Availability windows are owned by the backend; the client holds a
//! read-only, request-scoped copy fetched per (stylist, date) pair. A
//! `BookableSlot` is a derived value with no identity beyond its time.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::{Result, SalonError};

/// Serde helper for minute-resolution wall-clock times (`HH:MM`).
///
/// The backend sends times without a seconds component, which chrono's
/// default `NaiveTime` serde format does not accept.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// One interval during which a stylist can be booked on a given calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityWindow {
    /// The window's day; time-of-day components are ignored for this field
    pub day: NaiveDate,

    /// Window opening time, minute resolution
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,

    /// Window closing time; must be strictly after `start_time`
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
}

impl AvailabilityWindow {
    /// Create a validated window
    ///
    /// # Errors
    /// Returns `SalonError::Validation` if `end_time <= start_time`.
    pub fn new(day: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Result<Self> {
        let window = Self { day, start_time, end_time };
        window.validate()?;
        Ok(window)
    }

    /// Reject malformed windows before any slicing happens
    ///
    /// # Errors
    /// Returns `SalonError::Validation` if `end_time <= start_time`, which
    /// would otherwise produce negative-length iteration downstream.
    pub fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(SalonError::Validation(format!(
                "availability window ends at or before it starts ({} >= {})",
                self.start_time.format("%H:%M"),
                self.end_time.format("%H:%M"),
            )));
        }
        Ok(())
    }
}

/// A candidate appointment start time on the selected day
///
/// Derived and ephemeral: recomputed on every relevant input change,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookableSlot(#[serde(with = "hhmm")] pub NaiveTime);

impl BookableSlot {
    /// The slot's start time
    #[must_use]
    pub fn time(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for BookableSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl From<NaiveTime> for BookableSlot {
    fn from(time: NaiveTime) -> Self {
        Self(time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn valid_window_passes_validation() {
        let window = AvailabilityWindow::new(d(), t(9, 0), t(17, 0));
        assert!(window.is_ok());
    }

    #[test]
    fn inverted_window_is_rejected() {
        let result = AvailabilityWindow::new(d(), t(17, 0), t(9, 0));
        assert!(matches!(result, Err(SalonError::Validation(_))));
    }

    #[test]
    fn zero_length_window_is_rejected() {
        let result = AvailabilityWindow::new(d(), t(9, 0), t(9, 0));
        assert!(matches!(result, Err(SalonError::Validation(_))));
    }

    #[test]
    fn window_round_trips_with_hhmm_times() {
        let window = AvailabilityWindow::new(d(), t(9, 0), t(12, 30)).unwrap();
        let json = serde_json::to_string(&window).unwrap();
        assert!(json.contains("\"startTime\":\"09:00\""));
        assert!(json.contains("\"endTime\":\"12:30\""));

        let parsed: AvailabilityWindow = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, window);
    }

    #[test]
    fn window_accepts_seconds_in_wire_times() {
        let json = r#"{"day":"2025-06-02","startTime":"09:00:00","endTime":"10:30:00"}"#;
        let parsed: AvailabilityWindow = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.start_time, t(9, 0));
        assert_eq!(parsed.end_time, t(10, 30));
    }

    #[test]
    fn slot_displays_as_wall_clock() {
        let slot = BookableSlot::from(t(9, 15));
        assert_eq!(slot.to_string(), "09:15");
    }
}
