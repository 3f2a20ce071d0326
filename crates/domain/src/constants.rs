//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Slot computation
pub const DEFAULT_SLOT_STEP_MINUTES: u32 = 15;

// Session management
pub const TOKEN_REFRESH_THRESHOLD_SECS: i64 = 300;

// HTTP defaults
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

// Realtime channel event names
pub const EVENT_NEW_NOTIFICATION: &str = "new_notification";
pub const EVENT_NOTIFICATION_UPDATED: &str = "notification_updated";
pub const EVENT_APPOINTMENT_STATUS_CHANGED: &str = "appointment_status_changed";
pub const EVENT_SYSTEM_ANNOUNCEMENT: &str = "system_announcement";
pub const EVENT_RESERVATIONS_CHANGED: &str = "reservations_changed";
