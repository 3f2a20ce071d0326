//! Port interface for fetching availability windows

use async_trait::async_trait;
use chrono::NaiveDate;
use salonkit_domain::{AvailabilityWindow, Result};

/// Trait for fetching a stylist's availability windows for one day
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Fetch the raw availability windows for a (stylist, day) pair
    async fn fetch_windows(
        &self,
        stylist_id: &str,
        day: NaiveDate,
    ) -> Result<Vec<AvailabilityWindow>>;
}
