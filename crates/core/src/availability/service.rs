//! Last-request-wins availability fetching
//!
//! While a fetch is outstanding the stylist or date may change again; the
//! result of the superseded fetch must be discarded so the caller never
//! shows slots computed for a stale selection. Each fetch is tagged with a
//! monotonically increasing sequence number per (stylist, day) key and a
//! response is dropped unless its sequence is still the latest issued for
//! that key.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use salonkit_domain::{AvailabilityWindow, Result};
use tokio::sync::Mutex;
use tracing::debug;

use super::ports::AvailabilityProvider;

type FetchKey = (String, NaiveDate);

#[derive(Default)]
struct SequenceState {
    counter: u64,
    latest: HashMap<FetchKey, u64>,
}

/// Availability fetching with stale-response sequencing and window validation
pub struct AvailabilityService {
    provider: Arc<dyn AvailabilityProvider>,
    sequences: Mutex<SequenceState>,
}

impl AvailabilityService {
    /// Create a new service over the given provider
    pub fn new(provider: Arc<dyn AvailabilityProvider>) -> Self {
        Self { provider, sequences: Mutex::new(SequenceState::default()) }
    }

    /// Fetch validated availability windows for a (stylist, day) pair
    ///
    /// Returns `Ok(None)` when the response was superseded by a newer fetch
    /// for the same key; the caller must simply ignore it.
    ///
    /// # Errors
    /// Propagates provider errors and rejects responses containing malformed
    /// windows (`end_time <= start_time`).
    pub async fn fetch_windows(
        &self,
        stylist_id: &str,
        day: NaiveDate,
    ) -> Result<Option<Vec<AvailabilityWindow>>> {
        let key: FetchKey = (stylist_id.to_string(), day);

        let sequence = {
            let mut state = self.sequences.lock().await;
            state.counter += 1;
            let sequence = state.counter;
            state.latest.insert(key.clone(), sequence);
            sequence
        };

        let outcome = self.provider.fetch_windows(stylist_id, day).await;

        let still_latest = {
            let mut state = self.sequences.lock().await;
            if state.latest.get(&key) == Some(&sequence) {
                // The winning response retires its key so the map does not
                // grow with every (stylist, day) ever fetched; a stale
                // sibling still misses the lookup and is discarded
                state.latest.remove(&key);
                true
            } else {
                false
            }
        };

        if !still_latest {
            debug!(stylist_id, %day, sequence, "Discarding superseded availability response");
            return Ok(None);
        }

        let windows = outcome?;
        for window in &windows {
            window.validate()?;
        }

        Ok(Some(windows))
    }

    #[cfg(test)]
    async fn tracked_keys(&self) -> usize {
        self.sequences.lock().await.latest.len()
    }
}
