//! Configuration structures for the client

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SLOT_STEP_MINUTES,
};

/// Configuration for the salon API client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL for the backend API (e.g., "https://api.example.com")
    pub base_url: String,
    /// Timeout for API requests, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total request attempts (initial try + retries)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Granularity of candidate appointment start times, in minutes
    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_MAX_ATTEMPTS
}

fn default_step_minutes() -> u32 {
    DEFAULT_SLOT_STEP_MINUTES
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            step_minutes: DEFAULT_SLOT_STEP_MINUTES,
        }
    }
}
