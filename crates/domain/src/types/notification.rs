//! Notification feed, stylist applications, and analytics summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a user's notification feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Application submitted by a candidate stylist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylistApplication {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub motivation: String,
    pub years_of_experience: u32,
}

/// Aggregated platform figures for the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_reservations: u64,
    pub total_revenue: f64,
    pub active_stylists: u64,
    pub new_clients_this_month: u64,
}
