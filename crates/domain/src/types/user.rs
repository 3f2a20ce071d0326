//! User and role types
//!
//! The stylist listing endpoint returns generic user records; callers
//! filter by role client-side.

use serde::{Deserialize, Serialize};

/// Role attached to a platform user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Client,
    Stylist,
    Admin,
}

/// A platform user (customer, stylist, or administrator)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl User {
    /// Whether this user offers bookable services
    #[must_use]
    pub fn is_stylist(&self) -> bool {
        self.role == UserRole::Stylist
    }
}
