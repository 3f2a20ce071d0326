//! Typed client for the salon backend REST API

mod adapters;
mod auth;
mod client;
mod errors;
mod salon;

pub use auth::{AuthApi, AuthResponse, LoginRequest, RegisterRequest};
pub use client::{ApiClient, ApiClientConfig};
pub use errors::{ApiError, ApiErrorCategory};
pub use salon::SalonApi;
