//! # Salonkit Client
//!
//! Infrastructure implementations of core ports for the salon booking
//! platform.
//!
//! This crate contains:
//! - HTTP client with retry/backoff
//! - Bearer-token session management with single-flight refresh
//! - Typed API endpoint surface
//! - Realtime event decoding and dispatch
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `salonkit-core`
//! - Depends on `salonkit-domain` and `salonkit-core`
//! - Contains all "impure" code (I/O, clocks)

pub mod api;
pub mod config;
pub mod http;
pub mod realtime;
pub mod session;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientConfig, ApiError, SalonApi};
pub use http::HttpClient;
pub use realtime::{EventDispatcher, RealtimeEvent};
pub use session::{InMemoryTokenStore, SessionManager, TokenStore};
