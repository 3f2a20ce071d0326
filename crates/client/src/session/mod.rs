//! Bearer-token session management
//!
//! Token lifecycle for the salon API: storage, proactive refresh before
//! expiry, and reactive refresh on 401. Only one refresh is ever in flight;
//! concurrent callers wait for it and reuse its result.

mod manager;
mod store;

pub use manager::{SessionManager, TokenRefresher};
pub use store::{InMemoryTokenStore, TokenStore};
