//! Realtime channel event decoding and dispatch
//!
//! The backend pushes fire-and-forget notifications over a socket channel.
//! This module decodes the named events into typed values and fans them out
//! to registered handlers; there is no ack protocol and no delivery
//! guarantee beyond what the channel provides.

mod dispatcher;
mod events;

pub use dispatcher::{EventDispatcher, RealtimeHandler};
pub use events::RealtimeEvent;
