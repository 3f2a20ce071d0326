//! Configuration loading
//!
//! Loads [`ClientConfig`](salonkit_domain::ClientConfig) from environment
//! variables or files.

mod loader;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
