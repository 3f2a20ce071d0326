//! Slot computation over availability windows

pub mod slots;

pub use slots::compute_slots;
