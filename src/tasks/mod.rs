//! Background Tasks Module
//!
//! Periodic maintenance over the bucket storage.

mod sweep;

pub use sweep::spawn_sweep_task;
