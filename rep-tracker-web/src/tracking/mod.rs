//! Tracking module - person lock across multi-person frames
//!
//! Re-exports only. All logic in submodules.

mod lock;

pub use lock::{LockConfig, LockEvent, LockState, LockVerdict, PersonLockTracker};
