//! Counter module - reps, accuracy and form feedback
//!
//! Re-exports only. All logic in submodules.

mod reps;
mod feedback;

pub use reps::{RepCounter, RepEvent};
pub use feedback::{Feedback, FeedbackGenerator, PENALTY_MARKER, strip_marker};
