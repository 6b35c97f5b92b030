//! Session module - per-frame engine, set sequencing and the workout
//! session that ties them together
//!
//! Re-exports only. All logic in submodules.

mod engine;
mod sequencer;
mod workout;

pub use engine::{FrameOutput, RepEngine};
pub use sequencer::{feedback_summary, SequencerEvent, SessionSequencer, SessionSummary};
pub use workout::{SessionUpdate, WorkoutSession};
