//! Classifier module - exercise tables and the hysteresis phase machine
//!
//! Re-exports only. All logic in submodules.

mod exercise;
mod phase;

pub use exercise::{ExerciseKind, ThresholdTable, EXERCISE_KINDS};
pub use phase::{Phase, PhaseClassifier, PhaseTransition};
