//! Physics module - joint angles and landmark confidence
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod confidence_gate;

pub use angles::{calculate_angle, exercise_angle, joint_angle, JointAngle, JointTriple, Triple};
pub use confidence_gate::{ConfidenceGate, DEFAULT_CONFIDENCE_FLOOR};
