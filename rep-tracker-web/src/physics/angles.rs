//! Joint angle calculation using dot product
//!
//! Calculates the angle at a vertex landmark B from the vectors B→A and B→C.
//! Works in the image plane: MediaPipe's z is too noisy for joint angles.

use serde::Serialize;

use super::confidence_gate::ConfidenceGate;
use crate::pose::{Landmark, Person};

/// Landmark indices (A, B, C) with B as the vertex
pub type Triple = [usize; 3];

/// The joint an exercise is judged on, on both body sides
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointTriple {
    pub left_name: &'static str,
    pub right_name: &'static str,
    pub left: Triple,
    pub right: Triple,
}

/// Angle at a named joint for one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct JointAngle {
    pub name: &'static str,
    /// Degrees in [0, 180]; meaningless when `valid` is false
    pub degrees: f32,
    pub valid: bool,
    /// Lowest confidence among the three landmarks
    #[serde(skip)]
    pub weakest_confidence: f32,
}

impl JointAngle {
    pub fn invalid(name: &'static str) -> Self {
        Self { name, degrees: 0.0, valid: false, weakest_confidence: 0.0 }
    }

    /// Degrees if this is a usable reading
    pub fn reading(&self) -> Option<f32> {
        if self.valid { Some(self.degrees) } else { None }
    }
}

/// Calculate the angle at `b` in degrees
///
/// Uses dot product formula: cos(θ) = (v1 · v2) / (|v1| × |v2|)
///
/// Returns `None` when a vector has no length (coincident points).
pub fn calculate_angle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> Option<f32> {
    let v1 = (a.0 - b.0, a.1 - b.1);
    let v2 = (c.0 - b.0, c.1 - b.1);

    let dot = v1.0 * v2.0 + v1.1 * v2.1;

    let mag1 = (v1.0 * v1.0 + v1.1 * v1.1).sqrt();
    let mag2 = (v2.0 * v2.0 + v2.1 * v2.1).sqrt();

    if !(mag1 >= 0.0001 && mag2 >= 0.0001) {
        return None;
    }

    // Clamp guards acos against floating-point overshoot
    let cos_angle = (dot / (mag1 * mag2)).clamp(-1.0, 1.0);
    let degrees = cos_angle.acos().to_degrees();

    if degrees.is_finite() { Some(degrees) } else { None }
}

/// Angle at `b`, invalid if any landmark fails the confidence gate
pub fn joint_angle(
    name: &'static str,
    a: &Landmark,
    b: &Landmark,
    c: &Landmark,
    gate: &ConfidenceGate,
) -> JointAngle {
    if !gate.all_pass(&[a, b, c]) {
        return JointAngle::invalid(name);
    }

    match calculate_angle(a.xy(), b.xy(), c.xy()) {
        Some(degrees) => JointAngle {
            name,
            degrees,
            valid: true,
            weakest_confidence: a.confidence.min(b.confidence).min(c.confidence),
        },
        None => JointAngle::invalid(name),
    }
}

fn side_angle(person: &Person, name: &'static str, triple: Triple, gate: &ConfidenceGate) -> JointAngle {
    match (person.get(triple[0]), person.get(triple[1]), person.get(triple[2])) {
        (Some(a), Some(b), Some(c)) => joint_angle(name, a, b, c, gate),
        _ => JointAngle::invalid(name),
    }
}

/// Evaluate the joint on both sides and keep the more trustworthy reading
///
/// Side facing the camera usually wins; ties go to the left side.
pub fn exercise_angle(person: &Person, joint: &JointTriple, gate: &ConfidenceGate) -> JointAngle {
    let left = side_angle(person, joint.left_name, joint.left, gate);
    let right = side_angle(person, joint.right_name, joint.right, gate);

    match (left.valid, right.valid) {
        (true, true) if right.weakest_confidence > left.weakest_confidence => right,
        (true, _) => left,
        (false, true) => right,
        (false, false) => JointAngle::invalid(joint.left_name),
    }
}
