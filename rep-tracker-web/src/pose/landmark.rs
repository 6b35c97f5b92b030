//! Landmark frame data model
//!
//! One frame holds zero or more detected persons. Each person is the ordered
//! list of MediaPipe Pose landmarks, so a landmark's index is its label.

use serde::{Deserialize, Serialize};

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const LANDMARK_COUNT: usize = 33;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 3D landmark point (normalized coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,  // 0-1 normalized
    pub y: f32,  // 0-1 normalized
    pub z: f32,  // Relative depth
    /// Detector visibility/confidence in [0, 1]
    pub confidence: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, confidence: f32) -> Self {
        Self { x, y, z, confidence }
    }

    /// Image-plane position
    pub fn xy(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// All landmarks of one detected person, indexed by MediaPipe label
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub landmarks: Vec<Landmark>,
}

impl Person {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    /// Landmark at `index`, if the detector produced that many points
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.landmarks.get(index)
    }
}

/// One timestamped capture: zero, one or many persons
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    /// Capture time in milliseconds
    pub timestamp_ms: f64,
    pub persons: Vec<Person>,
}

impl LandmarkFrame {
    pub fn new(timestamp_ms: f64, persons: Vec<Person>) -> Self {
        Self { timestamp_ms, persons }
    }

    /// A frame in which the detector found nobody
    pub fn empty(timestamp_ms: f64) -> Self {
        Self { timestamp_ms, persons: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}
