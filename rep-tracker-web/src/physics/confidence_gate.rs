//! Confidence Gate - first filter on every landmark
//!
//! Landmarks below the floor are treated as missing. Angles built from them
//! become "no-reading" frames instead of noisy guesses.

use crate::pose::Landmark;

/// Default minimum confidence to accept a landmark
pub const DEFAULT_CONFIDENCE_FLOOR: f32 = 0.5;

/// Confidence floor shared by angle and descriptor computations
#[derive(Clone, Copy, Debug)]
pub struct ConfidenceGate {
    /// Minimum confidence to accept raw data
    threshold: f32,
}

impl ConfidenceGate {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_CONFIDENCE_FLOOR,
        }
    }

    pub fn with_threshold(threshold: f32) -> Self {
        let mut gate = Self::new();
        gate.set_threshold(threshold);
        gate
    }

    /// Set confidence threshold, clamped to [0, 1]
    pub fn set_threshold(&mut self, threshold: f32) {
        self.threshold = if threshold.is_nan() { DEFAULT_CONFIDENCE_FLOOR } else { threshold.clamp(0.0, 1.0) };
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// NaN confidence never passes
    pub fn passes(&self, landmark: &Landmark) -> bool {
        landmark.confidence >= self.threshold
    }

    pub fn all_pass(&self, landmarks: &[&Landmark]) -> bool {
        landmarks.iter().all(|lm| self.passes(lm))
    }
}

impl Default for ConfidenceGate {
    fn default() -> Self {
        Self::new()
    }
}
