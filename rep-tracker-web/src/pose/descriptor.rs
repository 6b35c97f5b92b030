//! Person descriptor - cheap per-frame signature for continuity matching
//!
//! Centroid and bounding box of the confident landmarks. This is only good
//! enough to follow one person from frame to frame; it says nothing about
//! identity beyond the session.

use serde::{Deserialize, Serialize};

use super::landmark::Person;

/// Centroid plus bounding-box size of one detected person
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDescriptor {
    pub centroid_x: f32,
    pub centroid_y: f32,
    pub width: f32,
    pub height: f32,
}

impl PersonDescriptor {
    pub fn new(centroid: (f32, f32), width: f32, height: f32) -> Self {
        Self {
            centroid_x: centroid.0,
            centroid_y: centroid.1,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Describe a person from landmarks at or above `confidence_floor`.
    ///
    /// Falls back to every landmark when none is confident enough, so a dimly
    /// detected person still gets a position. Returns `None` only for a
    /// person without any landmark.
    pub fn from_person(person: &Person, confidence_floor: f32) -> Option<Self> {
        let confident: Vec<(f32, f32)> = person
            .landmarks
            .iter()
            .filter(|lm| lm.confidence >= confidence_floor)
            .map(|lm| lm.xy())
            .collect();

        let points = if confident.is_empty() {
            person.landmarks.iter().map(|lm| lm.xy()).collect()
        } else {
            confident
        };

        if points.is_empty() {
            return None;
        }

        let n = points.len() as f32;
        let (mut sum_x, mut sum_y) = (0.0, 0.0);
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for (x, y) in &points {
            sum_x += x;
            sum_y += y;
            min_x = min_x.min(*x);
            min_y = min_y.min(*y);
            max_x = max_x.max(*x);
            max_y = max_y.max(*y);
        }

        Some(Self::new((sum_x / n, sum_y / n), max_x - min_x, max_y - min_y))
    }

    pub fn centroid(&self) -> (f32, f32) {
        (self.centroid_x, self.centroid_y)
    }

    /// Bounding-box area, used as prominence
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Euclidean distance between centroids
    pub fn centroid_displacement(&self, other: &PersonDescriptor) -> f32 {
        let dx = self.centroid_x - other.centroid_x;
        let dy = self.centroid_y - other.centroid_y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Size mismatch in [0, 1]: 0 for equal areas, 1 when one box is empty
    pub fn size_mismatch(&self, other: &PersonDescriptor) -> f32 {
        let a = self.area();
        let b = other.area();
        let larger = a.max(b);
        if larger < 1e-6 {
            return 0.0;
        }
        1.0 - a.min(b) / larger
    }

    /// Weighted distance used for lock matching
    pub fn distance(&self, other: &PersonDescriptor, centroid_weight: f32, size_weight: f32) -> f32 {
        centroid_weight * self.centroid_displacement(other)
            + size_weight * self.size_mismatch(other)
    }

    /// False for descriptors carrying NaN or infinite values
    pub fn is_finite(&self) -> bool {
        self.centroid_x.is_finite()
            && self.centroid_y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}
