//! Landmark buffer decoding
//!
//! JavaScript hands over MediaPipe Pose results as one flat Float32Array:
//! `persons × 33 landmarks × (x, y, z, visibility)`.

use crate::error::EngineError;
use crate::pose::{Landmark, LandmarkFrame, Person, LANDMARK_COUNT};

/// Floats per landmark: x, y, z, visibility
pub const VALUES_PER_LANDMARK: usize = 4;

/// Floats per detected person
pub const PERSON_STRIDE: usize = LANDMARK_COUNT * VALUES_PER_LANDMARK;

/// Decode a flat landmark buffer into a frame
///
/// An empty buffer is a frame with nobody in it. A length that is not a
/// whole number of persons is rejected.
pub fn decode_frame(data: &[f32], timestamp_ms: f64) -> Result<LandmarkFrame, EngineError> {
    if data.len() % PERSON_STRIDE != 0 {
        return Err(EngineError::LandmarkBuffer {
            len: data.len(),
            stride: PERSON_STRIDE,
        });
    }

    let persons = data
        .chunks_exact(PERSON_STRIDE)
        .map(|person| {
            Person::new(
                person
                    .chunks_exact(VALUES_PER_LANDMARK)
                    .map(|v| Landmark::new(v[0], v[1], v[2], sanitize_confidence(v[3])))
                    .collect(),
            )
        })
        .collect();

    Ok(LandmarkFrame::new(timestamp_ms, persons))
}

/// Like `decode_frame`, but a malformed buffer becomes an empty frame
pub fn decode_frame_lossy(data: &[f32], timestamp_ms: f64) -> LandmarkFrame {
    match decode_frame(data, timestamp_ms) {
        Ok(frame) => frame,
        Err(err) => {
            log::warn!("{}; treating frame as empty", err);
            LandmarkFrame::empty(timestamp_ms)
        }
    }
}

/// NaN visibility means the detector had nothing to say
fn sanitize_confidence(value: f32) -> f32 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
