//! Pose module - landmark frames from the pose detector
//!
//! Re-exports only. All logic in submodules.

mod landmark;
mod descriptor;

pub use landmark::{
    Landmark, Person, LandmarkFrame,
    // Constants
    LANDMARK_COUNT,
    NOSE, LEFT_SHOULDER, RIGHT_SHOULDER,
    LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST,
    LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE,
    LEFT_ANKLE, RIGHT_ANKLE,
};
pub use descriptor::PersonDescriptor;
