//! Rep Tracker Web - rep counting and person lock for camera workouts
//!
//! Turns MediaPipe Pose landmarks, one frame at a time, into phase
//! transitions, rep counts, form accuracy and corrective feedback, while
//! staying locked onto one person when others walk into the frame.
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points for setup; sessions live in `bridge`

mod bridge;
pub mod classifier;
pub mod config;
pub mod counter;
pub mod error;
pub mod physics;
pub mod pose;
pub mod session;
pub mod tracking;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen types for JS access
pub use bridge::{decode_frame, decode_frame_lossy, RepSession, PERSON_STRIDE};

pub use classifier::{ExerciseKind, Phase, ThresholdTable};
pub use config::{EngineConfig, SessionTargets};
pub use counter::RepEvent;
pub use error::EngineError;
pub use pose::{Landmark, LandmarkFrame, Person, PersonDescriptor};
pub use session::{FrameOutput, RepEngine, SequencerEvent, SessionSummary, SessionUpdate, WorkoutSession};
pub use tracking::{LockEvent, LockState};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console
///
/// @param {string} level - "trace", "debug", "info", "warn" or "error"
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    };

    wasm_logger::init(wasm_logger::Config::new(log_level));
    log::info!("rep tracker initialized with log level {}", log_level);
}

#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
