//! Exercise kinds and their threshold tables
//!
//! Each kind picks a joint and a fixed table of angles. The table is looked
//! up once when a session starts; nothing downstream branches on the kind.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::physics::JointTriple;
use crate::pose::{
    LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST,
    RIGHT_ANKLE, RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

/// Exercise labels accepted from the catalog's `trackAs` field
pub const EXERCISE_KINDS: [&str; 4] = ["squat", "pushup", "lunge", "generic"];

/// Exercise kind enum for type-safe handling
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    Squat,
    Pushup,
    Lunge,
    Generic,
}

const KNEE: JointTriple = JointTriple {
    left_name: "left_knee",
    right_name: "right_knee",
    left: [LEFT_HIP, LEFT_KNEE, LEFT_ANKLE],
    right: [RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE],
};

const ELBOW: JointTriple = JointTriple {
    left_name: "left_elbow",
    right_name: "right_elbow",
    left: [LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST],
    right: [RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST],
};

const HIP: JointTriple = JointTriple {
    left_name: "left_hip",
    right_name: "right_hip",
    left: [LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE],
    right: [RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE],
};

impl ExerciseKind {
    /// Parse the catalog's `trackAs` value; unknown or missing maps to Generic
    pub fn from_track_as(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "squat" => ExerciseKind::Squat,
            "pushup" | "push-up" | "push_up" => ExerciseKind::Pushup,
            "lunge" => ExerciseKind::Lunge,
            _ => ExerciseKind::Generic,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "squat",
            ExerciseKind::Pushup => "pushup",
            ExerciseKind::Lunge => "lunge",
            ExerciseKind::Generic => "generic",
        }
    }

    /// Display label used in session summaries
    pub fn label(&self) -> &'static str {
        match self {
            ExerciseKind::Squat => "Squat",
            ExerciseKind::Pushup => "Push-up",
            ExerciseKind::Lunge => "Lunge",
            ExerciseKind::Generic => "Exercise",
        }
    }

    /// Joint whose angle drives the phase machine
    pub fn joint(&self) -> JointTriple {
        match self {
            ExerciseKind::Squat | ExerciseKind::Lunge => KNEE,
            ExerciseKind::Pushup => ELBOW,
            ExerciseKind::Generic => HIP,
        }
    }

    /// Built-in threshold table
    pub fn thresholds(&self) -> ThresholdTable {
        match self {
            ExerciseKind::Squat => ThresholdTable::new(90.0, 160.0, 10.0, 80.0, 2.0),
            ExerciseKind::Pushup => ThresholdTable::new(90.0, 155.0, 10.0, 75.0, 2.0),
            ExerciseKind::Lunge => ThresholdTable::new(100.0, 160.0, 10.0, 90.0, 2.0),
            ExerciseKind::Generic => ThresholdTable::new(100.0, 160.0, 10.0, 90.0, 1.5),
        }
    }
}

impl Default for ExerciseKind {
    fn default() -> Self {
        ExerciseKind::Generic
    }
}

fn default_severe_deg() -> f32 { 15.0 }

/// Angles (degrees) that drive phase changes and scoring for one kind
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdTable {
    pub low_deg: f32,
    pub high_deg: f32,
    pub hysteresis_deg: f32,
    /// Target bottom angle of a rep
    pub ideal_depth: f32,
    /// Accuracy points lost per degree of depth deviation
    pub scale: f32,
    /// Deviation beyond which feedback becomes a warning
    #[serde(default = "default_severe_deg")]
    pub severe_deg: f32,
}

impl ThresholdTable {
    pub fn new(low_deg: f32, high_deg: f32, hysteresis_deg: f32, ideal_depth: f32, scale: f32) -> Self {
        Self {
            low_deg,
            high_deg,
            hysteresis_deg,
            ideal_depth,
            scale,
            severe_deg: default_severe_deg(),
        }
    }

    /// Angle at or below which the phase becomes DOWN
    pub fn down_bound(&self) -> f32 {
        self.low_deg - self.hysteresis_deg / 2.0
    }

    /// Angle at or above which the phase becomes UP
    pub fn up_bound(&self) -> f32 {
        self.high_deg + self.hysteresis_deg / 2.0
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let fields = [
            ("lowDeg", self.low_deg),
            ("highDeg", self.high_deg),
            ("hysteresisDeg", self.hysteresis_deg),
            ("idealDepth", self.ideal_depth),
            ("scale", self.scale),
            ("severeDeg", self.severe_deg),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::InvalidConfig(format!("{} must be a finite number", name)));
        }
        if self.low_deg >= self.high_deg {
            return Err(EngineError::InvalidConfig(format!(
                "lowDeg ({}) must be below highDeg ({})",
                self.low_deg, self.high_deg
            )));
        }
        if self.hysteresis_deg < 0.0 || self.scale < 0.0 || self.severe_deg < 0.0 {
            return Err(EngineError::InvalidConfig(
                "hysteresisDeg, scale and severeDeg must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}
