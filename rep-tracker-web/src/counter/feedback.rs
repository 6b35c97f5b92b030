//! Form feedback from rep depth
//!
//! One message per completed rep, never per frame. Depth deviations beyond
//! the kind's severe band produce a warning prefixed with the penalty marker,
//! which the announcer uses to decide what to speak.

use serde::Serialize;

use super::reps::RepEvent;
use crate::classifier::ExerciseKind;

/// Prefix marking a corrective warning
pub const PENALTY_MARKER: char = '⚠';

/// A feedback line for the UI
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Feedback {
    pub message: String,
    pub warning: bool,
}

/// Message text without the penalty marker, for speech
pub fn strip_marker(message: &str) -> &str {
    message.trim_start_matches(PENALTY_MARKER).trim_start()
}

/// Rate-limited feedback: at most one message per rep event
#[derive(Clone, Debug)]
pub struct FeedbackGenerator {
    kind: ExerciseKind,
    severe_deg: f32,
    /// Rep number of the last event that produced feedback
    last_rep: u32,
}

impl FeedbackGenerator {
    pub fn new(kind: ExerciseKind, severe_deg: f32) -> Self {
        Self {
            kind,
            severe_deg,
            last_rep: 0,
        }
    }

    /// Feedback for a completed rep; `None` if this rep was already answered
    pub fn on_rep(&mut self, event: &RepEvent) -> Option<Feedback> {
        if event.rep == self.last_rep {
            return None;
        }
        self.last_rep = event.rep;

        let deviation = event.deviation_deg;
        if deviation.abs() <= self.severe_deg || deviation.is_nan() {
            return Some(Feedback {
                message: self.praise().to_string(),
                warning: false,
            });
        }

        let fault = if deviation > 0.0 { self.too_shallow() } else { self.too_deep() };
        Some(Feedback {
            message: format!("{} {}", PENALTY_MARKER, fault),
            warning: true,
        })
    }

    /// Forget the last answered rep (new set)
    pub fn reset(&mut self) {
        self.last_rep = 0;
    }

    fn praise(&self) -> &'static str {
        match self.kind {
            ExerciseKind::Squat => "Good squat, keep your chest up",
            ExerciseKind::Pushup => "Good push-up, keep your core tight",
            ExerciseKind::Lunge => "Good lunge, stay balanced",
            ExerciseKind::Generic => "Good rep",
        }
    }

    fn too_shallow(&self) -> &'static str {
        match self.kind {
            ExerciseKind::Squat => "Go deeper, thighs parallel to the floor",
            ExerciseKind::Pushup => "Lower your chest closer to the floor",
            ExerciseKind::Lunge => "Bend your front knee to 90 degrees",
            ExerciseKind::Generic => "Use your full range of motion",
        }
    }

    fn too_deep(&self) -> &'static str {
        match self.kind {
            ExerciseKind::Squat => "Too deep, control the descent",
            ExerciseKind::Pushup => "Tuck your elbows, don't let them flare",
            ExerciseKind::Lunge => "Don't let your back knee hit the floor",
            ExerciseKind::Generic => "Ease off at the bottom of the movement",
        }
    }
}
