//! Per-frame engine
//!
//! One call per captured frame, fully synchronous:
//!
//! ```text
//! LandmarkFrame -> lock filter -> joint angle -> phase -> reps -> feedback
//! ```
//!
//! All state lives in the engine value itself. A session creates one at
//! start and drops it at the end; nothing is shared between sessions.

use serde::Serialize;

use crate::classifier::{ExerciseKind, Phase};
use crate::config::EngineConfig;
use crate::counter::{strip_marker, FeedbackGenerator, RepCounter, RepEvent};
use crate::physics::{exercise_angle, ConfidenceGate, JointTriple};
use crate::pose::{LandmarkFrame, PersonDescriptor};
use crate::tracking::{LockEvent, LockState, PersonLockTracker};

/// Snapshot handed back to the caller after every frame
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameOutput {
    pub reps: u32,
    /// Integer in [0, 100]
    pub accuracy: u8,
    /// Latest feedback line, possibly empty
    pub feedback: String,
    pub phase: Phase,
    pub lock_state: LockState,
    /// Most prominent person, for a later `lock()`
    pub last_descriptor: Option<PersonDescriptor>,
    /// Joint angle of this frame, if a valid one was read
    pub angle: Option<f32>,
    /// Whether a person's landmarks were forwarded downstream
    pub accepted: bool,
    pub rep_event: Option<RepEvent>,
    /// Speakable warning, present only on the frame it was produced
    pub announcement: Option<String>,
    pub lock_event: Option<LockEvent>,
    /// Descriptor distance of the best candidate while locked
    pub match_distance: Option<f32>,
    /// Frames without a usable angle since the set started
    pub no_reading_frames: u32,
    pub timestamp_ms: f64,
}

/// Rep-counting engine for one exercise kind
#[derive(Clone, Debug)]
pub struct RepEngine {
    kind: ExerciseKind,
    joint: JointTriple,
    gate: ConfidenceGate,
    tracker: PersonLockTracker,
    counter: RepCounter,
    feedback: FeedbackGenerator,
    last_feedback: String,
    last_timestamp_ms: f64,
}

impl RepEngine {
    pub fn new(kind: ExerciseKind, config: &EngineConfig) -> Self {
        let table = config.thresholds_for(kind);
        Self {
            kind,
            joint: kind.joint(),
            gate: ConfidenceGate::with_threshold(config.confidence_floor),
            tracker: PersonLockTracker::new(config.lock_config()),
            counter: RepCounter::new(table),
            feedback: FeedbackGenerator::new(kind, table.severe_deg),
            last_feedback: String::new(),
            last_timestamp_ms: 0.0,
        }
    }

    pub fn with_defaults(kind: ExerciseKind) -> Self {
        Self::new(kind, &EngineConfig::default())
    }

    /// Process one frame and return the full output snapshot
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> FrameOutput {
        self.last_timestamp_ms = frame.timestamp_ms;

        let verdict = self.tracker.filter(frame);
        let accepted = verdict.person.is_some();

        let angle = verdict
            .person
            .map(|person| exercise_angle(person, &self.joint, &self.gate))
            .and_then(|a| a.reading());

        // Withheld frames (locked onto someone else, or lost) never reach
        // the counter, so phase and reps stay frozen.
        let rep_event = if accepted || self.tracker.state() == LockState::Unlocked {
            self.counter.observe(angle, frame.timestamp_ms)
        } else {
            None
        };

        let mut announcement = None;
        if let Some(event) = &rep_event {
            if let Some(fb) = self.feedback.on_rep(event) {
                if fb.warning {
                    announcement = Some(strip_marker(&fb.message).to_string());
                }
                self.last_feedback = fb.message;
            }
        }

        FrameOutput {
            angle,
            accepted,
            rep_event,
            announcement,
            lock_event: verdict.event,
            match_distance: verdict.distance,
            ..self.snapshot()
        }
    }

    /// Current state without processing a frame
    pub fn snapshot(&self) -> FrameOutput {
        FrameOutput {
            reps: self.counter.reps(),
            accuracy: self.counter.accuracy(),
            feedback: self.last_feedback.clone(),
            phase: self.counter.phase(),
            lock_state: self.tracker.state(),
            last_descriptor: self.tracker.last_descriptor(),
            angle: None,
            accepted: false,
            rep_event: None,
            announcement: None,
            lock_event: None,
            match_distance: None,
            no_reading_frames: self.counter.classifier().no_reading_frames(),
            timestamp_ms: self.last_timestamp_ms,
        }
    }

    /// Zero reps, full accuracy, NEUTRAL phase. Kind, thresholds and the
    /// person lock are kept.
    pub fn reset(&mut self) {
        self.counter.reset();
        self.feedback.reset();
        self.last_feedback.clear();
    }

    pub fn lock(&mut self, descriptor: PersonDescriptor) {
        self.tracker.lock(descriptor);
    }

    /// Lock onto the most prominent person of the latest frame
    pub fn lock_current(&mut self) -> bool {
        self.tracker.lock_current()
    }

    pub fn unlock(&mut self) {
        self.tracker.unlock();
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn reps(&self) -> u32 {
        self.counter.reps()
    }

    pub fn accuracy(&self) -> u8 {
        self.counter.accuracy()
    }

    pub fn phase(&self) -> Phase {
        self.counter.phase()
    }

    pub fn lock_state(&self) -> LockState {
        self.tracker.state()
    }

    pub fn last_descriptor(&self) -> Option<PersonDescriptor> {
        self.tracker.last_descriptor()
    }
}
