//! Workout session - engine plus sequencer for one exercise
//!
//! This is the collaborator that gates the frame loop: while a rest period
//! runs (or after the session ended) frames are not handed to the engine at
//! all, so phase and reps stay frozen without any flag inside the engine.

use serde::Serialize;

use super::engine::{FrameOutput, RepEngine};
use super::sequencer::{SequencerEvent, SessionSequencer, SessionSummary};
use crate::classifier::ExerciseKind;
use crate::config::EngineConfig;
use crate::pose::{LandmarkFrame, PersonDescriptor};

/// Frame output plus session progress
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdate {
    #[serde(flatten)]
    pub frame: FrameOutput,
    pub events: Vec<SequencerEvent>,
    pub current_set: u32,
    pub target_sets: u32,
    pub target_reps: u32,
    pub rest_remaining: u32,
    /// Reps of finished sets plus the running set
    pub total_reps: u32,
    pub finished: bool,
}

pub struct WorkoutSession {
    engine: RepEngine,
    sequencer: SessionSequencer,
}

impl WorkoutSession {
    pub fn new(kind: ExerciseKind, config: &EngineConfig) -> Self {
        log::info!(
            "session started: {} ({} x {}, rest {}s)",
            kind.as_str(),
            config.targets.target_sets,
            config.targets.target_reps,
            config.targets.rest_seconds
        );
        Self {
            engine: RepEngine::new(kind, config),
            sequencer: SessionSequencer::new(kind, config.targets),
        }
    }

    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> SessionUpdate {
        if self.sequencer.is_resting() || self.sequencer.is_finished() {
            return self.update(self.engine.snapshot(), Vec::new());
        }

        let output = self.engine.process_frame(frame);
        let events = self.sequencer.observe(&output);

        let set_done = events
            .iter()
            .any(|e| matches!(e, SequencerEvent::SetComplete { .. }));
        let update = self.update(output, events);
        if set_done {
            // Next set starts from zero; the lock carries over
            self.engine.reset();
        }
        update
    }

    /// External 1 Hz timer
    pub fn tick(&mut self) -> Option<SequencerEvent> {
        self.sequencer.tick()
    }

    /// End the session early (or fetch the summary of a finished one)
    pub fn finish(&mut self) -> SessionSummary {
        let running = self.engine.snapshot();
        self.sequencer.finish(Some(&running))
    }

    /// Restart the running set from zero
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn lock(&mut self, descriptor: PersonDescriptor) {
        self.engine.lock(descriptor);
    }

    pub fn lock_current(&mut self) -> bool {
        self.engine.lock_current()
    }

    pub fn unlock(&mut self) {
        self.engine.unlock();
    }

    pub fn engine(&self) -> &RepEngine {
        &self.engine
    }

    pub fn sequencer(&self) -> &SessionSequencer {
        &self.sequencer
    }

    /// Current progress without processing a frame
    pub fn snapshot(&self) -> SessionUpdate {
        self.update(self.engine.snapshot(), Vec::new())
    }

    fn update(&self, frame: FrameOutput, events: Vec<SequencerEvent>) -> SessionUpdate {
        let running = if self.sequencer.is_resting() || self.sequencer.is_finished() {
            0
        } else {
            frame.reps
        };
        let targets = self.sequencer.targets();
        SessionUpdate {
            total_reps: self.sequencer.completed_reps().saturating_add(running),
            current_set: self.sequencer.current_set(),
            target_sets: targets.target_sets,
            target_reps: targets.target_reps,
            rest_remaining: self.sequencer.rest_remaining(),
            finished: self.sequencer.is_finished(),
            frame,
            events,
        }
    }
}
