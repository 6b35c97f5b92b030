//! Set and rest sequencing
//!
//! Watches the engine's rep count. When a set reaches its target the
//! sequencer starts the rest countdown, or on the last set closes the
//! session with a summary. The countdown is driven by an external 1 Hz
//! tick; the sequencer holds no timers of its own.

use serde::Serialize;

use super::engine::FrameOutput;
use crate::classifier::ExerciseKind;
use crate::config::SessionTargets;

/// Record handed to persistence when a session ends
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub exercise_type: ExerciseKind,
    pub reps_completed: u32,
    pub accuracy_score: u8,
    /// Seconds
    pub duration: u32,
    pub feedback_summary: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SequencerEvent {
    #[serde(rename_all = "camelCase")]
    RepCounted { set: u32, rep: u32 },
    #[serde(rename_all = "camelCase")]
    SetComplete { set: u32, reps: u32, accuracy: u8 },
    #[serde(rename_all = "camelCase")]
    RestStarted { set: u32, seconds: u32 },
    #[serde(rename_all = "camelCase")]
    SetStarted { set: u32 },
    SessionComplete(SessionSummary),
}

impl SequencerEvent {
    /// Line for the voice assistant
    pub fn announcement(&self) -> String {
        match self {
            SequencerEvent::RepCounted { rep, .. } => rep.to_string(),
            SequencerEvent::SetComplete { set, .. } => format!("Set {} completed.", set),
            SequencerEvent::RestStarted { seconds, .. } => format!("Rest for {} seconds.", seconds),
            SequencerEvent::SetStarted { set } => format!("Start Set {}.", set),
            SequencerEvent::SessionComplete(summary) => summary.feedback_summary.clone(),
        }
    }
}

/// One-line verdict on a finished session
pub fn feedback_summary(kind: ExerciseKind, accuracy: u8, reps: u32) -> String {
    let label = kind.label();
    if accuracy >= 90 {
        format!("Excellent {} form! {} perfect reps.", label, reps)
    } else if accuracy >= 75 {
        format!("Good work! {} {}s with solid form.", reps, label)
    } else {
        format!("{} {}s completed. Keep practicing your form!", reps, label)
    }
}

/// Drives sets, rest and the final summary
#[derive(Clone, Debug)]
pub struct SessionSequencer {
    kind: ExerciseKind,
    targets: SessionTargets,
    /// 1-based
    current_set: u32,
    rest_remaining: u32,
    /// Reps of finished sets
    completed_reps: u32,
    /// Sum of set accuracy weighted by the set's reps
    weighted_accuracy: f64,
    elapsed_secs: u32,
    summary: Option<SessionSummary>,
}

impl SessionSequencer {
    pub fn new(kind: ExerciseKind, targets: SessionTargets) -> Self {
        Self {
            kind,
            targets: SessionTargets {
                target_reps: targets.target_reps.max(1),
                target_sets: targets.target_sets.max(1),
                rest_seconds: targets.rest_seconds,
            },
            current_set: 1,
            rest_remaining: 0,
            completed_reps: 0,
            weighted_accuracy: 0.0,
            elapsed_secs: 0,
            summary: None,
        }
    }

    /// React to one frame's output.
    ///
    /// Returns nothing while resting or after the session ended; the caller
    /// should not be feeding frames then anyway.
    pub fn observe(&mut self, output: &FrameOutput) -> Vec<SequencerEvent> {
        let mut events = Vec::new();
        if self.is_resting() || self.is_finished() {
            return events;
        }

        if let Some(rep) = &output.rep_event {
            events.push(SequencerEvent::RepCounted { set: self.current_set, rep: rep.rep });
        }

        if output.reps < self.targets.target_reps {
            return events;
        }

        let set = self.current_set;
        self.completed_reps = self.completed_reps.saturating_add(output.reps);
        self.weighted_accuracy += output.accuracy as f64 * output.reps as f64;
        log::info!("set {} of {} complete: {} reps", set, self.targets.target_sets, output.reps);
        events.push(SequencerEvent::SetComplete { set, reps: output.reps, accuracy: output.accuracy });

        if set >= self.targets.target_sets {
            let summary = self.close(None);
            events.push(SequencerEvent::SessionComplete(summary));
        } else if self.targets.rest_seconds > 0 {
            self.rest_remaining = self.targets.rest_seconds;
            events.push(SequencerEvent::RestStarted { set, seconds: self.rest_remaining });
        } else {
            self.current_set += 1;
            events.push(SequencerEvent::SetStarted { set: self.current_set });
        }
        events
    }

    /// External 1 Hz timer: elapsed time and rest countdown
    pub fn tick(&mut self) -> Option<SequencerEvent> {
        if self.is_finished() {
            return None;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);

        if self.rest_remaining == 0 {
            return None;
        }
        self.rest_remaining -= 1;
        if self.rest_remaining > 0 {
            return None;
        }
        self.current_set += 1;
        log::info!("rest over, starting set {}", self.current_set);
        Some(SequencerEvent::SetStarted { set: self.current_set })
    }

    /// End the session now, counting the unfinished set from `running`
    pub fn finish(&mut self, running: Option<&FrameOutput>) -> SessionSummary {
        if let Some(summary) = &self.summary {
            return summary.clone();
        }
        let running = if self.is_resting() { None } else { running };
        self.close(running)
    }

    fn close(&mut self, running: Option<&FrameOutput>) -> SessionSummary {
        let (extra_reps, extra_weight) = running
            .map(|o| (o.reps, o.accuracy as f64 * o.reps as f64))
            .unwrap_or((0, 0.0));
        let reps = self.completed_reps.saturating_add(extra_reps);
        let accuracy = if reps == 0 {
            running.map(|o| o.accuracy).unwrap_or(100)
        } else {
            ((self.weighted_accuracy + extra_weight) / reps as f64).round().max(0.0).min(100.0) as u8
        };

        let summary = SessionSummary {
            exercise_type: self.kind,
            reps_completed: reps,
            accuracy_score: accuracy,
            duration: self.elapsed_secs,
            feedback_summary: feedback_summary(self.kind, accuracy, reps),
        };
        log::info!(
            "session complete: {} reps, accuracy {}%, {}s",
            summary.reps_completed,
            summary.accuracy_score,
            summary.duration
        );
        self.rest_remaining = 0;
        self.summary = Some(summary.clone());
        summary
    }

    pub fn is_resting(&self) -> bool {
        self.rest_remaining > 0
    }

    pub fn is_finished(&self) -> bool {
        self.summary.is_some()
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn current_set(&self) -> u32 {
        self.current_set
    }

    pub fn rest_remaining(&self) -> u32 {
        self.rest_remaining
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Reps of finished sets
    pub fn completed_reps(&self) -> u32 {
        self.completed_reps
    }

    pub fn targets(&self) -> &SessionTargets {
        &self.targets
    }
}
