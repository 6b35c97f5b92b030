//! Rep counting and form accuracy
//!
//! A rep is one DOWN -> UP transition. Its depth is the lowest angle of the
//! DOWN dwell, scored against the kind's ideal depth:
//!
//! ```text
//! contribution = 100 - clamp(scale * |ideal - depth|, 0, 100)
//! ```
//!
//! Running accuracy is the mean contribution, and 100 before the first rep.

use serde::Serialize;

use crate::classifier::{Phase, PhaseClassifier, PhaseTransition, ThresholdTable};

/// Emitted once per completed DOWN -> UP cycle
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepEvent {
    /// 1-based rep number within the set
    pub rep: u32,
    /// Lowest angle reached during DOWN
    pub depth_deg: f32,
    /// Signed `depth - ideal`; positive means not deep enough
    pub deviation_deg: f32,
    /// This rep's accuracy contribution in [0, 100]
    pub accuracy: u8,
    pub timestamp_ms: f64,
}

/// Counts reps for one set and keeps the running accuracy
#[derive(Clone, Debug)]
pub struct RepCounter {
    classifier: PhaseClassifier,
    reps: u32,
    /// Sum of per-rep contributions
    accuracy_sum: f64,
    scored_reps: u32,
}

impl RepCounter {
    pub fn new(table: ThresholdTable) -> Self {
        Self {
            classifier: PhaseClassifier::new(table),
            reps: 0,
            accuracy_sum: 0.0,
            scored_reps: 0,
        }
    }

    /// Feed one frame's angle through the phase machine
    pub fn observe(&mut self, angle: Option<f32>, timestamp_ms: f64) -> Option<RepEvent> {
        let transition = self.classifier.update(angle)?;
        self.process_transition(&transition, timestamp_ms)
    }

    /// Count a DOWN -> UP transition; every other transition is ignored
    pub fn process_transition(&mut self, transition: &PhaseTransition, timestamp_ms: f64) -> Option<RepEvent> {
        if !transition.completes_rep() {
            return None;
        }

        let table = *self.classifier.table();
        let depth = transition.down_extreme.unwrap_or_else(|| table.down_bound());
        let deviation = depth - table.ideal_depth;
        let contribution = Self::contribution(&table, depth);

        self.reps = self.reps.saturating_add(1);
        self.accuracy_sum += contribution as f64;
        self.scored_reps = self.scored_reps.saturating_add(1);

        let event = RepEvent {
            rep: self.reps,
            depth_deg: depth,
            deviation_deg: deviation,
            accuracy: contribution.round() as u8,
            timestamp_ms,
        };
        log::debug!("rep {} depth {:.1}° accuracy {}", event.rep, depth, event.accuracy);
        Some(event)
    }

    /// Accuracy contribution of a rep bottoming out at `depth`, in [0, 100]
    pub fn contribution(table: &ThresholdTable, depth: f32) -> f32 {
        // f32::max/min drop NaN, so a broken table still yields a bounded score
        let penalty = (table.scale * (table.ideal_depth - depth).abs()).max(0.0).min(100.0);
        100.0 - penalty
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    /// Mean contribution so far; 100 for an empty set
    pub fn accuracy(&self) -> u8 {
        if self.scored_reps == 0 {
            return 100;
        }
        let mean = self.accuracy_sum / self.scored_reps as f64;
        mean.round().max(0.0).min(100.0) as u8
    }

    pub fn phase(&self) -> Phase {
        self.classifier.phase()
    }

    pub fn classifier(&self) -> &PhaseClassifier {
        &self.classifier
    }

    /// Zero reps, clear accuracy, force NEUTRAL. Thresholds are kept.
    pub fn reset(&mut self) {
        self.reps = 0;
        self.accuracy_sum = 0.0;
        self.scored_reps = 0;
        self.classifier.reset();
    }
}
