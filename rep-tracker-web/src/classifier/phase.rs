//! Hysteresis phase classifier
//!
//! Turns a stream of joint angles into NEUTRAL/UP/DOWN transitions. Angles
//! between the two bounds fall in a dead zone that keeps the current phase,
//! so jitter around a bare threshold cannot make the phase chatter.
//!
//! ```text
//!   DOWN  <= low - h/2  |  dead zone  |  high + h/2 <= UP
//! ```
//!
//! The classifier only reports transitions. Counting happens in the rep
//! counter, on DOWN -> UP.

use serde::{Deserialize, Serialize};

use super::exercise::ThresholdTable;

/// Position within an exercise cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    Neutral,
    Up,
    Down,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Neutral => "NEUTRAL",
            Phase::Up => "UP",
            Phase::Down => "DOWN",
        }
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Neutral
    }
}

/// A phase change produced by one valid reading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseTransition {
    pub from: Phase,
    pub to: Phase,
    /// Valid frames spent in `from` before this change
    pub dwell_frames: u32,
    /// Minimum angle reached while in DOWN, when leaving DOWN
    pub down_extreme: Option<f32>,
}

impl PhaseTransition {
    /// True exactly for DOWN -> UP
    pub fn completes_rep(&self) -> bool {
        self.from == Phase::Down && self.to == Phase::Up
    }
}

/// Three-state hysteresis machine for one exercise kind
#[derive(Clone, Debug)]
pub struct PhaseClassifier {
    table: ThresholdTable,
    phase: Phase,
    /// Valid frames in the current phase
    dwell_frames: u32,
    /// Lowest angle seen during the current DOWN dwell
    down_min: Option<f32>,
    /// Frames without a usable angle since the last reset
    no_reading_frames: u32,
}

impl PhaseClassifier {
    pub fn new(table: ThresholdTable) -> Self {
        Self {
            table,
            phase: Phase::Neutral,
            dwell_frames: 0,
            down_min: None,
            no_reading_frames: 0,
        }
    }

    /// Feed one frame's angle; `None` is a no-reading frame
    pub fn update(&mut self, angle: Option<f32>) -> Option<PhaseTransition> {
        let theta = match angle {
            Some(theta) if theta.is_finite() => theta,
            _ => {
                self.no_reading_frames = self.no_reading_frames.saturating_add(1);
                return None;
            }
        };

        let target = if theta <= self.table.down_bound() {
            Phase::Down
        } else if theta >= self.table.up_bound() {
            Phase::Up
        } else {
            self.phase
        };

        if target == self.phase {
            self.dwell_frames = self.dwell_frames.saturating_add(1);
            if self.phase == Phase::Down {
                self.down_min = Some(self.down_min.map_or(theta, |m| m.min(theta)));
            }
            return None;
        }

        let transition = PhaseTransition {
            from: self.phase,
            to: target,
            dwell_frames: self.dwell_frames,
            down_extreme: if self.phase == Phase::Down { self.down_min } else { None },
        };

        self.phase = target;
        self.dwell_frames = 1;
        self.down_min = if target == Phase::Down { Some(theta) } else { None };

        log::debug!(
            "phase {} -> {} at {:.1}° after {} frames",
            transition.from.as_str(),
            transition.to.as_str(),
            theta,
            transition.dwell_frames
        );

        Some(transition)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn dwell_frames(&self) -> u32 {
        self.dwell_frames
    }

    pub fn no_reading_frames(&self) -> u32 {
        self.no_reading_frames
    }

    pub fn table(&self) -> &ThresholdTable {
        &self.table
    }

    /// Back to NEUTRAL; the threshold table is kept
    pub fn reset(&mut self) {
        self.phase = Phase::Neutral;
        self.dwell_frames = 0;
        self.down_min = None;
        self.no_reading_frames = 0;
    }
}
