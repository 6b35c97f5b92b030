//! Session configuration
//!
//! Every field has a default, so `{}` is a complete configuration. Values
//! arrive as JSON or as a plain JS object and are validated before a session
//! is built from them.

use serde::{Deserialize, Serialize};

use crate::classifier::{ExerciseKind, ThresholdTable};
use crate::error::EngineError;
use crate::physics::DEFAULT_CONFIDENCE_FLOOR;
use crate::tracking::LockConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Landmarks below this confidence are treated as missing
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f32,
    /// Largest descriptor distance still treated as the locked person
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,
    /// Unmatched frames before a lock is reported lost
    #[serde(default = "default_lock_patience")]
    pub lock_patience: u32,
    #[serde(default = "default_centroid_weight")]
    pub centroid_weight: f32,
    #[serde(default = "default_size_weight")]
    pub size_weight: f32,
    #[serde(default)]
    pub targets: SessionTargets,
    /// Replaces the exercise kind's built-in table when present
    #[serde(default)]
    pub thresholds: Option<ThresholdTable>,
}

/// Set/rep/rest targets from the exercise catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTargets {
    #[serde(default = "default_target_reps")]
    pub target_reps: u32,
    #[serde(default = "default_target_sets")]
    pub target_sets: u32,
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
}

fn default_confidence_floor() -> f32 { DEFAULT_CONFIDENCE_FLOOR }
fn default_match_threshold() -> f32 { 0.25 }
fn default_lock_patience() -> u32 { 30 }
fn default_centroid_weight() -> f32 { 0.7 }
fn default_size_weight() -> f32 { 0.3 }
fn default_target_reps() -> u32 { 10 }
fn default_target_sets() -> u32 { 3 }
fn default_rest_seconds() -> u32 { 30 }

impl Default for SessionTargets {
    fn default() -> Self {
        Self {
            target_reps: default_target_reps(),
            target_sets: default_target_sets(),
            rest_seconds: default_rest_seconds(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_floor: default_confidence_floor(),
            match_threshold: default_match_threshold(),
            lock_patience: default_lock_patience(),
            centroid_weight: default_centroid_weight(),
            size_weight: default_size_weight(),
            targets: SessionTargets::default(),
            thresholds: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            return Err(EngineError::InvalidConfig(format!(
                "confidenceFloor must be within [0, 1], got {}",
                self.confidence_floor
            )));
        }
        if !(self.match_threshold.is_finite() && self.match_threshold > 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "matchThreshold must be positive, got {}",
                self.match_threshold
            )));
        }
        if self.lock_patience == 0 {
            return Err(EngineError::InvalidConfig("lockPatience must be at least 1".to_string()));
        }
        let weights_ok = [self.centroid_weight, self.size_weight]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        if !weights_ok || self.centroid_weight + self.size_weight <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "centroidWeight and sizeWeight must be non-negative and not both zero".to_string(),
            ));
        }
        if self.targets.target_reps == 0 || self.targets.target_sets == 0 {
            return Err(EngineError::InvalidConfig(
                "targetReps and targetSets must be at least 1".to_string(),
            ));
        }
        if let Some(table) = &self.thresholds {
            table.validate()?;
        }
        Ok(())
    }

    pub fn lock_config(&self) -> LockConfig {
        LockConfig {
            match_threshold: self.match_threshold,
            patience: self.lock_patience,
            centroid_weight: self.centroid_weight,
            size_weight: self.size_weight,
            confidence_floor: self.confidence_floor,
        }
    }

    /// Threshold table for `kind`, honouring an override
    pub fn thresholds_for(&self, kind: ExerciseKind) -> ThresholdTable {
        self.thresholds.unwrap_or_else(|| kind.thresholds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.targets.target_reps, 10);
        assert_eq!(config.lock_patience, 30);
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json(
            r#"{ "lockPatience": 15, "targets": { "targetReps": 12, "restSeconds": 45 } }"#,
        )
        .unwrap();
        assert_eq!(config.lock_patience, 15);
        assert_eq!(config.targets.target_reps, 12);
        assert_eq!(config.targets.target_sets, 3);
        assert_eq!(config.targets.rest_seconds, 45);
    }

    #[test]
    fn test_threshold_override() {
        let config = EngineConfig::from_json(
            r#"{ "thresholds": { "lowDeg": 95, "highDeg": 150, "hysteresisDeg": 6, "idealDepth": 85, "scale": 1.0 } }"#,
        )
        .unwrap();
        let table = config.thresholds_for(ExerciseKind::Squat);
        assert_eq!(table.low_deg, 95.0);
        assert_eq!(table.severe_deg, 15.0);
        assert_eq!(EngineConfig::default().thresholds_for(ExerciseKind::Squat).low_deg, 90.0);
    }

    #[test]
    fn test_lock_config_follows_engine_defaults() {
        let lock = LockConfig::default();
        assert_eq!(lock, EngineConfig::default().lock_config());
        assert_eq!(lock.match_threshold, 0.25);
        assert_eq!(lock.patience, 30);
        assert_eq!((lock.centroid_weight, lock.size_weight), (0.7, 0.3));
        assert_eq!(lock.confidence_floor, DEFAULT_CONFIDENCE_FLOOR);

        let tuned = EngineConfig::from_json(r#"{ "lockPatience": 12, "matchThreshold": 0.4 }"#).unwrap();
        let lock = tuned.lock_config();
        assert_eq!((lock.patience, lock.match_threshold), (12, 0.4));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "confidenceFloor": 1.5 }"#),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(EngineConfig::from_json(r#"{ "lockPatience": 0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "targets": { "targetSets": 0 } }"#).is_err());
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(EngineError::ConfigParse(_))
        ));
    }
}
