//! JS-owned workout session
//!
//! Each `RepSession` owns its whole engine state. Starting a new session
//! means constructing a new object; dropping it (or calling `free()` from
//! JS) discards everything.
//!
//! ```javascript
//! const session = new RepSession('squat', JSON.stringify({ targets: { targetReps: 15 } }));
//! pose.onResults((results) => {
//!     const update = session.processFrame(flatten(results), performance.now());
//!     render(update.reps, update.accuracy, update.phase, update.lockState);
//! });
//! setInterval(() => session.tick(), 1000);
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::landmarks::decode_frame_lossy;
use crate::classifier::ExerciseKind;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::pose::PersonDescriptor;
use crate::session::WorkoutSession;

#[wasm_bindgen]
pub struct RepSession {
    inner: WorkoutSession,
}

#[wasm_bindgen]
impl RepSession {
    /// `exercise` is the catalog's `trackAs` value; `config_json` is an
    /// optional JSON `EngineConfig`
    #[wasm_bindgen(constructor)]
    pub fn new(exercise: &str, config_json: Option<String>) -> Result<RepSession, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => EngineConfig::from_json(json)?,
            _ => EngineConfig::default(),
        };
        Ok(Self::build(exercise, &config))
    }

    /// Same as the constructor, with the configuration as a plain JS object
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(exercise: &str, config: JsValue) -> Result<RepSession, JsValue> {
        let config: EngineConfig = serde_wasm_bindgen::from_value(config).map_err(|e| {
            EngineError::Decode { what: "configuration", message: e.to_string() }
        })?;
        config.validate()?;
        Ok(Self::build(exercise, &config))
    }

    /// Process one MediaPipe result (flat `persons × 33 × 4` buffer).
    ///
    /// Returns the session update as a JS object.
    #[wasm_bindgen(js_name = processFrame)]
    pub fn process_frame(&mut self, data: &[f32], timestamp_ms: Option<f64>) -> JsValue {
        let frame = decode_frame_lossy(data, timestamp_ms.unwrap_or_else(now_ms));
        let update = self.inner.process_frame(&frame);
        to_js(&update)
    }

    /// Call once per second; returns a sequencer event or null
    pub fn tick(&mut self) -> JsValue {
        match self.inner.tick() {
            Some(event) => to_js(&event),
            None => JsValue::NULL,
        }
    }

    /// Restart the running set from zero reps
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Lock onto a descriptor previously read from `lastDescriptor`
    pub fn lock(&mut self, descriptor: JsValue) -> Result<(), JsValue> {
        let descriptor: PersonDescriptor = serde_wasm_bindgen::from_value(descriptor).map_err(|e| {
            EngineError::Decode { what: "person descriptor", message: e.to_string() }
        })?;
        if !descriptor.is_finite() {
            return Err(EngineError::Decode {
                what: "person descriptor",
                message: "values must be finite".to_string(),
            }
            .into());
        }
        self.inner.lock(descriptor);
        Ok(())
    }

    /// Lock onto whoever is most prominent right now; false if nobody was seen yet
    #[wasm_bindgen(js_name = lockCurrent)]
    pub fn lock_current(&mut self) -> bool {
        self.inner.lock_current()
    }

    pub fn unlock(&mut self) {
        self.inner.unlock();
    }

    #[wasm_bindgen(js_name = lastDescriptor)]
    pub fn last_descriptor(&self) -> JsValue {
        match self.inner.engine().last_descriptor() {
            Some(d) => to_js(&d),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = lockState)]
    pub fn lock_state(&self) -> String {
        self.inner.engine().lock_state().as_str().to_string()
    }

    /// Current progress without processing a frame
    pub fn snapshot(&self) -> JsValue {
        to_js(&self.inner.snapshot())
    }

    /// End the session and return the summary record for persistence
    pub fn finish(&mut self) -> JsValue {
        to_js(&self.inner.finish())
    }

    #[wasm_bindgen(js_name = isResting)]
    pub fn is_resting(&self) -> bool {
        self.inner.sequencer().is_resting()
    }

    #[wasm_bindgen(getter)]
    pub fn exercise(&self) -> String {
        self.inner.engine().kind().as_str().to_string()
    }
}

impl RepSession {
    fn build(exercise: &str, config: &EngineConfig) -> Self {
        let kind = ExerciseKind::from_track_as(exercise);
        Self {
            inner: WorkoutSession::new(kind, config),
        }
    }
}

/// Plain JS object for `value`.
///
/// `SessionUpdate` flattens the frame output, which serde emits as a map;
/// the default serializer would turn that into an ES `Map`.
fn to_js<T: Serialize>(value: &T) -> JsValue {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

/// Page clock in ms, 0 outside a browser
fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
