//! Errors raised while setting a session up
//!
//! The per-frame path never fails; only configuration and values decoded
//! from JavaScript can be rejected.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to decode {what} from JavaScript: {message}")]
    Decode { what: &'static str, message: String },

    #[error("landmark buffer length {len} is not a multiple of {stride}")]
    LandmarkBuffer { len: usize, stride: usize },
}

impl From<EngineError> for JsValue {
    fn from(err: EngineError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
