//! Error type for setting up the particle background.
//!
//! Only failures a page author can fix surface here. A missing canvas or a
//! browser without 2D canvas support is not an error, the background just
//! stays blank.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("no global window")]
    NoWindow,

    #[error("window has no document")]
    NoDocument,

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// An exception thrown by a browser API.
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for FieldError {
    fn from(value: JsValue) -> Self {
        FieldError::Js(
            value
                .as_string()
                .unwrap_or_else(|| format!("{:?}", value)),
        )
    }
}

impl From<FieldError> for JsValue {
    fn from(error: FieldError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}
