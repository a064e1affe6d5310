// Ambient particle background for a portfolio page: drifting points on a
// full-viewport canvas, linked by faint lines when they get close.

mod utils;

pub mod color;
pub mod config;
pub mod driver;
pub mod error;
pub mod field;
pub mod particle;
pub mod renderer;

use wasm_bindgen::prelude::*;

pub use crate::config::FieldConfig;
pub use crate::driver::ParticleBackground;
pub use crate::error::FieldError;
pub use crate::field::{FieldStats, ParticleField};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

// Resolves to undefined when the page has no usable canvas with that id
#[wasm_bindgen]
pub fn start_particle_background(canvas_id: &str) -> Result<Option<ParticleBackground>, JsValue> {
    Ok(driver::start(canvas_id, FieldConfig::default())?)
}

// Same as above with a JSON object overriding any of the FieldConfig defaults,
// e.g. `{ "wide_divisor": 12000, "accent": "#f97316" }`
#[wasm_bindgen]
pub fn start_particle_background_with_config(
    canvas_id: &str,
    config_json: &str,
) -> Result<Option<ParticleBackground>, JsValue> {
    let config = FieldConfig::from_json(config_json)?;
    Ok(driver::start(canvas_id, config)?)
}
