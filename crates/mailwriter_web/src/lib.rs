//! Content-script entry point for the mail writer.
//!
//! On wasm32 this crate exports a `#[wasm_bindgen(start)]` function that hooks
//! the engine up to the live page. The embedded settings are target
//! independent so they can be checked natively.
mod settings;

#[cfg(target_arch = "wasm32")]
mod platform;

pub use settings::{embedded_settings, load_settings, EMBEDDED_SETTINGS};
