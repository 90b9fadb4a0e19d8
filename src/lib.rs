//! Particle field and entrance timeline for an animated portfolio splash.
//!
//! The engine is headless: it simulates particles, resolves a declarative
//! stage table and runs the splash state machine against a caller-supplied
//! clock, talking to the outside world only through [`surface::RenderSurface`]
//! and [`surface::HostSurface`]. The `web` feature binds it to a browser canvas
//! and page.

#[cfg(feature = "web")]
use wasm_bindgen::prelude::*;

pub mod easing;
pub mod lock;
pub mod particles;
pub mod quality;
pub mod reveal;
pub mod sequencer;
pub mod splash;
pub mod surface;
pub mod timeline;
pub mod visuals;

#[cfg(feature = "web")]
pub mod web;

pub use splash::{SplashConfig, SplashError, SplashScreen};

/// Installs the panic hook so panics show up in the browser console.
#[cfg(feature = "web")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}
