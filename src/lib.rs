//! # studio-auth
//!
//! Leptos + WASM authentication layer for the studio frontend.
//!
//! This crate contains the auth backend client, the session state machine,
//! the popup login handshake, and the small UI surface built on top of them
//! (auth provider, notices, and the insufficient-credits dialog).
//!
//! Everything except the browser wiring compiles natively so the session
//! lifecycle can be driven from tests with a mocked backend.

pub mod app;
pub mod components;
pub mod config;
pub mod error;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Install the browser panic hook and route `tracing` records to the console.
#[cfg(feature = "hydrate")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// WASM entry point: hydrate the server-rendered body with [`app::App`].
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    init_logging();
    leptos::mount::hydrate_body(app::App);
}
