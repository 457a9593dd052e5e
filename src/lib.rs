//! # potluck-client
//!
//! Leptos + WASM frontend for the Potluck recipe-sharing application.
//!
//! The core of this crate is the client-side session/authentication
//! coordination layer: a dependency-injected session store (`state::auth`)
//! fed by an identity-provider adapter (`net::provider`), consumed by the
//! authenticated request pipeline (`net::api`) and the route guard
//! (`util::guard`). Recipe and group calls are mechanical passthrough over
//! the same pipeline.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// Client-side entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
