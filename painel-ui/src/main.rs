//! Painel Dashboard
//!
//! Page scripts for the Painel site, compiled to WebAssembly.
//!
//! # Features
//!
//! - Portal transitions: `a[data-portal]` links fade the page out before
//!   navigating
//! - Metrics dashboard: KPIs, deltas, a countries table and two charts
//!   rendered from `dados_oraculares.json` or a locally picked file
//!
//! # Architecture
//!
//! All formatting and render sequencing lives in `painel-core`; this crate
//! only binds it to the DOM, the canvas and the browser's fetch/file APIs.
//! Both features start on `DOMContentLoaded` and are independent of each
//! other.

use painel_core::OverlapPolicy;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, Document};

mod app;
mod charts;
mod dom;
mod loader;
mod toast;
mod transitions;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    if let Err(e) = when_ready(|document| {
        if let Err(e) = boot(&document) {
            console::error_2(&"Painel failed to start:".into(), &e);
        }
    }) {
        console::error_1(&e);
    }
}

fn boot(document: &Document) -> Result<(), JsValue> {
    transitions::install(document, OverlapPolicy::default())?;

    if app::is_dashboard_page(document) {
        // the page keeps the dashboard alive through its event callbacks
        app::start(document)?;
    }
    Ok(())
}

/// Run `f` once the DOM is parsed
fn when_ready<F>(f: F) -> Result<(), JsValue>
where
    F: FnOnce(Document) + 'static,
{
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;

    if document.ready_state() != "loading" {
        f(document);
        return Ok(());
    }

    let doc = document.clone();
    let on_ready = Closure::once_into_js(move || f(doc));
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
}
