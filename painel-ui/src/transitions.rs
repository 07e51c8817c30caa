//! Portal Link Transitions
//!
//! Binds every `a[data-portal]` link so a click fades the page to black
//! before navigating.

use gloo_timers::callback::Timeout;
use painel_core::transition::{OVERLAY_ID, OVERLAY_STYLE, PORTAL_SELECTOR};
use painel_core::{OverlapPolicy, Transition, TransitionGate};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, Document, Element, Event, HtmlElement};

/// Create the overlay and bind all portal links; returns the link count
pub fn install(document: &Document, policy: OverlapPolicy) -> Result<u32, JsValue> {
    let overlay = create_overlay(document)?;
    let gate = TransitionGate::new(policy);

    let links = document.query_selector_all(PORTAL_SELECTOR)?;
    for i in 0..links.length() {
        let Some(node) = links.item(i) else {
            continue;
        };
        let link = node.dyn_into::<Element>().map_err(JsValue::from)?;
        bind(&link, overlay.clone(), gate.clone(), WindowLocation)?;
    }

    Ok(links.length())
}

fn create_overlay(document: &Document) -> Result<HtmlElement, JsValue> {
    let overlay = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)?;
    overlay.set_id(OVERLAY_ID);

    let style = overlay.style();
    for (name, value) in OVERLAY_STYLE {
        style.set_property(name, value)?;
    }

    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&overlay)?;
    Ok(overlay)
}

/// Where a finished transition sends the browser
pub trait Navigate: Clone + 'static {
    fn navigate(&self, destination: &str) -> Result<(), JsValue>;
}

/// Navigates by assigning `window.location.href`
#[derive(Clone, Copy, Debug, Default)]
pub struct WindowLocation;

impl Navigate for WindowLocation {
    fn navigate(&self, destination: &str) -> Result<(), JsValue> {
        web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))?
            .location()
            .set_href(destination)
    }
}

fn bind<N: Navigate>(
    link: &Element,
    overlay: HtmlElement,
    gate: TransitionGate,
    navigator: N,
) -> Result<(), JsValue> {
    let anchor = link.clone();
    let on_click = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();

        let destination = anchor.get_attribute("href").unwrap_or_default();
        let portal = anchor.get_attribute("data-portal").unwrap_or_default();

        let Some(transition) = gate.try_begin(portal, destination) else {
            return;
        };
        if let Err(e) = run(&overlay, &transition, gate.clone(), navigator.clone()) {
            console::error_2(&"Transition failed:".into(), &e);
        }
    }) as Box<dyn FnMut(Event)>);

    link.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

/// Activate the overlay now, navigate once the fade is done
fn run<N: Navigate>(
    overlay: &HtmlElement,
    transition: &Transition,
    gate: TransitionGate,
    navigator: N,
) -> Result<(), JsValue> {
    let style = overlay.style();
    for (name, value) in transition.overlay_style() {
        style.set_property(name, value)?;
    }

    let destination = transition.destination.clone();
    Timeout::new(transition.delay_ms(), move || {
        gate.complete();
        if let Err(e) = navigator.navigate(&destination) {
            console::error_2(&"Navigation failed:".into(), &e);
        }
    })
    .forget();

    console::log_1(&transition.log_line().into());
    Ok(())
}
