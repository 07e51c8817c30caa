//! Toast Notification
//!
//! Short-lived confirmation bubble appended to the page body.

use gloo_timers::callback::Timeout;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement};

/// How long a toast stays on screen
pub const TOAST_MS: u32 = 1800;

const TOAST_STYLE: [(&str, &str); 11] = [
    ("position", "fixed"),
    ("bottom", "24px"),
    ("left", "50%"),
    ("transform", "translateX(-50%)"),
    ("background", "#1b2028"),
    ("color", "#dbe7f4"),
    ("padding", "10px 14px"),
    ("border", "1px solid #2b3340"),
    ("border-radius", "10px"),
    ("box-shadow", "0 10px 30px rgba(0,0,0,.35)"),
    ("z-index", "1000"),
];

/// Show `message` and remove it after [`TOAST_MS`]
pub fn show(document: &Document, message: &str) -> Result<(), JsValue> {
    let el = document
        .create_element("div")?
        .dyn_into::<HtmlElement>()
        .map_err(JsValue::from)?;
    el.set_text_content(Some(message));

    let style = el.style();
    for (name, value) in TOAST_STYLE {
        style.set_property(name, value)?;
    }

    document
        .body()
        .ok_or_else(|| JsValue::from_str("document has no body"))?
        .append_child(&el)?;

    Timeout::new(TOAST_MS, move || el.remove()).forget();
    Ok(())
}
