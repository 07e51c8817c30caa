//! DOM Render Target
//!
//! Writes dashboard texts and table rows into the host page's elements.

use painel_core::{CountryRow, RenderTarget};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{console, Document, Element, HtmlElement};

use crate::toast;

/// [`RenderTarget`] backed by the live document
pub struct DomTarget {
    document: Document,
}

impl DomTarget {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<Element> {
        let el = self.document.get_element_by_id(id);
        if el.is_none() {
            console::warn_1(&format!("Element #{} not found", id).into());
        }
        el
    }

    fn build_row(&self, row: &CountryRow) -> Result<Element, JsValue> {
        let tr = self.document.create_element("tr")?;
        for cell in row.cells() {
            let td = self.document.create_element("td")?;
            td.set_text_content(Some(cell));
            tr.append_child(&td)?;
        }
        Ok(tr)
    }
}

impl RenderTarget for DomTarget {
    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            match el.dyn_into::<HtmlElement>() {
                Ok(el) => el.set_inner_text(text),
                Err(el) => el.set_text_content(Some(text)),
            }
        }
    }

    fn replace_rows(&mut self, id: &str, rows: &[CountryRow]) {
        let Some(body) = self.element(id) else {
            return;
        };

        body.set_inner_html("");
        for row in rows {
            let appended = self
                .build_row(row)
                .and_then(|tr| body.append_child(&tr).map(|_| ()));
            if let Err(e) = appended {
                console::error_2(&"Failed to append row:".into(), &e);
                return;
            }
        }
    }

    fn alert(&mut self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn toast(&mut self, message: &str) {
        if let Err(e) = toast::show(&self.document, message) {
            console::error_2(&"Toast failed:".into(), &e);
        }
    }

    fn log(&mut self, message: &str) {
        console::log_1(&message.into());
    }
}
