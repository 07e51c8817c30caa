//! Document Loaders
//!
//! The two ways a metrics document reaches the page: an HTTP fetch of a
//! relative path, or a file the user picks from disk.

use gloo_net::http::Request;
use painel_core::{LoadError, DEFAULT_DOCUMENT};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{File, FileReader};

/// Local storage key overriding the document path
pub const SOURCE_STORAGE_KEY: &str = "painel_document";

/// Get the document path from local storage or use the default
pub fn document_source() -> String {
    web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(SOURCE_STORAGE_KEY).ok().flatten())
        .filter(|source| !source.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DOCUMENT.to_string())
}

/// Append a `t=<millis>` query parameter so caches never answer
pub fn cache_busted(source: &str, now_ms: f64) -> String {
    let separator = if source.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", source, separator, now_ms as u64)
}

/// Fetch a document body as text
///
/// Non-success statuses are errors; the body is not parsed here.
pub async fn fetch_document(source: &str) -> Result<String, LoadError> {
    let url = cache_busted(source, js_sys::Date::now());

    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(LoadError::Http {
            source_name: source.to_string(),
            status: response.status(),
        });
    }

    response
        .text()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))
}

/// Read a picked file as UTF-8 text and hand the outcome to `on_done`
pub fn read_file<F>(file: &File, on_done: F) -> Result<(), LoadError>
where
    F: FnOnce(Result<String, LoadError>) + 'static,
{
    let reader = FileReader::new().map_err(|e| LoadError::Read(format!("{:?}", e)))?;

    // onload and onerror share one callback; whichever fires first takes it
    let callback = Rc::new(RefCell::new(Some(on_done)));

    let onload = {
        let reader = reader.clone();
        let callback = Rc::clone(&callback);
        Closure::once_into_js(move |_: web_sys::Event| {
            let outcome = reader
                .result()
                .ok()
                .and_then(|value| value.as_string())
                .ok_or_else(|| LoadError::Read("file content is not text".to_string()));
            if let Some(done) = callback.borrow_mut().take() {
                done(outcome);
            }
        })
    };

    let onerror = {
        let reader = reader.clone();
        let callback = Rc::clone(&callback);
        Closure::once_into_js(move |_: web_sys::Event| {
            let message = reader
                .error()
                .map(|e| e.message())
                .unwrap_or_else(|| "unknown read error".to_string());
            if let Some(done) = callback.borrow_mut().take() {
                done(Err(LoadError::Read(message)));
            }
        })
    };

    reader.set_onload(Some(onload.unchecked_ref()));
    reader.set_onerror(Some(onerror.unchecked_ref()));

    reader
        .read_as_text_with_label(file, "utf-8")
        .map_err(|e| LoadError::Read(format!("{:?}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_busted() {
        assert_eq!(
            cache_busted("dados_oraculares.json", 1_714_000_000_123.0),
            "dados_oraculares.json?t=1714000000123"
        );
        assert_eq!(cache_busted("data.json?v=2", 5.0), "data.json?v=2&t=5");
    }
}
