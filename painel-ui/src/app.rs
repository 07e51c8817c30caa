//! Dashboard Page Wiring
//!
//! Builds the page's single [`Dashboard`], runs the initial network load and
//! binds the refresh button and file picker.

use painel_core::{ids, Dashboard, LoadOrigin};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{console, Document, Event, HtmlElement, HtmlInputElement};

use crate::charts::CanvasCharts;
use crate::dom::DomTarget;
use crate::loader;

/// Dashboard bound to the live page
pub type PageDashboard = Dashboard<DomTarget, CanvasCharts>;

/// Shared handle used by event callbacks
pub type SharedDashboard = Rc<RefCell<PageDashboard>>;

/// True when the page carries the dashboard's elements
pub fn is_dashboard_page(document: &Document) -> bool {
    document.get_element_by_id(ids::KPI_IMPRESSIONS).is_some()
}

/// Create the dashboard and start loading
pub fn start(document: &Document) -> Result<SharedDashboard, JsValue> {
    let dashboard = Rc::new(RefCell::new(Dashboard::new(
        DomTarget::new(document.clone()),
        CanvasCharts::new(document.clone()),
    )));

    load_from_network(Rc::clone(&dashboard), loader::document_source());
    bind_refresh_button(document)?;
    bind_file_picker(document, Rc::clone(&dashboard))?;

    Ok(dashboard)
}

/// Fetch `source` and apply it when it arrives
pub fn load_from_network(dashboard: SharedDashboard, source: String) {
    let ticket = dashboard.borrow_mut().begin_load();
    spawn_local(async move {
        let outcome = loader::fetch_document(&source).await;
        if let Err(e) = dashboard
            .borrow_mut()
            .finish_load(ticket, outcome, LoadOrigin::Network)
        {
            console::error_1(&format!("Loading {} failed: {}", source, e).into());
        }
    });
}

/// The visible refresh button opens the hidden file input
fn bind_refresh_button(document: &Document) -> Result<(), JsValue> {
    let Some(button) = document.get_element_by_id(ids::REFRESH_BUTTON) else {
        console::warn_1(&format!("#{} not found", ids::REFRESH_BUTTON).into());
        return Ok(());
    };

    let doc = document.clone();
    let on_click = Closure::wrap(Box::new(move |_: Event| {
        if let Some(picker) = doc
            .get_element_by_id(ids::FILE_PICKER)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        {
            picker.click();
        }
    }) as Box<dyn FnMut(Event)>);

    button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
    on_click.forget();
    Ok(())
}

fn bind_file_picker(document: &Document, dashboard: SharedDashboard) -> Result<(), JsValue> {
    let Some(picker) = document
        .get_element_by_id(ids::FILE_PICKER)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    else {
        console::warn_1(&format!("#{} not found", ids::FILE_PICKER).into());
        return Ok(());
    };

    let input = picker.clone();
    let on_change = Closure::wrap(Box::new(move |_: Event| {
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };

        let ticket = dashboard.borrow_mut().begin_load();
        let dashboard = Rc::clone(&dashboard);
        let started = loader::read_file(&file, move |outcome| {
            let _ = dashboard
                .borrow_mut()
                .finish_load(ticket, outcome, LoadOrigin::LocalFile);
        });
        if let Err(e) = started {
            console::error_1(&format!("Reading {} failed: {}", file.name(), e).into());
        }

        // picking the same file again must fire another change event
        input.set_value("");
    }) as Box<dyn FnMut(Event)>);

    picker.add_event_listener_with_callback("change", on_change.as_ref().unchecked_ref())?;
    on_change.forget();
    Ok(())
}
