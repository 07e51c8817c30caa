//! Dashboard Controller
//!
//! Owns the current document and the two chart slots, and runs the render
//! pass through two seams: [`RenderTarget`] for page text, tables and
//! dialogs, and [`ChartBackend`] for chart instances.
//!
//! There is one `Dashboard` per page. Loads are never cancelled; when two
//! overlap, the one that completes last is what stays on screen.

use thiserror::Error;

use crate::document::{DocumentError, MetricsDocument};
use crate::format::NumberLocale;
use crate::view::{ids, CountryRow, DashboardView, DonutChartSpec, LineChartSpec};

/// Toast shown after a successful local file load
pub const LOCAL_FILE_LOADED: &str = "Base atualizada a partir do arquivo local.";

/// Alert shown when a picked file is not a usable document
pub const LOCAL_FILE_INVALID: &str =
    "Arquivo inválido. Certifique-se de que é um JSON compatível.";

/// Errors from either load path
#[derive(Error, Debug)]
pub enum LoadError {
    /// Server answered with a non-success status
    #[error("Falha ao carregar {source_name} (HTTP {status})")]
    Http { source_name: String, status: u16 },

    /// Request never produced a response
    #[error("Network error: {0}")]
    Network(String),

    /// Local file could not be read
    #[error("Read error: {0}")]
    Read(String),

    /// Body or file was not a valid document
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Chart construction failures
#[derive(Error, Debug)]
pub enum ChartError {
    /// Canvas element missing from the page
    #[error("Canvas not found: {0}")]
    Canvas(String),

    /// Canvas exists but no 2d context could be obtained
    #[error("No 2d context for canvas {0}")]
    Context(String),
}

/// Where a document came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Fetched over HTTP
    Network,
    /// Picked by the user from disk
    LocalFile,
}

/// Page surface the render pass writes to
pub trait RenderTarget {
    /// Replace the visible text of an element
    fn set_text(&mut self, id: &str, text: &str);

    /// Clear a table body and append one row per entry, in order
    fn replace_rows(&mut self, id: &str, rows: &[CountryRow]);

    /// Blocking error dialog
    fn alert(&mut self, message: &str);

    /// Transient, non-blocking confirmation
    fn toast(&mut self, message: &str);

    /// Diagnostic line
    fn log(&mut self, _message: &str) {}
}

/// Chart library seam
pub trait ChartBackend {
    /// Live chart instance bound to one canvas
    type Handle;

    fn line(&mut self, canvas_id: &str, spec: &LineChartSpec) -> Result<Self::Handle, ChartError>;

    fn donut(&mut self, canvas_id: &str, spec: &DonutChartSpec)
        -> Result<Self::Handle, ChartError>;

    /// Tear down an instance and release its canvas
    fn destroy(&mut self, handle: Self::Handle);
}

/// Identifies one load attempt; tickets are handed out in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Dashboard state for one page
pub struct Dashboard<T: RenderTarget, C: ChartBackend> {
    target: T,
    charts: C,
    locale: NumberLocale,
    document: Option<MetricsDocument>,
    line_chart: Option<C::Handle>,
    donut_chart: Option<C::Handle>,
    issued: u64,
    last_applied: Option<LoadTicket>,
}

impl<T: RenderTarget, C: ChartBackend> Dashboard<T, C> {
    pub fn new(target: T, charts: C) -> Self {
        Self::with_locale(target, charts, NumberLocale::default())
    }

    pub fn with_locale(target: T, charts: C, locale: NumberLocale) -> Self {
        Self {
            target,
            charts,
            locale,
            document: None,
            line_chart: None,
            donut_chart: None,
            issued: 0,
            last_applied: None,
        }
    }

    /// Document currently on screen
    pub fn document(&self) -> Option<&MetricsDocument> {
        self.document.as_ref()
    }

    pub fn has_line_chart(&self) -> bool {
        self.line_chart.is_some()
    }

    pub fn has_donut_chart(&self) -> bool {
        self.donut_chart.is_some()
    }

    pub fn locale(&self) -> &NumberLocale {
        &self.locale
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn charts(&self) -> &C {
        &self.charts
    }

    /// Ticket of the most recent load that replaced the document
    pub fn last_applied(&self) -> Option<LoadTicket> {
        self.last_applied
    }

    /// Reserve a ticket before starting an asynchronous load
    pub fn begin_load(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Apply the outcome of a load started with [`Dashboard::begin_load`]
    ///
    /// Completions are applied in arrival order, so an older ticket that
    /// finishes late still replaces the document.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: Result<String, LoadError>,
        origin: LoadOrigin,
    ) -> Result<(), LoadError> {
        if let Some(last) = self.last_applied {
            if ticket < last {
                self.target.log(&format!(
                    "load #{} completed after #{}; replacing newer document",
                    ticket.id(),
                    last.id()
                ));
            }
        }

        let result = outcome.and_then(|text| self.load_text(&text, origin));
        match (&result, origin) {
            (Ok(()), _) => self.last_applied = Some(ticket),
            (Err(e), LoadOrigin::Network) => self.report_failure(e),
            // invalid documents were already alerted by load_text
            (Err(LoadError::Document(_)), LoadOrigin::LocalFile) => {}
            (Err(e), LoadOrigin::LocalFile) => {
                self.target.log(&format!("local file: {}", e));
                self.target.alert(LOCAL_FILE_INVALID);
            }
        }
        result
    }

    /// Parse text and, when valid, replace the current document and render
    ///
    /// Invalid local files raise the local-file alert here. Network failures
    /// are left to the caller so they can be reported with their cause.
    pub fn load_text(&mut self, text: &str, origin: LoadOrigin) -> Result<(), LoadError> {
        match MetricsDocument::from_json(text) {
            Ok(doc) => {
                self.replace_document(doc);
                if origin == LoadOrigin::LocalFile {
                    self.target.toast(LOCAL_FILE_LOADED);
                }
                Ok(())
            }
            Err(e) => {
                self.target.log(&format!("rejected document: {}", e));
                if origin == LoadOrigin::LocalFile {
                    self.target.alert(LOCAL_FILE_INVALID);
                }
                Err(e.into())
            }
        }
    }

    /// Blocking alert for a failed network load
    pub fn report_failure(&mut self, err: &LoadError) {
        self.target
            .alert(&format!("Erro ao carregar base: {}", err));
    }

    /// Store a new document and redraw everything from it
    pub fn replace_document(&mut self, doc: MetricsDocument) {
        self.document = Some(doc);
        self.render();
    }

    /// Full synchronous render pass over the current document
    pub fn render(&mut self) {
        let view = match &self.document {
            Some(doc) => DashboardView::derive(doc, &self.locale),
            None => return,
        };

        for (id, text) in &view.texts {
            self.target.set_text(id, text);
        }

        self.draw_line(&view.line);
        self.draw_donut(&view.donut);

        self.target.replace_rows(ids::COUNTRIES_BODY, &view.countries);
    }

    fn draw_line(&mut self, spec: &LineChartSpec) {
        if let Some(old) = self.line_chart.take() {
            self.charts.destroy(old);
        }
        match self.charts.line(ids::LINE_CANVAS, spec) {
            Ok(handle) => self.line_chart = Some(handle),
            Err(e) => self.target.log(&format!("line chart: {}", e)),
        }
    }

    fn draw_donut(&mut self, spec: &DonutChartSpec) {
        if let Some(old) = self.donut_chart.take() {
            self.charts.destroy(old);
        }
        match self.charts.donut(ids::DONUT_CANVAS, spec) {
            Ok(handle) => self.donut_chart = Some(handle),
            Err(e) => self.target.log(&format!("donut chart: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::SAMPLE;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingTarget {
        texts: HashMap<String, String>,
        rows: Vec<CountryRow>,
        table_rebuilds: usize,
        alerts: Vec<String>,
        toasts: Vec<String>,
        logs: Vec<String>,
    }

    impl RenderTarget for RecordingTarget {
        fn set_text(&mut self, id: &str, text: &str) {
            self.texts.insert(id.to_string(), text.to_string());
        }

        fn replace_rows(&mut self, _id: &str, rows: &[CountryRow]) {
            self.rows = rows.to_vec();
            self.table_rebuilds += 1;
        }

        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }

        fn toast(&mut self, message: &str) {
            self.toasts.push(message.to_string());
        }

        fn log(&mut self, message: &str) {
            self.logs.push(message.to_string());
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Created(u32, &'static str),
        Destroyed(u32),
    }

    #[derive(Default)]
    struct RecordingCharts {
        next: u32,
        live: Vec<u32>,
        events: Vec<Event>,
        fail_donut: bool,
    }

    impl ChartBackend for RecordingCharts {
        type Handle = u32;

        fn line(&mut self, _canvas: &str, _spec: &LineChartSpec) -> Result<u32, ChartError> {
            self.next += 1;
            self.live.push(self.next);
            self.events.push(Event::Created(self.next, "line"));
            Ok(self.next)
        }

        fn donut(&mut self, canvas: &str, _spec: &DonutChartSpec) -> Result<u32, ChartError> {
            if self.fail_donut {
                return Err(ChartError::Canvas(canvas.to_string()));
            }
            self.next += 1;
            self.live.push(self.next);
            self.events.push(Event::Created(self.next, "donut"));
            Ok(self.next)
        }

        fn destroy(&mut self, handle: u32) {
            self.live.retain(|h| *h != handle);
            self.events.push(Event::Destroyed(handle));
        }
    }

    fn dashboard() -> Dashboard<RecordingTarget, RecordingCharts> {
        Dashboard::new(RecordingTarget::default(), RecordingCharts::default())
    }

    #[test]
    fn test_render_without_document_is_noop() {
        let mut dash = dashboard();
        dash.render();

        assert!(dash.target().texts.is_empty());
        assert!(dash.charts().events.is_empty());
    }

    #[test]
    fn test_network_load_renders_everything() {
        let mut dash = dashboard();
        dash.load_text(SAMPLE, LoadOrigin::Network).unwrap();

        let target = dash.target();
        assert_eq!(target.texts[ids::KPI_IMPRESSIONS], "12.345");
        assert_eq!(target.texts[ids::DELTA_CTR], "+0,3 pp");
        assert_eq!(target.rows.len(), 3);
        assert!(target.toasts.is_empty());
        assert!(dash.has_line_chart());
        assert!(dash.has_donut_chart());
    }

    #[test]
    fn test_rows_match_country_count() {
        let mut dash = dashboard();
        let five = SAMPLE.replace(
            r#"{ "pais": "US", "impressoes": 345, "cliques": 8, "ctr_pct": 2.3 }"#,
            r#"{ "pais": "US", "impressoes": 345, "cliques": 8, "ctr_pct": 2.3 },
               { "pais": "AR", "impressoes": 30, "cliques": 1, "ctr_pct": 3.3 },
               { "pais": "MX", "impressoes": 20, "cliques": 0, "ctr_pct": 0.0 }"#,
        );
        dash.load_text(&five, LoadOrigin::Network).unwrap();

        let names: Vec<_> = dash.target().rows.iter().map(|r| r.name.clone()).collect();
        assert_eq!(names, ["BR", "PT", "US", "AR", "MX"]);

        // a smaller document shrinks the table instead of appending
        dash.load_text(SAMPLE, LoadOrigin::Network).unwrap();
        assert_eq!(dash.target().rows.len(), 3);
        assert_eq!(dash.target().table_rebuilds, 2);
    }

    #[test]
    fn test_rerender_destroys_before_create() {
        let mut dash = dashboard();
        dash.load_text(SAMPLE, LoadOrigin::Network).unwrap();
        dash.load_text(SAMPLE, LoadOrigin::Network).unwrap();
        dash.render();

        let charts = dash.charts();
        assert_eq!(charts.live.len(), 2, "only one line and one donut alive");
        assert_eq!(
            charts.events,
            vec![
                Event::Created(1, "line"),
                Event::Created(2, "donut"),
                Event::Destroyed(1),
                Event::Created(3, "line"),
                Event::Destroyed(2),
                Event::Created(4, "donut"),
                Event::Destroyed(3),
                Event::Created(5, "line"),
                Event::Destroyed(4),
                Event::Created(6, "donut"),
            ]
        );
    }

    #[test]
    fn test_local_file_success_toasts() {
        let mut dash = dashboard();
        dash.load_text(SAMPLE, LoadOrigin::LocalFile).unwrap();

        assert_eq!(dash.target().toasts, [LOCAL_FILE_LOADED]);
        assert!(dash.target().alerts.is_empty());
    }

    #[test]
    fn test_malformed_local_file_keeps_previous() {
        let mut dash = dashboard();
        dash.load_text(SAMPLE, LoadOrigin::Network).unwrap();
        let before = dash.document().cloned();
        let texts_before = dash.target().texts.clone();
        let events_before = dash.charts().events.len();

        let err = dash.load_text("{ broken", LoadOrigin::LocalFile).unwrap_err();

        assert!(matches!(err, LoadError::Document(DocumentError::Parse(_))));
        assert_eq!(dash.target().alerts, [LOCAL_FILE_INVALID]);
        assert_eq!(dash.document().cloned(), before);
        assert_eq!(dash.target().texts, texts_before);
        assert_eq!(dash.charts().events.len(), events_before);
        assert!(dash.target().toasts.is_empty());
    }

    #[test]
    fn test_network_failure_alerts_with_cause() {
        let mut dash = dashboard();
        let ticket = dash.begin_load();
        let err = LoadError::Http {
            source_name: "dados_oraculares.json".to_string(),
            status: 404,
        };

        assert!(dash.finish_load(ticket, Err(err), LoadOrigin::Network).is_err());
        assert_eq!(
            dash.target().alerts,
            ["Erro ao carregar base: Falha ao carregar dados_oraculares.json (HTTP 404)"]
        );
        assert!(dash.document().is_none());
    }

    #[test]
    fn test_network_parse_failure_alerts_once() {
        let mut dash = dashboard();
        let ticket = dash.begin_load();

        let result = dash.finish_load(ticket, Ok("nope".to_string()), LoadOrigin::Network);

        assert!(result.is_err());
        assert_eq!(dash.target().alerts.len(), 1);
        assert!(dash.target().alerts[0].starts_with("Erro ao carregar base: Malformed document"));
    }

    #[test]
    fn test_unreadable_local_file_alerts() {
        let mut dash = dashboard();
        let ticket = dash.begin_load();
        let outcome = Err(LoadError::Read("NotReadableError".to_string()));

        assert!(dash.finish_load(ticket, outcome, LoadOrigin::LocalFile).is_err());
        assert_eq!(dash.target().alerts, [LOCAL_FILE_INVALID]);
        assert!(dash.last_applied().is_none());
    }

    #[test]
    fn test_late_completion_wins() {
        let mut dash = dashboard();
        let first = dash.begin_load();
        let second = dash.begin_load();
        let later = SAMPLE.replace("\"impressoes_30d\": 12345", "\"impressoes_30d\": 99");

        dash.finish_load(second, Ok(SAMPLE.to_string()), LoadOrigin::Network)
            .unwrap();
        dash.finish_load(first, Ok(later), LoadOrigin::Network).unwrap();

        assert_eq!(dash.document().unwrap().kpis.impressions, 99);
        assert_eq!(dash.target().texts[ids::KPI_IMPRESSIONS], "99");
        assert_eq!(dash.last_applied(), Some(first));
        assert!(dash.target().logs.iter().any(|l| l.contains("#1 completed after #2")));
    }

    #[test]
    fn test_chart_failure_does_not_stop_render() {
        let charts = RecordingCharts {
            fail_donut: true,
            ..Default::default()
        };
        let mut dash = Dashboard::new(RecordingTarget::default(), charts);
        dash.load_text(SAMPLE, LoadOrigin::Network).unwrap();

        assert!(dash.has_line_chart());
        assert!(!dash.has_donut_chart());
        assert_eq!(dash.target().rows.len(), 3);
        assert!(dash.target().logs.iter().any(|l| l.starts_with("donut chart")));
    }
}
