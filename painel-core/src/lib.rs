//! # Painel Core
//!
//! Browser-independent half of the Painel dashboard.
//!
//! ## Modules
//!
//! - [`document`]: typed metrics document, parsed and validated on load
//! - [`format`]: locale-aware number formatting
//! - [`view`]: derivation of page texts, table rows and chart inputs
//! - [`dashboard`]: the per-page controller, generic over page and chart seams
//! - [`transition`]: portal link transition sequencing

pub mod dashboard;
pub mod document;
pub mod format;
pub mod transition;
pub mod view;

pub use dashboard::{
    ChartBackend, ChartError, Dashboard, LoadError, LoadOrigin, LoadTicket, RenderTarget,
};
pub use document::{
    Country, DocumentError, Devices, Kpis, Meta, MetricsDocument, Period, Series,
    DEFAULT_DOCUMENT,
};
pub use format::{
    format_count, format_percent, format_position, format_signed_delta, DeltaKind, NumberLocale,
};
pub use transition::{OverlapPolicy, Transition, TransitionGate, FADE_DELAY_MS};
pub use view::{ids, Axis, CountryRow, DashboardView, DonutChartSpec, LineChartSpec, LineDataset};
