//! View Derivation
//!
//! Maps a [`MetricsDocument`] to the texts, table rows and chart inputs the
//! dashboard page shows. No DOM access happens here.

use crate::document::{Devices, MetricsDocument};
use crate::format::{
    format_count, format_percent, format_position, format_signed_delta, DeltaKind, NumberLocale,
};

/// Element ids the host page must provide
pub mod ids {
    pub const KPI_IMPRESSIONS: &str = "kpi-impr";
    pub const KPI_CLICKS: &str = "kpi-cliques";
    pub const KPI_CTR: &str = "kpi-ctr";
    pub const KPI_POSITION: &str = "kpi-pos";

    pub const DELTA_IMPRESSIONS: &str = "delta-impr";
    pub const DELTA_CLICKS: &str = "delta-cliques";
    pub const DELTA_CTR: &str = "delta-ctr";
    pub const DELTA_POSITION: &str = "delta-pos";

    pub const LAST_UPDATE: &str = "ultima-atualizacao";
    pub const PERIOD: &str = "periodo";

    pub const COUNTRIES_BODY: &str = "tbody-paises";

    pub const LINE_CANVAS: &str = "chart-serie";
    pub const DONUT_CANVAS: &str = "chart-donut";

    pub const REFRESH_BUTTON: &str = "btnAtualizar";
    pub const FILE_PICKER: &str = "filePicker";
}

/// Legend text color shared by both charts
pub const LEGEND_COLOR: &str = "#dbe7f4";

const VS_PREVIOUS: &str = "% vs período anterior";
const POINTS_SUFFIX: &str = " pp";
const BETTER_SUFFIX: &str = " melhor";

/// Which y-axis a line dataset is scaled against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Left axis `y`, anchored at zero
    Left,
    /// Right axis `y1`, anchored at zero
    Right,
    /// Second right axis `y2`, scaled to the data range
    RightFloating,
}

impl Axis {
    pub fn id(self) -> &'static str {
        match self {
            Axis::Left => "y",
            Axis::Right => "y1",
            Axis::RightFloating => "y2",
        }
    }

    pub fn begin_at_zero(self) -> bool {
        !matches!(self, Axis::RightFloating)
    }
}

/// One line of the time-series chart
#[derive(Debug, Clone, PartialEq)]
pub struct LineDataset {
    pub label: String,
    /// `None` leaves a gap in the line
    pub data: Vec<Option<f64>>,
    pub axis: Axis,
    pub border_width: f64,
    pub tension: f64,
}

/// Input for the time-series chart
#[derive(Debug, Clone, PartialEq)]
pub struct LineChartSpec {
    pub labels: Vec<String>,
    pub datasets: Vec<LineDataset>,
    pub legend_color: &'static str,
}

/// Input for the device donut chart
#[derive(Debug, Clone, PartialEq)]
pub struct DonutChartSpec {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub legend_color: &'static str,
}

/// Four display cells of the countries table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryRow {
    pub name: String,
    pub impressions: String,
    pub clicks: String,
    pub ctr: String,
}

impl CountryRow {
    pub fn cells(&self) -> [&str; 4] {
        [&self.name, &self.impressions, &self.clicks, &self.ctr]
    }
}

/// Everything one render pass writes
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// `(element id, text)` pairs, in page order
    pub texts: Vec<(&'static str, String)>,
    pub countries: Vec<CountryRow>,
    pub line: LineChartSpec,
    pub donut: DonutChartSpec,
}

impl DashboardView {
    pub fn derive(doc: &MetricsDocument, locale: &NumberLocale) -> Self {
        Self {
            texts: kpi_texts(doc, locale),
            countries: country_rows(doc, locale),
            line: line_chart(doc),
            donut: donut_chart(&doc.devices),
        }
    }

    /// Text destined for one element id, if any
    pub fn text(&self, id: &str) -> Option<&str> {
        self.texts
            .iter()
            .find(|(key, _)| *key == id)
            .map(|(_, text)| text.as_str())
    }
}

fn kpi_texts(doc: &MetricsDocument, locale: &NumberLocale) -> Vec<(&'static str, String)> {
    let k = &doc.kpis;
    let meta = &doc.meta;

    vec![
        (ids::KPI_IMPRESSIONS, format_count(k.impressions, locale)),
        (ids::KPI_CLICKS, format_count(k.clicks, locale)),
        (ids::KPI_CTR, format!("{}%", format_percent(k.ctr_pct, locale))),
        (ids::KPI_POSITION, format_position(k.avg_position)),
        (
            ids::DELTA_IMPRESSIONS,
            format!(
                "{}{}",
                format_signed_delta(k.delta_impressions_pct, DeltaKind::Percent, locale),
                VS_PREVIOUS
            ),
        ),
        (
            ids::DELTA_CLICKS,
            format!(
                "{}{}",
                format_signed_delta(k.delta_clicks_pct, DeltaKind::Percent, locale),
                VS_PREVIOUS
            ),
        ),
        (
            ids::DELTA_CTR,
            format!(
                "{}{}",
                format_signed_delta(k.delta_ctr_pp, DeltaKind::Points, locale),
                POINTS_SUFFIX
            ),
        ),
        (
            ids::DELTA_POSITION,
            format!(
                "{}{}",
                format_signed_delta(k.delta_position_pp, DeltaKind::Points, locale),
                BETTER_SUFFIX
            ),
        ),
        (ids::LAST_UPDATE, meta.last_update.clone()),
        (
            ids::PERIOD,
            format!("{} — {}", meta.period.start, meta.period.end),
        ),
    ]
}

fn country_rows(doc: &MetricsDocument, locale: &NumberLocale) -> Vec<CountryRow> {
    doc.countries
        .iter()
        .map(|c| CountryRow {
            name: c.name.clone(),
            impressions: format_count(c.impressions, locale),
            clicks: format_count(c.clicks, locale),
            ctr: format!("{}%", format_percent(c.ctr_pct, locale)),
        })
        .collect()
}

fn line_chart(doc: &MetricsDocument) -> LineChartSpec {
    let series = &doc.series;
    let dataset = |label: &str, data: Vec<Option<f64>>, axis: Axis| LineDataset {
        label: label.to_string(),
        data,
        axis,
        border_width: 2.0,
        tension: 0.3,
    };

    LineChartSpec {
        labels: series.dates.clone(),
        datasets: vec![
            dataset(
                "Cliques",
                series.clicks.iter().map(|&v| Some(v as f64)).collect(),
                Axis::Left,
            ),
            dataset(
                "Impressões",
                series.impressions.iter().map(|&v| Some(v as f64)).collect(),
                Axis::Right,
            ),
            dataset("CTR (%)", series.ctr_pct.clone(), Axis::RightFloating),
        ],
        legend_color: LEGEND_COLOR,
    }
}

fn donut_chart(devices: &Devices) -> DonutChartSpec {
    DonutChartSpec {
        labels: Devices::LABELS.iter().map(|s| s.to_string()).collect(),
        values: devices.values().to_vec(),
        legend_color: LEGEND_COLOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::SAMPLE;

    fn sample_view() -> DashboardView {
        let doc = MetricsDocument::from_json(SAMPLE).unwrap();
        DashboardView::derive(&doc, &NumberLocale::PT_BR)
    }

    #[test]
    fn test_kpi_texts() {
        let view = sample_view();

        assert_eq!(view.text(ids::KPI_IMPRESSIONS), Some("12.345"));
        assert_eq!(view.text(ids::KPI_CLICKS), Some("678"));
        assert_eq!(view.text(ids::KPI_CTR), Some("5,5%"));
        assert_eq!(view.text(ids::KPI_POSITION), Some("3.10"));
        assert_eq!(view.text(ids::LAST_UPDATE), Some("2024-05-02 10:15:00"));
        assert_eq!(view.text(ids::PERIOD), Some("2024-04-01 — 2024-04-30"));
    }

    #[test]
    fn test_delta_texts() {
        let view = sample_view();

        assert_eq!(
            view.text(ids::DELTA_IMPRESSIONS),
            Some("+12% vs período anterior")
        );
        assert_eq!(
            view.text(ids::DELTA_CLICKS),
            Some("-4% vs período anterior")
        );
        assert_eq!(view.text(ids::DELTA_CTR), Some("+0,3 pp"));
        assert_eq!(view.text(ids::DELTA_POSITION), Some("-0,4 melhor"));
    }

    #[test]
    fn test_country_rows_keep_order() {
        let view = sample_view();
        let names: Vec<_> = view.countries.iter().map(|r| r.name.as_str()).collect();

        assert_eq!(names, ["BR", "PT", "US"]);
        assert_eq!(view.countries[0].cells(), ["BR", "10.000", "600", "6%"]);
        assert_eq!(view.countries[1].ctr, "3,5%");
    }

    #[test]
    fn test_line_chart_axes() {
        let view = sample_view();
        let line = &view.line;

        assert_eq!(line.labels.len(), 3);
        assert_eq!(line.datasets.len(), 3);
        assert_eq!(line.datasets[0].axis.id(), "y");
        assert_eq!(line.datasets[1].axis.id(), "y1");
        assert_eq!(line.datasets[2].axis.id(), "y2");
        assert!(!line.datasets[2].axis.begin_at_zero());
        assert_eq!(line.datasets[2].data, vec![Some(5.0), None, Some(4.6)]);
        assert_eq!(line.datasets[1].data[0], Some(400.0));
    }

    #[test]
    fn test_donut_chart() {
        let view = sample_view();

        assert_eq!(view.donut.labels, ["desktop", "mobile", "tablet"]);
        assert_eq!(view.donut.values, [62.0, 35.0, 3.0]);
    }
}
