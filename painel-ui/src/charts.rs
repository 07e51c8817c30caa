//! Canvas Charts
//!
//! Line and donut charts drawn with the HTML5 Canvas 2D API.
//! Each chart instance owns its canvas until destroyed.

use painel_core::{
    Axis, ChartBackend, ChartError, DonutChartSpec, LineChartSpec, LineDataset,
};
use std::f64::consts::PI;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

/// Chart colors for different series
const SERIES_COLORS: [&str; 6] = [
    "#FF9800", // Orange (primary)
    "#4CAF50", // Green
    "#2196F3", // Blue
    "#9C27B0", // Purple
    "#F44336", // Red
    "#00BCD4", // Cyan
];

const BACKGROUND: &str = "#11161d";
const GRID: &str = "#2b3340";
const TICK_FONT: &str = "11px sans-serif";
const LEGEND_FONT: &str = "12px sans-serif";

const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 96.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 32.0;
const GRID_LINES: usize = 5;
const MAX_X_LABELS: usize = 8;

/// A drawn chart bound to one canvas
pub struct CanvasChart {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

/// [`ChartBackend`] that looks canvases up by id in the document
pub struct CanvasCharts {
    document: Document,
}

impl CanvasCharts {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn open(&self, canvas_id: &str) -> Result<CanvasChart, ChartError> {
        let canvas = self
            .document
            .get_element_by_id(canvas_id)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .ok_or_else(|| ChartError::Canvas(canvas_id.to_string()))?;

        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .ok_or_else(|| ChartError::Context(canvas_id.to_string()))?;

        Ok(CanvasChart { canvas, ctx })
    }
}

impl ChartBackend for CanvasCharts {
    type Handle = CanvasChart;

    fn line(&mut self, canvas_id: &str, spec: &LineChartSpec) -> Result<CanvasChart, ChartError> {
        let chart = self.open(canvas_id)?;
        draw_line_chart(&chart, spec);
        Ok(chart)
    }

    fn donut(
        &mut self,
        canvas_id: &str,
        spec: &DonutChartSpec,
    ) -> Result<CanvasChart, ChartError> {
        let chart = self.open(canvas_id)?;
        draw_donut_chart(&chart, spec);
        Ok(chart)
    }

    fn destroy(&mut self, chart: CanvasChart) {
        let width = chart.canvas.width() as f64;
        let height = chart.canvas.height() as f64;
        chart.ctx.clear_rect(0.0, 0.0, width, height);
    }
}

// ============ Geometry ============

/// Value range for one axis; zero-anchored axes always include 0
pub(crate) fn value_range(data: &[Option<f64>], begin_at_zero: bool) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in data.iter().flatten().filter(|v| v.is_finite()) {
        min = min.min(*v);
        max = max.max(*v);
    }

    if !min.is_finite() {
        return (0.0, 1.0);
    }
    if begin_at_zero {
        min = min.min(0.0);
        max = max.max(0.0);
    }
    if max - min < f64::EPSILON {
        // flat series still needs a visible band
        return (min - 1.0, max + 1.0);
    }
    (min, max)
}

/// Merge the ranges of every dataset sharing `axis`
pub(crate) fn axis_range(datasets: &[LineDataset], axis: Axis) -> Option<(f64, f64)> {
    let values: Vec<Option<f64>> = datasets
        .iter()
        .filter(|d| d.axis == axis)
        .flat_map(|d| d.data.iter().copied())
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(value_range(&values, axis.begin_at_zero()))
}

/// Start/end angles of each donut slice, clockwise from 12 o'clock
pub(crate) fn donut_slices(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = -PI / 2.0;
    values
        .iter()
        .map(|v| {
            let sweep = v.max(0.0) / total * 2.0 * PI;
            let slice = (start, start + sweep);
            start += sweep;
            slice
        })
        .collect()
}

/// Indices of x labels to print, at most `max` evenly spaced
pub(crate) fn label_indices(count: usize, max: usize) -> Vec<usize> {
    if count == 0 || max == 0 {
        return Vec::new();
    }
    let step = count.div_ceil(max).max(1);
    (0..count).step_by(step).collect()
}

// ============ Drawing ============

fn begin_frame(chart: &CanvasChart) -> (f64, f64) {
    let width = chart.canvas.width() as f64;
    let height = chart.canvas.height() as f64;
    chart.ctx.clear_rect(0.0, 0.0, width, height);
    chart.ctx.set_fill_style_str(BACKGROUND);
    chart.ctx.fill_rect(0.0, 0.0, width, height);
    (width, height)
}

fn draw_legend(ctx: &CanvasRenderingContext2d, labels: &[String], color: &str, x0: f64, y: f64) {
    ctx.set_font(LEGEND_FONT);
    let mut x = x0;
    for (idx, label) in labels.iter().enumerate() {
        ctx.set_fill_style_str(SERIES_COLORS[idx % SERIES_COLORS.len()]);
        ctx.fill_rect(x, y - 9.0, 10.0, 10.0);
        ctx.set_fill_style_str(color);
        let _ = ctx.fill_text(label, x + 14.0, y);
        x += 14.0 + label.chars().count() as f64 * 7.0 + 18.0;
    }
}

fn draw_line_chart(chart: &CanvasChart, spec: &LineChartSpec) {
    let ctx = &chart.ctx;
    let (width, height) = begin_frame(chart);

    let plot_w = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = height - MARGIN_TOP - MARGIN_BOTTOM;
    let n = spec.labels.len();
    let x_at = |i: usize| {
        if n <= 1 {
            MARGIN_LEFT + plot_w / 2.0
        } else {
            MARGIN_LEFT + i as f64 / (n - 1) as f64 * plot_w
        }
    };

    // Grid
    ctx.set_stroke_style_str(GRID);
    ctx.set_line_width(1.0);
    for i in 0..=GRID_LINES {
        let y = MARGIN_TOP + i as f64 / GRID_LINES as f64 * plot_h;
        ctx.begin_path();
        ctx.move_to(MARGIN_LEFT, y);
        ctx.line_to(width - MARGIN_RIGHT, y);
        ctx.stroke();
    }

    // Axis ticks: y on the left, y1 and y2 stacked on the right
    ctx.set_font(TICK_FONT);
    ctx.set_fill_style_str(spec.legend_color);
    for (axis, x) in [
        (Axis::Left, 4.0),
        (Axis::Right, width - MARGIN_RIGHT + 6.0),
        (Axis::RightFloating, width - MARGIN_RIGHT + 50.0),
    ] {
        if let Some((min, max)) = axis_range(&spec.datasets, axis) {
            for i in 0..=GRID_LINES {
                let y = MARGIN_TOP + i as f64 / GRID_LINES as f64 * plot_h;
                let value = max - i as f64 / GRID_LINES as f64 * (max - min);
                let _ = ctx.fill_text(&tick_label(axis, value), x, y + 4.0);
            }
        }
    }

    // Series
    for (idx, dataset) in spec.datasets.iter().enumerate() {
        let Some((min, max)) = axis_range(&spec.datasets, dataset.axis) else {
            continue;
        };
        let y_at = |v: f64| MARGIN_TOP + (max - v) / (max - min) * plot_h;

        ctx.set_stroke_style_str(SERIES_COLORS[idx % SERIES_COLORS.len()]);
        ctx.set_line_width(dataset.border_width);
        ctx.begin_path();

        for run in point_runs(&dataset.data) {
            let points: Vec<(f64, f64)> = run.iter().map(|&(i, v)| (x_at(i), y_at(v))).collect();
            trace_curve(ctx, &points, dataset.tension);
        }
        ctx.stroke();
    }

    // X labels
    ctx.set_font(TICK_FONT);
    ctx.set_fill_style_str(spec.legend_color);
    for i in label_indices(n, MAX_X_LABELS) {
        let _ = ctx.fill_text(&spec.labels[i], x_at(i) - 28.0, height - 10.0);
    }

    let legend: Vec<String> = spec.datasets.iter().map(|d| d.label.clone()).collect();
    draw_legend(ctx, &legend, spec.legend_color, MARGIN_LEFT, 20.0);

    if n == 0 {
        ctx.set_font("16px sans-serif");
        let _ = ctx.fill_text("Sem dados no período", width / 2.0 - 80.0, height / 2.0);
    }
}

/// Tick text; the floating CTR axis spans a few units and needs a decimal
fn tick_label(axis: Axis, value: f64) -> String {
    match axis {
        Axis::RightFloating => format!("{:.1}", value),
        Axis::Left | Axis::Right => format!("{:.0}", value),
    }
}

/// Contiguous finite stretches of a series as `(index, value)` pairs
fn point_runs(data: &[Option<f64>]) -> Vec<Vec<(usize, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for (i, value) in data.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push((i, *v)),
            // gap in the series
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

type Point = (f64, f64);

/// Incoming and outgoing bezier control points for each point
///
/// Cardinal spline weighted by neighbour distance; `tension` 0 gives
/// straight segments.
fn spline_controls(points: &[Point], tension: f64) -> Vec<(Point, Point)> {
    let dist = |a: Point, b: Point| ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();

    (0..points.len())
        .map(|i| {
            let cur = points[i];
            let prev = if i == 0 { cur } else { points[i - 1] };
            let next = points.get(i + 1).copied().unwrap_or(cur);

            let d01 = dist(prev, cur);
            let d12 = dist(cur, next);
            let total = d01 + d12;
            if total == 0.0 {
                return (cur, cur);
            }
            let fa = tension * d01 / total;
            let fb = tension * d12 / total;
            let (dx, dy) = (next.0 - prev.0, next.1 - prev.1);

            (
                (cur.0 - fa * dx, cur.1 - fa * dy),
                (cur.0 + fb * dx, cur.1 + fb * dy),
            )
        })
        .collect()
}

fn trace_curve(ctx: &CanvasRenderingContext2d, points: &[Point], tension: f64) {
    let Some(&(x0, y0)) = points.first() else {
        return;
    };
    ctx.move_to(x0, y0);

    let controls = spline_controls(points, tension);
    for i in 1..points.len() {
        let (_, out) = controls[i - 1];
        let (inc, _) = controls[i];
        let (x, y) = points[i];
        ctx.bezier_curve_to(out.0, out.1, inc.0, inc.1, x, y);
    }
}

fn draw_donut_chart(chart: &CanvasChart, spec: &DonutChartSpec) {
    let ctx = &chart.ctx;
    let (width, height) = begin_frame(chart);

    let cx = width / 2.0;
    let cy = (height + 30.0) / 2.0;
    let outer = ((width.min(height - 30.0)) / 2.0 - 10.0).max(10.0);
    let inner = outer * 0.5;

    for (idx, (start, end)) in donut_slices(&spec.values).into_iter().enumerate() {
        if end <= start {
            continue;
        }
        ctx.set_fill_style_str(SERIES_COLORS[idx % SERIES_COLORS.len()]);
        ctx.begin_path();
        let _ = ctx.arc(cx, cy, outer, start, end);
        let _ = ctx.arc_with_anticlockwise(cx, cy, inner, end, start, true);
        ctx.close_path();
        ctx.fill();
    }

    let legend_x = (width / 2.0 - 110.0).max(8.0);
    draw_legend(ctx, &spec.labels, spec.legend_color, legend_x, 20.0);
}
