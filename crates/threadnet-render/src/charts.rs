//! Statistical charts: centrality distributions, temporal series, degree
//! histograms and heatmaps.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use threadnet_graph::{CentralityMetric, CentralityTable, GraphProperties, InteractionGraph, Period};
use tracing::{instrument, warn};

use crate::error::{RenderError, Result};
use crate::style::{CORAL, STEELBLUE, viridis};
use crate::{Renderer, saved};

/// Properties plotted by [`Renderer::plot_temporal_graph_properties`] when
/// no metric list is given.
pub const TEMPORAL_METRICS: [&str; 4] = ["num_nodes", "num_edges", "density", "avg_degree"];

/// Histogram bin count used by every distribution chart.
pub const HISTOGRAM_BINS: usize = 50;

/// Bars in the centrality ranking panel.
pub const TOP_BARS: usize = 10;

const HIST_BLUE: RGBColor = RGBColor(31, 119, 180);
const LOG_FLOOR: f64 = 0.5;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Equal-width bin counts.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// `(left, right, count)` per bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, usize)> + '_ {
        self.edges
            .windows(2)
            .zip(&self.counts)
            .map(|(w, &c)| (w[0], w[1], c))
    }

    fn range(&self) -> (f64, f64) {
        (
            self.edges.first().copied().unwrap_or(0.0),
            self.edges.last().copied().unwrap_or(1.0),
        )
    }
}

/// Bin the finite `values` into `bins` equal-width bins over their range.
///
/// The last bin is closed on the right. A constant sample is centred in a
/// unit-wide range; an empty one spans `[0, 1]`.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn histogram(values: &[f64], bins: usize) -> Histogram {
    let bins = bins.max(1);
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();

    let (mut lo, mut hi) = finite
        .iter()
        .fold(None, |acc: Option<(f64, f64)>, &v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        })
        .unwrap_or((0.0, 1.0));
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
    let mut counts = vec![0_usize; bins];
    for v in finite {
        let i = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[i] += 1;
    }
    Histogram { edges, counts }
}

/// `"avg_degree"` → `"Avg Degree"`.
#[must_use]
pub fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Numeric value of a named [`GraphProperties`] field; `None` for unknown
/// names and for fields absent on this graph.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn property_value(props: &GraphProperties, name: &str) -> Option<f64> {
    match name {
        "num_nodes" => Some(props.num_nodes as f64),
        "num_edges" => Some(props.num_edges as f64),
        "density" => Some(props.density),
        "num_components" => Some(props.num_components as f64),
        "avg_degree" => Some(props.avg_degree),
        "diameter" => props.diameter.map(|d| d as f64),
        "avg_shortest_path" => props.avg_shortest_path,
        "diameter_largest_cc" => props.diameter_largest_cc.map(|d| d as f64),
        "avg_shortest_path_largest_cc" => props.avg_shortest_path_largest_cc,
        _ => None,
    }
}

fn is_property(name: &str) -> bool {
    matches!(
        name,
        "num_nodes"
            | "num_edges"
            | "density"
            | "num_components"
            | "avg_degree"
            | "diameter"
            | "avg_shortest_path"
            | "diameter_largest_cc"
            | "avg_shortest_path_largest_cc"
    )
}

/// Label for an integer tick `x` out of `labels`; blank between ticks.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tick_label(labels: &[String], x: f64) -> String {
    if x < -0.01 || (x - x.round()).abs() > 0.01 {
        return String::new();
    }
    labels.get(x.round() as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Heatmap options
// ---------------------------------------------------------------------------

/// Labels and destination for [`Renderer::plot_heatmap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatmapOptions {
    pub title: String,
    pub xlabel: String,
    pub ylabel: String,
    /// Column tick labels; columns without one are unlabelled.
    pub x_labels: Vec<String>,
    /// Row tick labels, top row first.
    pub y_labels: Vec<String>,
    pub save_path: Option<PathBuf>,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            title: "Heatmap".to_string(),
            xlabel: "X".to_string(),
            ylabel: "Y".to_string(),
            x_labels: Vec::new(),
            y_labels: Vec::new(),
            save_path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

impl Renderer {
    fn font(&self, pt: f64) -> FontDesc<'static> {
        ("sans-serif", self.points(pt)).into_font()
    }

    fn bold(&self, pt: f64) -> FontDesc<'static> {
        self.font(pt).style(FontStyle::Bold)
    }

    /// Histogram of `metric` next to the ten highest-scoring nodes.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyInput`] for an empty table, plus I/O and
    /// drawing failures.
    #[instrument(skip(self, table, title, save_path), fields(rows = table.len()))]
    pub fn plot_centrality_distribution(
        &self,
        table: &CentralityTable,
        metric: CentralityMetric,
        title: Option<&str>,
        save_path: Option<&Path>,
    ) -> Result<PathBuf> {
        if table.is_empty() {
            return Err(RenderError::EmptyInput("centrality table has no rows"));
        }
        let path = self.target_path(save_path, &format!("centrality_{metric}.png"))?;
        let name = title_case(metric.as_str());
        let hist = histogram(&table.scores(metric), HISTOGRAM_BINS);
        let top: Vec<(String, f64)> = table
            .top(TOP_BARS, metric)
            .into_iter()
            .map(|row| (row.node.to_string(), row.score(metric)))
            .collect();

        {
            let root = BitMapBackend::new(&path, self.canvas_size((15.0, 5.0))).into_drawing_area();
            root.fill(&WHITE)?;
            let root = match title {
                Some(t) => root.titled(t, self.bold(16.0))?,
                None => root,
            };
            let panels = root.split_evenly((1, 2));
            self.draw_histogram(
                &panels[0],
                &hist,
                &format!("Distribution of {name}"),
                &name,
                HIST_BLUE,
                false,
            )?;
            self.draw_ranking(&panels[1], &top, &name)?;
            root.present()?;
        }

        saved("centrality", &path);
        Ok(path)
    }

    /// One line panel per property, periods in chronological order.
    ///
    /// An empty `metrics` slice plots [`TEMPORAL_METRICS`]. Unknown property
    /// names are skipped with a warning; periods lacking a property (e.g.
    /// `diameter` of a disconnected graph) leave a gap.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyInput`] when there are no periods or no
    /// known metric, plus I/O and drawing failures.
    #[allow(clippy::cast_precision_loss)]
    #[instrument(skip(self, series, save_path), fields(periods = series.len()))]
    pub fn plot_temporal_graph_properties(
        &self,
        series: &BTreeMap<Period, GraphProperties>,
        metrics: &[&str],
        save_path: Option<&Path>,
    ) -> Result<PathBuf> {
        if series.is_empty() {
            return Err(RenderError::EmptyInput("no periods"));
        }
        let requested: &[&str] = if metrics.is_empty() { &TEMPORAL_METRICS } else { metrics };
        let known: Vec<&str> = requested
            .iter()
            .copied()
            .filter(|m| {
                let ok = is_property(m);
                if !ok {
                    warn!(metric = m, "unknown graph property; skipping panel");
                }
                ok
            })
            .collect();
        if known.is_empty() {
            return Err(RenderError::EmptyInput("no known metric to plot"));
        }

        let path = self.target_path(save_path, "temporal_properties.png")?;
        let labels: Vec<String> = series.keys().map(Period::label).collect();
        let n = labels.len();
        let x_range = if n == 1 { -0.5..0.5 } else { 0.0..(n - 1) as f64 };

        {
            let height = 4.0 * known.len() as f64;
            let root = BitMapBackend::new(&path, self.canvas_size((14.0, height))).into_drawing_area();
            root.fill(&WHITE)?;
            let panels = root.split_evenly((known.len(), 1));

            for (area, &metric) in panels.iter().zip(&known) {
                let name = title_case(metric);
                let points: Vec<(f64, f64)> = series
                    .values()
                    .enumerate()
                    .filter_map(|(i, p)| property_value(p, metric).map(|v| (i as f64, v)))
                    .collect();
                let (lo, hi) = padded_range(points.iter().map(|p| p.1));

                let mut chart = ChartBuilder::on(area)
                    .caption(format!("{name} Over Time"), self.font(14.0))
                    .margin(self.points(8.0))
                    .x_label_area_size(self.points(30.0))
                    .y_label_area_size(self.points(48.0))
                    .build_cartesian_2d(x_range.clone(), lo..hi)?;

                chart
                    .configure_mesh()
                    .x_labels(n.min(24))
                    .x_label_formatter(&|x| tick_label(&labels, *x))
                    .x_desc("Time Period")
                    .y_desc(name.as_str())
                    .axis_desc_style(self.font(12.0))
                    .label_style(self.font(9.0))
                    .light_line_style(WHITE)
                    .bold_line_style(BLACK.mix(0.1))
                    .draw()?;

                chart.draw_series(LineSeries::new(
                    points.iter().copied(),
                    HIST_BLUE.stroke_width(self.points(2.0)),
                ))?;
                let marker = i32::try_from(self.points(3.0)).unwrap_or(i32::MAX);
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, marker, HIST_BLUE.filled())),
                )?;
            }
            root.present()?;
        }

        saved("temporal", &path);
        Ok(path)
    }

    /// Degree histogram; with `log_scale` a second panel repeats it on a
    /// logarithmic count axis.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyInput`] for a graph without nodes, plus
    /// I/O and drawing failures.
    #[allow(clippy::cast_precision_loss)]
    #[instrument(skip(self, graph, save_path), fields(nodes = graph.node_count()))]
    pub fn plot_degree_distribution(
        &self,
        graph: &InteractionGraph,
        log_scale: bool,
        save_path: Option<&Path>,
    ) -> Result<PathBuf> {
        if graph.is_empty() {
            return Err(RenderError::EmptyInput("graph has no nodes"));
        }
        let path = self.target_path(save_path, "degree_distribution.png")?;
        let degrees: Vec<f64> = graph.degrees().into_iter().map(|d| d as f64).collect();
        let hist = histogram(&degrees, HISTOGRAM_BINS);

        {
            let root = BitMapBackend::new(&path, self.canvas_size((12.0, 6.0))).into_drawing_area();
            root.fill(&WHITE)?;
            if log_scale {
                let panels = root.split_evenly((1, 2));
                self.draw_histogram(&panels[0], &hist, "Degree Distribution", "Degree", STEELBLUE, false)?;
                self.draw_histogram(
                    &panels[1],
                    &hist,
                    "Degree Distribution (Log Scale)",
                    "Degree",
                    CORAL,
                    true,
                )?;
            } else {
                self.draw_histogram(&root, &hist, "Degree Distribution", "Degree", STEELBLUE, false)?;
            }
            root.present()?;
        }

        saved("degree distribution", &path);
        Ok(path)
    }

    /// Colour-mapped matrix (viridis) with a colour bar. `matrix[0]` is the
    /// top row.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyInput`] for an empty matrix,
    /// [`RenderError::RaggedMatrix`] when rows differ in length, plus I/O and
    /// drawing failures.
    #[allow(clippy::cast_precision_loss)]
    #[instrument(skip(self, matrix, options), fields(rows = matrix.len()))]
    pub fn plot_heatmap(&self, matrix: &[Vec<f64>], options: &HeatmapOptions) -> Result<PathBuf> {
        let cols = matrix.first().map_or(0, Vec::len);
        if cols == 0 {
            return Err(RenderError::EmptyInput("heatmap matrix is empty"));
        }
        if let Some((row, r)) = matrix.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(RenderError::RaggedMatrix {
                row,
                expected: cols,
                found: r.len(),
            });
        }
        let (min, max) = matrix
            .iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let (min, max) = if min > max { (0.0, 1.0) } else { (min, max) };
        let span = if max > min { max - min } else { 1.0 };

        let path = self.target_path(options.save_path.as_deref(), "heatmap.png")?;
        let rows = i32::try_from(matrix.len()).unwrap_or(i32::MAX);
        let width = i32::try_from(cols).unwrap_or(i32::MAX);

        {
            let (w, h) = self.canvas_size((12.0, 10.0));
            let root = BitMapBackend::new(&path, (w, h)).into_drawing_area();
            root.fill(&WHITE)?;
            let root = root.titled(&options.title, self.bold(16.0))?;
            let split = i32::try_from(w / 100 * 88).unwrap_or(i32::MAX);
            let (main, bar) = root.split_horizontally(split);

            let mut chart = ChartBuilder::on(&main)
                .margin(self.points(8.0))
                .x_label_area_size(self.points(40.0))
                .y_label_area_size(self.points(60.0))
                .build_cartesian_2d(0..width, rows..0)?;

            let (px_w, px_h) = chart.plotting_area().dim_in_pixel();
            let cell_w = i32::try_from(px_w).unwrap_or(i32::MAX) / width.max(1);
            let cell_h = i32::try_from(px_h).unwrap_or(i32::MAX) / rows.max(1);
            let label = |labels: &[String], v: i32| {
                usize::try_from(v)
                    .ok()
                    .and_then(|i| labels.get(i).cloned())
                    .unwrap_or_default()
            };

            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(cols)
                .y_labels(matrix.len())
                .x_label_offset(cell_w / 2)
                .y_label_offset(cell_h / 2)
                .x_label_formatter(&|x| label(&options.x_labels, *x))
                .y_label_formatter(&|y| label(&options.y_labels, *y))
                .x_desc(options.xlabel.as_str())
                .y_desc(options.ylabel.as_str())
                .axis_desc_style(self.font(12.0))
                .label_style(self.font(8.0))
                .draw()?;

            chart.draw_series(matrix.iter().zip(0..).flat_map(|(row, y)| {
                row.iter().zip(0..).map(move |(&v, x)| {
                    let color = viridis((v - min) / span);
                    Rectangle::new([(x, y), (x + 1, y + 1)], color.filled())
                })
            }))?;

            let mut scale = ChartBuilder::on(&bar)
                .margin(self.points(8.0))
                .margin_top(self.points(20.0))
                .right_y_label_area_size(self.points(40.0))
                .build_cartesian_2d(0.0..1.0, min..(min + span))?;
            scale
                .configure_mesh()
                .disable_mesh()
                .x_labels(0)
                .label_style(self.font(8.0))
                .draw()?;
            let steps = 256;
            scale.draw_series((0..steps).map(|i| {
                let t0 = f64::from(i) / f64::from(steps);
                let t1 = f64::from(i + 1) / f64::from(steps);
                Rectangle::new(
                    [(0.0, min + span * t0), (1.0, min + span * t1)],
                    viridis(t0).filled(),
                )
            }))?;

            root.present()?;
        }

        saved("heatmap", &path);
        Ok(path)
    }

    // -----------------------------------------------------------------------
    // Panels
    // -----------------------------------------------------------------------

    #[allow(clippy::cast_precision_loss)]
    fn draw_histogram(
        &self,
        area: &Area<'_>,
        hist: &Histogram,
        caption: &str,
        x_desc: &str,
        color: RGBColor,
        log_y: bool,
    ) -> Result<()> {
        let (lo, hi) = hist.range();
        let top = (hist.max_count().max(1) as f64) * 1.05;
        let fill = color.mix(0.7).filled();
        let outline = BLACK.stroke_width(1);

        let mut builder = ChartBuilder::on(area);
        builder
            .caption(caption, self.font(14.0))
            .margin(self.points(8.0))
            .x_label_area_size(self.points(30.0))
            .y_label_area_size(self.points(40.0));

        if log_y {
            let mut chart = builder.build_cartesian_2d(lo..hi, (LOG_FLOOR..top * 2.0).log_scale())?;
            chart
                .configure_mesh()
                .x_desc(x_desc)
                .y_desc("Frequency")
                .axis_desc_style(self.font(12.0))
                .label_style(self.font(9.0))
                .light_line_style(WHITE)
                .bold_line_style(BLACK.mix(0.1))
                .draw()?;
            let bars: Vec<(f64, f64, f64)> = hist
                .bars()
                .filter(|b| b.2 > 0)
                .map(|(l, r, c)| (l, r, c as f64))
                .collect();
            chart.draw_series(bars.iter().map(|&(l, r, c)| Rectangle::new([(l, LOG_FLOOR), (r, c)], fill)))?;
            chart.draw_series(bars.iter().map(|&(l, r, c)| Rectangle::new([(l, LOG_FLOOR), (r, c)], outline)))?;
        } else {
            let mut chart = builder.build_cartesian_2d(lo..hi, 0.0..top)?;
            chart
                .configure_mesh()
                .x_desc(x_desc)
                .y_desc("Frequency")
                .axis_desc_style(self.font(12.0))
                .label_style(self.font(9.0))
                .light_line_style(WHITE)
                .bold_line_style(BLACK.mix(0.1))
                .draw()?;
            let bars: Vec<(f64, f64, f64)> = hist.bars().map(|(l, r, c)| (l, r, c as f64)).collect();
            chart.draw_series(bars.iter().map(|&(l, r, c)| Rectangle::new([(l, 0.0), (r, c)], fill)))?;
            chart.draw_series(bars.iter().map(|&(l, r, c)| Rectangle::new([(l, 0.0), (r, c)], outline)))?;
        }
        Ok(())
    }

    /// Horizontal bars, highest score at the top.
    #[allow(clippy::cast_precision_loss)]
    fn draw_ranking(&self, area: &Area<'_>, top: &[(String, f64)], name: &str) -> Result<()> {
        let n = top.len();
        let max = top.iter().map(|t| t.1).fold(0.0_f64, f64::max);
        let x_max = if max > 0.0 { max * 1.1 } else { 1.0 };
        // Row i (from the bottom) shows rank n - 1 - i.
        let labels: Vec<String> = top.iter().rev().map(|t| t.0.clone()).collect();

        let mut chart = ChartBuilder::on(area)
            .caption(format!("Top {TOP_BARS} Nodes by {name}"), self.font(14.0))
            .margin(self.points(8.0))
            .x_label_area_size(self.points(30.0))
            .y_label_area_size(self.points(60.0))
            .build_cartesian_2d(0.0..x_max, -0.5..(n as f64 - 0.5))?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(n)
            .y_label_formatter(&|y| tick_label(&labels, *y))
            .x_desc(name)
            .y_desc("Node")
            .axis_desc_style(self.font(12.0))
            .label_style(self.font(9.0))
            .light_line_style(WHITE)
            .bold_line_style(BLACK.mix(0.1))
            .draw()?;

        chart.draw_series(top.iter().rev().enumerate().map(|(i, (_, score))| {
            let y = i as f64;
            Rectangle::new([(0.0, y - 0.4), (*score, y + 0.4)], STEELBLUE.filled())
        }))?;
        Ok(())
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo > hi {
        return (0.0, 1.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { lo.abs().max(1.0) * 0.05 };
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_bins_cover_the_range() {
        let h = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(h.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        // The maximum falls in the last, right-closed bin.
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
        assert_eq!(h.max_count(), 2);
        assert_eq!(h.bars().count(), 4);
    }

    #[test]
    fn histogram_degenerate_inputs() {
        let constant = histogram(&[3.0, 3.0, 3.0], 50);
        assert_eq!(constant.edges.len(), 51);
        assert!((constant.edges[0] - 2.5).abs() < 1e-12);
        assert!((constant.edges[50] - 3.5).abs() < 1e-12);
        assert_eq!(constant.counts.iter().sum::<usize>(), 3);

        let empty = histogram(&[], 10);
        assert_eq!(empty.counts, vec![0; 10]);
        assert_eq!(empty.range(), (0.0, 1.0));

        let skips_nan = histogram(&[1.0, f64::NAN, 2.0], 2);
        assert_eq!(skips_nan.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn titles() {
        assert_eq!(title_case("avg_degree"), "Avg Degree");
        assert_eq!(title_case("num_nodes"), "Num Nodes");
        assert_eq!(title_case("eigenvector"), "Eigenvector");
    }

    #[test]
    fn property_lookup() {
        let g = InteractionGraph::from_edges([("a", "b", 1.0), ("c", "d", 1.0)]);
        let p = threadnet_graph::graph_properties(&g).expect("props");
        assert_eq!(property_value(&p, "num_nodes"), Some(4.0));
        assert_eq!(property_value(&p, "density"), Some(p.density));
        assert_eq!(property_value(&p, "diameter"), None);
        assert_eq!(property_value(&p, "diameter_largest_cc"), Some(1.0));
        assert_eq!(property_value(&p, "pagerank"), None);
        assert!(is_property("diameter"));
        assert!(!is_property("pagerank"));
    }

    #[test]
    fn tick_labels_only_on_integers() {
        let labels = vec!["2024-01".to_string(), "2024-02".to_string()];
        assert_eq!(tick_label(&labels, 1.0), "2024-02");
        assert_eq!(tick_label(&labels, 0.5), "");
        assert_eq!(tick_label(&labels, 7.0), "");
        assert_eq!(tick_label(&labels, -1.0), "");
    }

    #[test]
    fn padding() {
        assert_eq!(padded_range(std::iter::empty()), (0.0, 1.0));
        let (lo, hi) = padded_range([2.0, 4.0].into_iter());
        assert!((lo - 1.9).abs() < 1e-12 && (hi - 4.1).abs() < 1e-12);
        let (lo, hi) = padded_range([5.0].into_iter());
        assert!(lo < 5.0 && hi > 5.0);
    }

    #[test]
    fn empty_inputs_are_rejected_before_drawing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let r = Renderer::new(crate::RenderConfig {
            output_dir: tmp.path().to_path_buf(),
            dpi: 72,
        })
        .expect("renderer");

        assert!(matches!(
            r.plot_heatmap(&[], &HeatmapOptions::default()),
            Err(RenderError::EmptyInput(_))
        ));
        assert!(matches!(
            r.plot_heatmap(&[vec![1.0, 2.0], vec![3.0]], &HeatmapOptions::default()),
            Err(RenderError::RaggedMatrix { row: 1, expected: 2, found: 1 })
        ));
        assert!(matches!(
            r.plot_degree_distribution(&InteractionGraph::new(), true, None),
            Err(RenderError::EmptyInput(_))
        ));
        assert!(matches!(
            r.plot_centrality_distribution(&CentralityTable::default(), CentralityMetric::Degree, None, None),
            Err(RenderError::EmptyInput(_))
        ));
        assert!(matches!(
            r.plot_temporal_graph_properties(&BTreeMap::new(), &[], None),
            Err(RenderError::EmptyInput(_))
        ));
    }
}
