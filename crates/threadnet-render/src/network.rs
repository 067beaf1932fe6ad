//! Node-link drawings of interaction graphs.

use std::path::PathBuf;

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use threadnet_graph::InteractionGraph;
use tracing::instrument;

use crate::error::{RenderError, Result};
use crate::layout::{Layout, Point};
use crate::style::{GRAY, parse_color};
use crate::{Renderer, saved};

/// Network figure size in inches.
pub const NETWORK_FIGSIZE: (f64, f64) = (15.0, 10.0);

/// Options for [`Renderer::plot_network`].
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkPlotOptions {
    pub title: String,
    /// Marker area in square points.
    pub node_size: f64,
    /// Colour name or `#rrggbb`.
    pub node_color: String,
    pub with_labels: bool,
    pub layout: Layout,
    /// Seed for the spring layout's starting positions.
    pub seed: u64,
    pub save_path: Option<PathBuf>,
}

impl Default for NetworkPlotOptions {
    fn default() -> Self {
        Self {
            title: "Network Graph".to_string(),
            node_size: 300.0,
            node_color: "lightblue".to_string(),
            with_labels: false,
            layout: Layout::Spring,
            seed: 42,
            save_path: None,
        }
    }
}

/// Marker radius in pixels for a marker of `area_pt2` square points.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn node_radius(area_pt2: f64, dpi: u32) -> i32 {
    let diameter_pt = area_pt2.max(0.0).sqrt();
    (diameter_pt / 2.0 * f64::from(dpi) / 72.0).round().max(1.0) as i32
}

/// One segment per edge, between the positions of its endpoints.
#[must_use]
pub fn edge_segments(graph: &InteractionGraph, pos: &[Point]) -> Vec<(Point, Point)> {
    let g = &graph.graph;
    g.edge_indices()
        .filter_map(|e| g.edge_endpoints(e))
        .filter_map(|(a, b)| Some((*pos.get(a.index())?, *pos.get(b.index())?)))
        .collect()
}

impl Renderer {
    /// Draw `graph` with gray edges and uniform node markers.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyInput`] for a graph without nodes,
    /// [`RenderError::UnknownOption`] for an unrecognized node colour, plus
    /// I/O and drawing failures.
    #[instrument(skip(self, graph, options), fields(nodes = graph.node_count(), layout = %options.layout))]
    pub fn plot_network(
        &self,
        graph: &InteractionGraph,
        options: &NetworkPlotOptions,
    ) -> Result<PathBuf> {
        if graph.is_empty() {
            return Err(RenderError::EmptyInput("graph has no nodes"));
        }
        let color = parse_color(&options.node_color)?;
        let pos = options.layout.positions(graph, options.seed);
        let segments = edge_segments(graph, &pos);
        let path = self.target_path(options.save_path.as_deref(), "network.png")?;

        {
            let root = BitMapBackend::new(&path, self.canvas_size(NETWORK_FIGSIZE)).into_drawing_area();
            root.fill(&WHITE)?;
            let title = ("sans-serif", self.points(16.0))
                .into_font()
                .style(FontStyle::Bold);
            let root = root.titled(&options.title, title)?;

            let mut chart = ChartBuilder::on(&root)
                .margin(self.points(12.0))
                .build_cartesian_2d(-1.1_f64..1.1_f64, -1.1_f64..1.1_f64)?;

            let edge_style = GRAY.mix(0.7).stroke_width(self.points(1.0));
            chart.draw_series(
                segments
                    .iter()
                    .map(|&(a, b)| PathElement::new(vec![a, b], edge_style)),
            )?;

            let radius = node_radius(options.node_size, self.config().dpi);
            chart.draw_series(
                pos.iter()
                    .map(|&p| Circle::new(p, radius, color.mix(0.7).filled())),
            )?;

            if options.with_labels {
                let style = TextStyle::from(("sans-serif", self.points(12.0)).into_font())
                    .pos(Pos::new(HPos::Center, VPos::Center));
                chart.draw_series(
                    graph
                        .nodes()
                        .zip(&pos)
                        .map(|(id, &p)| Text::new(id.to_string(), p, style.clone())),
                )?;
            }

            root.present()?;
        }

        saved("network", &path);
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_from_marker_area() {
        // 300 pt² ≈ 17.3 pt across; at 72 dpi a point is a pixel.
        assert_eq!(node_radius(300.0, 72), 9);
        assert_eq!(node_radius(300.0, 300), 36);
        assert_eq!(node_radius(0.0, 300), 1);
    }

    #[test]
    fn segments_follow_positions() {
        let g = InteractionGraph::from_edges([("a", "b", 1.0), ("b", "c", 2.0)]);
        let pos = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)];
        let segs = edge_segments(&g, &pos);
        assert_eq!(segs, vec![((0.0, 0.0), (1.0, 0.0)), ((1.0, 0.0), (1.0, 1.0))]);
    }

    #[test]
    fn defaults() {
        let o = NetworkPlotOptions::default();
        assert_eq!(o.title, "Network Graph");
        assert_eq!(o.node_color, "lightblue");
        assert_eq!(o.layout, Layout::Spring);
        assert!(!o.with_labels);
    }

    #[test]
    fn bad_colour_rejected_before_drawing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let r = Renderer::new(crate::RenderConfig {
            output_dir: tmp.path().to_path_buf(),
            dpi: 72,
        })
        .expect("renderer");
        let g = InteractionGraph::from_edges([("a", "b", 1.0)]);
        let options = NetworkPlotOptions {
            node_color: "not-a-colour".to_string(),
            ..NetworkPlotOptions::default()
        };
        assert!(matches!(
            r.plot_network(&g, &options),
            Err(RenderError::UnknownOption { kind: "colour", .. })
        ));
        assert!(!tmp.path().join("network.png").exists());
        assert!(matches!(
            r.plot_network(&InteractionGraph::new(), &NetworkPlotOptions::default()),
            Err(RenderError::EmptyInput(_))
        ));
    }
}
