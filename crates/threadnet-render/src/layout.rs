//! Node placement for network figures.
//!
//! Every layout returns one `(x, y)` per node in node-index order, centred on
//! the origin and scaled so the largest coordinate magnitude is 1.
//!
//! - **spring**: Fruchterman–Reingold force simulation (`k = 0.5`, 50
//!   iterations) from seeded random starting points. Edge weights scale the
//!   attractive force.
//! - **circular**: nodes evenly spaced on the unit circle.
//! - **kamada_kawai**: stress majorization on hop distances, started from
//!   the circular layout. Pairs in different components are held at one hop
//!   beyond the largest finite distance.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use threadnet_graph::InteractionGraph;
use tracing::debug;

use crate::error::{RenderError, Result};

/// Optimal pairwise distance for the spring layout.
pub const SPRING_K: f64 = 0.5;
/// Spring layout iteration count.
pub const SPRING_ITERATIONS: usize = 50;

const STRESS_ITERATIONS: usize = 300;
const STRESS_TOL: f64 = 1e-6;
const MIN_DISTANCE: f64 = 0.01;

/// A 2-D position.
pub type Point = (f64, f64);

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Layout algorithm for [`crate::Renderer::plot_network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Spring,
    Circular,
    KamadaKawai,
}

impl Layout {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Circular => "circular",
            Self::KamadaKawai => "kamada_kawai",
        }
    }

    /// Compute positions for every node of `graph`.
    #[must_use]
    pub fn positions(self, graph: &InteractionGraph, seed: u64) -> Vec<Point> {
        match self {
            Self::Spring => spring_layout(graph, seed),
            Self::Circular => circular_layout(graph.node_count()),
            Self::KamadaKawai => kamada_kawai_layout(graph),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "spring" => Ok(Self::Spring),
            "circular" => Ok(Self::Circular),
            "kamada_kawai" | "kamada-kawai" => Ok(Self::KamadaKawai),
            other => Err(RenderError::unknown("layout", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Algorithms
// ---------------------------------------------------------------------------

/// Evenly spaced on the unit circle, starting at angle 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn circular_layout(n: usize) -> Vec<Point> {
    if n == 1 {
        return vec![(0.0, 0.0)];
    }
    (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            (theta.cos(), theta.sin())
        })
        .collect()
}

/// Fruchterman–Reingold force-directed placement.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn spring_layout(graph: &InteractionGraph, seed: u64) -> Vec<Point> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![(0.0, 0.0); n];
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut pos: Vec<Point> = (0..n).map(|_| (rng.r#gen::<f64>(), rng.r#gen::<f64>())).collect();
    let adjacency = weighted_adjacency(graph);

    // Temperature: a tenth of the initial spread, cooled linearly to zero.
    let mut t = 0.1;
    let dt = t / (SPRING_ITERATIONS as f64 + 1.0);

    for _ in 0..SPRING_ITERATIONS {
        let mut disp = vec![(0.0_f64, 0.0_f64); n];
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let dist = dx.hypot(dy).max(MIN_DISTANCE);
                let force = SPRING_K * SPRING_K / (dist * dist) - adjacency[i][j] * dist / SPRING_K;
                disp[i].0 += dx * force;
                disp[i].1 += dy * force;
            }
        }
        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = d.0.hypot(d.1).max(MIN_DISTANCE);
            p.0 += d.0 * t / len;
            p.1 += d.1 * t / len;
        }
        t -= dt;
    }

    rescale(&mut pos);
    pos
}

/// Stress majorization on hop distances.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn kamada_kawai_layout(graph: &InteractionGraph) -> Vec<Point> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![(0.0, 0.0); n];
    }

    let dist = distance_matrix(graph);
    let mut pos = circular_layout(n);

    let mut previous = stress(&pos, &dist);
    let mut iterations = 0;
    for _ in 0..STRESS_ITERATIONS {
        iterations += 1;
        for i in 0..n {
            let (mut sx, mut sy, mut sw) = (0.0, 0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let d = dist[i][j];
                let w = 1.0 / (d * d);
                let dx = pos[i].0 - pos[j].0;
                let dy = pos[i].1 - pos[j].1;
                let len = dx.hypot(dy).max(MIN_DISTANCE);
                sx += w * (pos[j].0 + d * dx / len);
                sy += w * (pos[j].1 + d * dy / len);
                sw += w;
            }
            if sw > 0.0 {
                pos[i] = (sx / sw, sy / sw);
            }
        }
        let current = stress(&pos, &dist);
        if (previous - current).abs() <= STRESS_TOL * previous.max(1.0) {
            break;
        }
        previous = current;
    }
    debug!(iterations, stress = previous, "kamada-kawai layout");

    rescale(&mut pos);
    pos
}

/// Centre on the origin and scale so the largest `|coordinate|` is 1.
#[allow(clippy::cast_precision_loss)]
pub fn rescale(pos: &mut [Point]) {
    if pos.is_empty() {
        return;
    }
    let n = pos.len() as f64;
    let cx = pos.iter().map(|p| p.0).sum::<f64>() / n;
    let cy = pos.iter().map(|p| p.1).sum::<f64>() / n;
    let mut lim = 0.0_f64;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        lim = lim.max(p.0.abs()).max(p.1.abs());
    }
    if lim > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= lim;
            p.1 /= lim;
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn weighted_adjacency(graph: &InteractionGraph) -> Vec<Vec<f64>> {
    let g = &graph.graph;
    let n = g.node_count();
    let mut adjacency = vec![vec![0.0; n]; n];
    for edge in g.edge_indices() {
        if let (Some((a, b)), Some(&w)) = (g.edge_endpoints(edge), g.edge_weight(edge)) {
            adjacency[a.index()][b.index()] += w;
            adjacency[b.index()][a.index()] += w;
        }
    }
    adjacency
}

#[allow(clippy::cast_precision_loss)]
fn distance_matrix(graph: &InteractionGraph) -> Vec<Vec<f64>> {
    let g = &graph.graph;
    let hops: Vec<Vec<Option<usize>>> = g
        .node_indices()
        .map(|s| threadnet_graph::hop_distances(graph, s))
        .collect();
    let unreachable = hops
        .iter()
        .flatten()
        .flatten()
        .copied()
        .max()
        .unwrap_or(0)
        + 1;
    hops.into_iter()
        .map(|row| {
            row.into_iter()
                .map(|d| d.unwrap_or(unreachable) as f64)
                .collect()
        })
        .collect()
}

fn stress(pos: &[Point], dist: &[Vec<f64>]) -> f64 {
    let mut total = 0.0;
    for i in 0..pos.len() {
        for j in (i + 1)..pos.len() {
            let d = dist[i][j];
            let actual = (pos[i].0 - pos[j].0).hypot(pos[i].1 - pos[j].1);
            total += (actual - d).powi(2) / (d * d);
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(n: usize) -> InteractionGraph {
        let names: Vec<String> = (0..n).map(|i| format!("n{i}")).collect();
        InteractionGraph::from_edges(
            names
                .windows(2)
                .map(|w| (w[0].clone(), w[1].clone(), 1.0))
                .collect::<Vec<_>>(),
        )
    }

    fn dist(a: Point, b: Point) -> f64 {
        (a.0 - b.0).hypot(a.1 - b.1)
    }

    fn assert_normalized(pos: &[Point]) {
        let max = pos
            .iter()
            .map(|p| p.0.abs().max(p.1.abs()))
            .fold(0.0_f64, f64::max);
        assert!((max - 1.0).abs() < 1e-9, "max coordinate {max}");
        for p in pos {
            assert!(p.0.is_finite() && p.1.is_finite());
        }
    }

    #[test]
    fn layout_parsing() {
        assert_eq!("kamada_kawai".parse::<Layout>().ok(), Some(Layout::KamadaKawai));
        assert_eq!("circular".parse::<Layout>().ok(), Some(Layout::Circular));
        assert!(matches!(
            "hive".parse::<Layout>(),
            Err(RenderError::UnknownOption { kind: "layout", .. })
        ));
    }

    #[test]
    fn circular_points_lie_on_unit_circle() {
        let pos = circular_layout(6);
        assert_eq!(pos.len(), 6);
        for p in &pos {
            assert!((p.0.hypot(p.1) - 1.0).abs() < 1e-12);
        }
        assert!((pos[0].0 - 1.0).abs() < 1e-12);
        assert_eq!(circular_layout(1), vec![(0.0, 0.0)]);
        assert!(circular_layout(0).is_empty());
    }

    #[test]
    fn spring_is_deterministic_for_a_seed() {
        let g = path(6);
        let a = spring_layout(&g, 42);
        let b = spring_layout(&g, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 6);
        assert_normalized(&a);
        assert_ne!(a, spring_layout(&g, 7));
    }

    #[test]
    fn kamada_kawai_unrolls_a_path() {
        let pos = kamada_kawai_layout(&path(5));
        assert_normalized(&pos);
        // Ends of the path sit further apart than any adjacent pair.
        let ends = dist(pos[0], pos[4]);
        for w in pos.windows(2) {
            assert!(ends > dist(w[0], w[1]));
        }
    }

    #[test]
    fn kamada_kawai_handles_disconnected_graphs() {
        let g = InteractionGraph::from_edges([("a", "b", 1.0), ("c", "d", 1.0)]);
        let pos = kamada_kawai_layout(&g);
        assert_eq!(pos.len(), 4);
        assert_normalized(&pos);
    }

    #[test]
    fn tiny_graphs_sit_at_origin() {
        let mut g = InteractionGraph::new();
        assert!(Layout::Spring.positions(&g, 1).is_empty());
        g.add_node("solo".into());
        assert_eq!(Layout::KamadaKawai.positions(&g, 1), vec![(0.0, 0.0)]);
    }
}
