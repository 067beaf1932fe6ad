//! Eigenvector centrality via power iteration.
//!
//! # Algorithm
//!
//! 1. Start from the uniform vector `1/n`.
//! 2. Each step computes `x ← (A + I) · x_prev` and rescales `x` to unit
//!    Euclidean length. Adding the identity keeps the iteration from
//!    oscillating on bipartite graphs (author–topic graphs always are).
//! 3. Stop once `Σ|x - x_prev| < n · tol`.
//!
//! Edge weights are ignored. Failing to converge within `max_iter` steps is
//! an error, not a silently truncated result.

use petgraph::graph::UnGraph;
use threadnet_core::table::Value;
use tracing::{debug, instrument};

use crate::error::{GraphError, Result};
use crate::graph::build::InteractionGraph;
use crate::metrics::{Scores, keyed};

/// Iteration cap used by [`crate::metrics::table::centrality_table`].
pub const DEFAULT_MAX_ITER: usize = 1000;

/// Convergence tolerance used by [`crate::metrics::table::centrality_table`].
pub const DEFAULT_TOL: f64 = 1e-6;

/// Compute eigenvector centrality for every node.
///
/// # Errors
///
/// Returns [`GraphError::EmptyGraph`] for a graph without nodes and
/// [`GraphError::NotConverged`] if `max_iter` steps are not enough.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn eigenvector_centrality(graph: &InteractionGraph, max_iter: usize, tol: f64) -> Result<Scores> {
    let scores = eigenvector_scores(&graph.graph, max_iter, tol)?;
    Ok(keyed(&graph.graph, &scores))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn eigenvector_scores(
    g: &UnGraph<Value, f64>,
    max_iter: usize,
    tol: f64,
) -> Result<Vec<f64>> {
    let n = g.node_count();
    if n == 0 {
        return Err(GraphError::EmptyGraph);
    }

    let mut x: Vec<f64> = vec![1.0 / n as f64; n];

    for iteration in 1..=max_iter {
        let prev = x.clone();
        for v in g.node_indices() {
            for w in g.neighbors(v) {
                x[w.index()] += prev[v.index()];
            }
        }

        let norm = x.iter().map(|s| s * s).sum::<f64>().sqrt();
        let norm = if norm > 0.0 { norm } else { 1.0 };
        for s in &mut x {
            *s /= norm;
        }

        let delta: f64 = x.iter().zip(&prev).map(|(a, b)| (a - b).abs()).sum();
        if delta < n as f64 * tol {
            debug!(iteration, "eigenvector centrality converged");
            return Ok(x);
        }
    }

    Err(GraphError::NotConverged {
        iterations: max_iter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_cycle_is_uniform() {
        let g = InteractionGraph::from_edges([("a", "b", 1.0), ("b", "c", 1.0), ("c", "a", 1.0)]);
        let ev = eigenvector_centrality(&g, DEFAULT_MAX_ITER, DEFAULT_TOL).expect("converges");
        let expected = 1.0 / 3.0_f64.sqrt();
        for node in ["a", "b", "c"] {
            assert!((ev[&Value::from(node)] - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn star_centre_dominates() {
        let g = InteractionGraph::from_edges([("c", "a", 1.0), ("c", "b", 1.0), ("c", "d", 1.0)]);
        let ev = eigenvector_centrality(&g, DEFAULT_MAX_ITER, DEFAULT_TOL).expect("converges");
        // Principal eigenvector of a 3-leaf star: centre 1/sqrt(2), leaves 1/sqrt(6).
        assert!((ev[&Value::from("c")] - 0.5_f64.sqrt()).abs() < 1e-4);
        assert!((ev[&Value::from("a")] - (1.0 / 6.0_f64).sqrt()).abs() < 1e-4);
    }

    #[test]
    fn empty_graph_is_an_error() {
        assert!(matches!(
            eigenvector_centrality(&InteractionGraph::new(), 100, 1e-6),
            Err(GraphError::EmptyGraph)
        ));
    }

    #[test]
    fn too_few_iterations_is_an_error() {
        let g = InteractionGraph::from_edges([("c", "a", 1.0), ("c", "b", 1.0), ("c", "d", 1.0)]);
        assert!(matches!(
            eigenvector_centrality(&g, 1, 1e-12),
            Err(GraphError::NotConverged { iterations: 1 })
        ));
    }
}
