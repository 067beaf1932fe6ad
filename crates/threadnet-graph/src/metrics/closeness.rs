//! Closeness centrality (Wasserman–Faust form).
//!
//! For a node `u` reaching `r` nodes (itself included) at total hop distance
//! `d`, the score is `((r - 1) / d) * ((r - 1) / (n - 1))`. The second factor
//! scales down nodes stuck in small components, so scores remain comparable
//! across a disconnected graph. Isolated nodes score 0.0.

use petgraph::graph::UnGraph;
use threadnet_core::table::Value;
use tracing::instrument;

use crate::graph::build::InteractionGraph;
use crate::graph::stats::bfs_distances;
use crate::metrics::{Scores, keyed};

/// Compute closeness centrality for every node.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn closeness_centrality(graph: &InteractionGraph) -> Scores {
    keyed(&graph.graph, &closeness_scores(&graph.graph))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn closeness_scores(g: &UnGraph<Value, f64>) -> Vec<f64> {
    let n = g.node_count();
    g.node_indices()
        .map(|u| {
            let (reached, total) = bfs_distances(g, u)
                .into_iter()
                .flatten()
                .fold((0_usize, 0_usize), |(r, t), d| (r + 1, t + d));
            if total == 0 || n <= 1 {
                return 0.0;
            }
            let others = (reached - 1) as f64;
            (others / total as f64) * (others / (n - 1) as f64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_closeness() {
        // a - b - c: b reaches both at distance 1.
        let g = InteractionGraph::from_edges([("a", "b", 1.0), ("b", "c", 1.0)]);
        let cc = closeness_centrality(&g);
        assert!((cc[&Value::from("b")] - 1.0).abs() < 1e-10);
        assert!((cc[&Value::from("a")] - 2.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn disconnected_scaling() {
        // {a-b} and {c-d-e}: a reaches 1 node at distance 1 among n=5.
        let g = InteractionGraph::from_edges([("a", "b", 1.0), ("c", "d", 1.0), ("d", "e", 1.0)]);
        let cc = closeness_centrality(&g);
        assert!((cc[&Value::from("a")] - 0.25).abs() < 1e-10);
        assert!((cc[&Value::from("d")] - 0.5).abs() < 1e-10);
    }

    #[test]
    fn isolated_node_scores_zero() {
        let mut g = InteractionGraph::from_edges([("a", "b", 1.0)]);
        g.add_node("z".into());
        assert!(closeness_centrality(&g)[&Value::from("z")].abs() < 1e-10);
    }
}
