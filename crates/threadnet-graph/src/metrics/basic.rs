//! Degree centrality, degree sequences, and connected components.

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use threadnet_core::table::Value;

use crate::graph::build::InteractionGraph;
use crate::metrics::{Scores, keyed};

// ---------------------------------------------------------------------------
// Degree Centrality
// ---------------------------------------------------------------------------

/// Degree centrality for every node: `degree / (n - 1)`.
///
/// A graph with a single node gives that node 1.0.
#[must_use]
pub fn degree_centrality(graph: &InteractionGraph) -> Scores {
    keyed(&graph.graph, &degree_scores(&graph.graph))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn degree_scores(g: &UnGraph<Value, f64>) -> Vec<f64> {
    let n = g.node_count();
    if n <= 1 {
        return vec![1.0; n];
    }
    let scale = 1.0 / (n - 1) as f64;
    g.node_indices()
        .map(|idx| g.neighbors(idx).count() as f64 * scale)
        .collect()
}

/// Node degrees sorted in descending order.
#[must_use]
pub fn degree_sequence(graph: &InteractionGraph) -> Vec<usize> {
    let mut degrees = graph.degrees();
    degrees.sort_unstable_by(|a, b| b.cmp(a));
    degrees
}

// ---------------------------------------------------------------------------
// Connected Components
// ---------------------------------------------------------------------------

/// Connected components in discovery order (by lowest node index), each
/// listing its nodes in BFS order.
#[must_use]
pub fn connected_components(g: &UnGraph<Value, f64>) -> Vec<Vec<NodeIndex>> {
    let mut seen = vec![false; g.node_count()];
    let mut components = Vec::new();

    for start in g.node_indices() {
        if seen[start.index()] {
            continue;
        }
        seen[start.index()] = true;
        let mut members = vec![start];
        let mut cursor = 0;
        while let Some(&v) = members.get(cursor) {
            cursor += 1;
            for w in g.neighbors(v) {
                if !seen[w.index()] {
                    seen[w.index()] = true;
                    members.push(w);
                }
            }
        }
        components.push(members);
    }
    components
}

/// Component size breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentInfo {
    /// Number of connected components.
    pub count: usize,
    /// Component sizes, largest first.
    pub sizes: Vec<usize>,
    /// Nodes without any edge.
    pub isolated_nodes: usize,
}

impl ComponentInfo {
    /// Compute the component breakdown of `graph`.
    #[must_use]
    pub fn of(graph: &InteractionGraph) -> Self {
        let mut sizes: Vec<usize> = connected_components(&graph.graph)
            .iter()
            .map(Vec::len)
            .collect();
        sizes.sort_unstable_by(|a, b| b.cmp(a));
        Self {
            count: sizes.len(),
            isolated_nodes: sizes.iter().filter(|&&s| s == 1).count(),
            sizes,
        }
    }

    /// Size of the largest component (0 for an empty graph).
    #[must_use]
    pub fn largest(&self) -> usize {
        self.sizes.first().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn star() -> InteractionGraph {
        InteractionGraph::from_edges([("c", "a", 1.0), ("c", "b", 1.0), ("c", "d", 1.0)])
    }

    #[test]
    fn star_degree_centrality() {
        let dc = degree_centrality(&star());
        assert!((dc[&Value::from("c")] - 1.0).abs() < 1e-10);
        assert!((dc[&Value::from("a")] - 1.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn single_node_scores_one() {
        let mut g = InteractionGraph::new();
        g.add_node(Value::Int(7));
        let dc = degree_centrality(&g);
        assert!((dc[&Value::Int(7)] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn sequence_is_descending() {
        assert_eq!(degree_sequence(&star()), vec![3, 1, 1, 1]);
    }

    #[test]
    fn components_and_isolated_nodes() {
        let mut g = InteractionGraph::from_edges([("a", "b", 1.0), ("c", "d", 1.0), ("d", "e", 1.0)]);
        g.add_node("lonely".into());
        let info = ComponentInfo::of(&g);
        assert_eq!(info.count, 3);
        assert_eq!(info.sizes, vec![3, 2, 1]);
        assert_eq!(info.isolated_nodes, 1);
        assert_eq!(info.largest(), 3);
    }
}
