//! Whole-graph properties.
//!
//! # Statistics Provided
//!
//! - **num_nodes / num_edges**: node and distinct-edge counts.
//! - **density**: `2E / (V(V-1))` for an undirected simple graph; 0.0 for
//!   graphs with fewer than two nodes.
//! - **num_components**: number of connected components.
//! - **avg_degree**: `2E / V`.
//! - **diameter / avg_shortest_path**: reported when the graph is connected.
//! - **diameter_largest_cc / avg_shortest_path_largest_cc**: reported instead
//!   when it is not, computed on the largest component (the first one found
//!   when several tie).
//!
//! Path lengths are hop counts; edge weights are ignored.

use std::collections::VecDeque;

use petgraph::graph::{NodeIndex, UnGraph};
use serde::Serialize;
use threadnet_core::table::Value;
use tracing::instrument;

use crate::error::{GraphError, Result};
use crate::graph::build::InteractionGraph;
use crate::metrics::basic::connected_components;

// ---------------------------------------------------------------------------
// GraphProperties
// ---------------------------------------------------------------------------

/// Summary statistics for an interaction graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphProperties {
    pub num_nodes: usize,
    pub num_edges: usize,
    pub density: f64,
    pub num_components: usize,
    pub avg_degree: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diameter: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_shortest_path: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diameter_largest_cc: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_shortest_path_largest_cc: Option<f64>,
}

impl GraphProperties {
    /// Return `true` if the graph is a single connected component.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.num_components == 1
    }
}

/// Compute [`GraphProperties`] for `graph`.
///
/// # Errors
///
/// Returns [`GraphError::EmptyGraph`] for a graph without nodes.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn graph_properties(graph: &InteractionGraph) -> Result<GraphProperties> {
    let g = &graph.graph;
    let num_nodes = g.node_count();
    if num_nodes == 0 {
        return Err(GraphError::EmptyGraph);
    }
    let num_edges = g.edge_count();

    let components = connected_components(g);
    let mut props = GraphProperties {
        num_nodes,
        num_edges,
        density: compute_density(num_nodes, num_edges),
        num_components: components.len(),
        avg_degree: compute_avg_degree(num_nodes, num_edges),
        diameter: None,
        avg_shortest_path: None,
        diameter_largest_cc: None,
        avg_shortest_path_largest_cc: None,
    };

    if components.len() == 1 {
        let (diameter, avg) = path_stats(g, &components[0]);
        props.diameter = Some(diameter);
        props.avg_shortest_path = Some(avg);
    } else if let Some(largest) = largest_component(&components) {
        let (diameter, avg) = path_stats(g, largest);
        props.diameter_largest_cc = Some(diameter);
        props.avg_shortest_path_largest_cc = Some(avg);
    }

    Ok(props)
}

/// First component of maximal size.
fn largest_component(components: &[Vec<NodeIndex>]) -> Option<&Vec<NodeIndex>> {
    let max = components.iter().map(Vec::len).max()?;
    components.iter().find(|c| c.len() == max)
}

/// Diameter and mean shortest-path length within one connected component.
///
/// A single-node component has diameter 0 and mean path length 0.0.
#[allow(clippy::cast_precision_loss)]
fn path_stats(g: &UnGraph<Value, f64>, component: &[NodeIndex]) -> (usize, f64) {
    let n = component.len();
    if n < 2 {
        return (0, 0.0);
    }

    let mut diameter = 0_usize;
    let mut total = 0_usize;
    for &s in component {
        for d in bfs_distances(g, s).into_iter().flatten() {
            diameter = diameter.max(d);
            total += d;
        }
    }
    (diameter, total as f64 / (n * (n - 1)) as f64)
}

/// Hop distance from `source` to every node of `graph`, in node-index order
/// (`None` = unreachable).
#[must_use]
pub fn hop_distances(graph: &InteractionGraph, source: NodeIndex) -> Vec<Option<usize>> {
    bfs_distances(&graph.graph, source)
}

/// Hop distance from `s` to every node (`None` = unreachable).
pub(crate) fn bfs_distances(g: &UnGraph<Value, f64>, s: NodeIndex) -> Vec<Option<usize>> {
    let mut dist = vec![None; g.node_count()];
    dist[s.index()] = Some(0);
    let mut queue = VecDeque::from([s]);

    while let Some(v) = queue.pop_front() {
        let dv = dist[v.index()].unwrap_or(0);
        for w in g.neighbors(v) {
            if dist[w.index()].is_none() {
                dist[w.index()] = Some(dv + 1);
                queue.push_back(w);
            }
        }
    }
    dist
}

// ---------------------------------------------------------------------------
// Internal helpers (cast precision suppressed at function scope)
// ---------------------------------------------------------------------------

#[allow(clippy::cast_precision_loss)]
fn compute_density(node_count: usize, edge_count: usize) -> f64 {
    if node_count < 2 {
        return 0.0_f64;
    }
    let max_edges = (node_count * (node_count - 1)) as f64;
    2.0 * edge_count as f64 / max_edges
}

#[allow(clippy::cast_precision_loss)]
fn compute_avg_degree(node_count: usize, edge_count: usize) -> f64 {
    if node_count == 0 {
        return 0.0_f64;
    }
    2.0 * edge_count as f64 / node_count as f64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_graph_properties() {
        let g = InteractionGraph::from_edges([("a", "b", 1.0), ("b", "c", 1.0), ("c", "d", 1.0)]);
        let p = graph_properties(&g).expect("props");
        assert_eq!(p.num_nodes, 4);
        assert_eq!(p.num_edges, 3);
        assert!((p.density - 0.5).abs() < 1e-10);
        assert!((p.avg_degree - 1.5).abs() < 1e-10);
        assert!(p.is_connected());
        assert_eq!(p.diameter, Some(3));
        // Pair distances: 1,2,3,1,2,1 -> 10 / 6.
        assert!((p.avg_shortest_path.expect("asp") - 10.0 / 6.0).abs() < 1e-10);
        assert_eq!(p.diameter_largest_cc, None);
    }

    #[test]
    fn disconnected_uses_largest_component() {
        let g = InteractionGraph::from_edges([
            ("a", "b", 1.0),
            ("c", "d", 1.0),
            ("d", "e", 1.0),
        ]);
        let p = graph_properties(&g).expect("props");
        assert_eq!(p.num_components, 2);
        assert_eq!(p.diameter, None);
        assert_eq!(p.diameter_largest_cc, Some(2));
        assert!((p.avg_shortest_path_largest_cc.expect("asp") - 8.0 / 6.0).abs() < 1e-10);

        let json = serde_json::to_value(&p).expect("serialize");
        assert!(json.get("diameter").is_none());
        assert_eq!(json["diameter_largest_cc"], 2);
    }

    #[test]
    fn single_node_has_zero_density() {
        let mut g = InteractionGraph::new();
        g.add_node("solo".into());
        let p = graph_properties(&g).expect("props");
        assert_eq!(p.density, 0.0);
        assert_eq!(p.diameter, Some(0));
    }

    #[test]
    fn hop_distances_mark_unreachable_nodes() {
        let g = InteractionGraph::from_edges([("a", "b", 1.0), ("b", "c", 1.0), ("x", "y", 1.0)]);
        let a = g.node_index(&Value::from("a")).expect("a");
        assert_eq!(hop_distances(&g, a), vec![Some(0), Some(1), Some(2), None, None]);
    }

    #[test]
    fn empty_graph_is_an_error() {
        assert!(matches!(
            graph_properties(&InteractionGraph::new()),
            Err(GraphError::EmptyGraph)
        ));
    }
}
