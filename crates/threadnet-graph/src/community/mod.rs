//! Community detection.
//!
//! Two methods are available:
//!
//! - [`CommunityMethod::Louvain`]: multi-level Louvain on edge weights
//!   (requires the `louvain` cargo feature, on by default).
//! - [`CommunityMethod::Greedy`]: Clauset–Newman–Moore greedy modularity
//!   merging on the unweighted graph.
//!
//! ## Modularity
//!
//! Q = (1/2m) * Σij[Aij - (ki*kj)/(2m)] * δ(ci, cj)
//!
//! Where `Aij` is the edge weight between `i` and `j`, `ki` the weighted
//! degree of `i`, and `m` the total edge weight.
//!
//! Community labels are dense integers starting at 0. Their assignment is
//! not stable across runs for Louvain without a seed; compare groupings, not
//! label values.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use threadnet_core::table::Value;
use tracing::{info, instrument};

use crate::error::{GraphError, Result};
use crate::graph::build::InteractionGraph;

pub mod greedy;
#[cfg(feature = "louvain")]
pub mod louvain;

/// Community label per node id.
pub type Communities = HashMap<Value, u32>;

// ---------------------------------------------------------------------------
// CommunityMethod
// ---------------------------------------------------------------------------

/// Community detection algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunityMethod {
    #[default]
    Louvain,
    Greedy,
}

impl CommunityMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Louvain => "louvain",
            Self::Greedy => "greedy",
        }
    }
}

impl fmt::Display for CommunityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommunityMethod {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "louvain" => Ok(Self::Louvain),
            "greedy" => Ok(Self::Greedy),
            other => Err(GraphError::unknown("community method", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Louvain tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct LouvainConfig {
    /// Resolution parameter (higher = more, smaller communities).
    pub resolution: f64,
    /// Minimum modularity gain for another aggregation level.
    pub threshold: f64,
    /// Random seed for node visiting order; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for LouvainConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            threshold: 1e-7,
            seed: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Detect communities with default settings.
#[must_use]
pub fn detect_communities(graph: &InteractionGraph, method: CommunityMethod) -> Communities {
    detect_communities_with(graph, method, &LouvainConfig::default())
}

/// Detect communities; `config` applies to Louvain only.
///
/// Without the `louvain` feature a Louvain request logs a warning and runs
/// greedy merging instead.
#[must_use]
#[instrument(skip(graph, config), fields(nodes = graph.node_count()))]
pub fn detect_communities_with(
    graph: &InteractionGraph,
    method: CommunityMethod,
    config: &LouvainConfig,
) -> Communities {
    let labels = match method {
        CommunityMethod::Greedy => greedy::greedy_modularity(graph),
        CommunityMethod::Louvain => louvain_or_fallback(graph, config),
    };

    let communities: Communities = graph
        .graph
        .node_indices()
        .filter_map(|idx| Some((graph.node_id(idx)?.clone(), *labels.get(idx.index())?)))
        .collect();

    info!(
        %method,
        communities = count_communities(&communities),
        "detected communities"
    );
    communities
}

#[cfg(feature = "louvain")]
fn louvain_or_fallback(graph: &InteractionGraph, config: &LouvainConfig) -> Vec<u32> {
    louvain::louvain(graph, config)
}

#[cfg(not(feature = "louvain"))]
fn louvain_or_fallback(graph: &InteractionGraph, _config: &LouvainConfig) -> Vec<u32> {
    tracing::warn!("louvain support not compiled in; falling back to greedy modularity");
    greedy::greedy_modularity(graph)
}

/// Number of distinct labels.
#[must_use]
pub fn count_communities(communities: &Communities) -> usize {
    communities
        .values()
        .copied()
        .collect::<std::collections::HashSet<_>>()
        .len()
}

/// `(label, size)` pairs, largest community first (ties by label).
#[must_use]
pub fn community_sizes(communities: &Communities) -> Vec<(u32, usize)> {
    let mut sizes: HashMap<u32, usize> = HashMap::new();
    for &label in communities.values() {
        *sizes.entry(label).or_default() += 1;
    }
    let mut sizes: Vec<(u32, usize)> = sizes.into_iter().collect();
    sizes.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    sizes
}

/// Weighted modularity of a partition.
///
/// Nodes missing from `communities` are treated as singletons. A graph
/// without edge weight has modularity 0.0.
#[must_use]
pub fn modularity(graph: &InteractionGraph, communities: &Communities) -> f64 {
    let g = &graph.graph;
    let n = g.node_count();

    // Unlabelled nodes get a private key of their own.
    let labels: Vec<std::result::Result<u32, usize>> = g
        .node_indices()
        .map(|idx| {
            graph
                .node_id(idx)
                .and_then(|id| communities.get(id))
                .copied()
                .ok_or(idx.index())
        })
        .collect();

    let mut degree = vec![0.0_f64; n];
    let mut m = 0.0_f64;
    for edge in g.edge_indices() {
        if let (Some((a, b)), Some(&w)) = (g.edge_endpoints(edge), g.edge_weight(edge)) {
            degree[a.index()] += w;
            degree[b.index()] += w;
            m += w;
        }
    }
    if m <= 0.0 {
        return 0.0;
    }

    let mut internal: HashMap<std::result::Result<u32, usize>, f64> = HashMap::new();
    let mut totals: HashMap<std::result::Result<u32, usize>, f64> = HashMap::new();
    for edge in g.edge_indices() {
        if let (Some((a, b)), Some(&w)) = (g.edge_endpoints(edge), g.edge_weight(edge)) {
            if labels[a.index()] == labels[b.index()] {
                *internal.entry(labels[a.index()]).or_default() += w;
            }
        }
    }
    for (i, &k) in degree.iter().enumerate() {
        *totals.entry(labels[i]).or_default() += k;
    }

    totals
        .iter()
        .map(|(label, &tot)| {
            let lc = internal.get(label).copied().unwrap_or(0.0);
            lc / m - (tot / (2.0 * m)).powi(2)
        })
        .sum()
}

/// Relabel an arbitrary label vector densely from 0 in order of first
/// appearance.
pub(crate) fn renumber(labels: &[usize]) -> Vec<u32> {
    let mut mapping: HashMap<usize, u32> = HashMap::new();
    let mut next_id = 0_u32;
    labels
        .iter()
        .map(|&c| {
            *mapping.entry(c).or_insert_with(|| {
                let id = next_id;
                next_id += 1;
                id
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn two_triangles() -> InteractionGraph {
        InteractionGraph::from_edges([
            ("a", "b", 1.0),
            ("b", "c", 1.0),
            ("c", "a", 1.0),
            ("x", "y", 1.0),
            ("y", "z", 1.0),
            ("z", "x", 1.0),
        ])
    }

    fn assert_triangles_split(c: &Communities) {
        assert_eq!(count_communities(c), 2);
        let label = |s: &str| c[&Value::from(s)];
        assert_eq!(label("a"), label("b"));
        assert_eq!(label("b"), label("c"));
        assert_eq!(label("x"), label("y"));
        assert_eq!(label("y"), label("z"));
        assert_ne!(label("a"), label("x"));
        let mut labels: Vec<u32> = c.values().copied().collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels, vec![0, 1]);
    }

    #[test]
    fn both_methods_split_disjoint_triangles() {
        let g = two_triangles();
        assert_triangles_split(&detect_communities(&g, CommunityMethod::Greedy));
        assert_triangles_split(&detect_communities(&g, CommunityMethod::Louvain));
    }

    #[test]
    fn method_parsing() {
        assert_eq!(
            "greedy".parse::<CommunityMethod>().ok(),
            Some(CommunityMethod::Greedy)
        );
        assert!(matches!(
            "label_propagation".parse::<CommunityMethod>(),
            Err(GraphError::UnknownOption { .. })
        ));
    }

    #[test]
    fn modularity_of_triangle_split() {
        let g = two_triangles();
        let c = detect_communities(&g, CommunityMethod::Greedy);
        // Each triangle holds half the edges and half the degree: 2 * (1/2 - 1/4).
        assert!((modularity(&g, &c) - 0.5).abs() < 1e-10);

        let all_one: Communities = g.nodes().map(|v| (v.clone(), 0)).collect();
        assert!(modularity(&g, &all_one).abs() < 1e-10);
    }

    #[test]
    fn sizes_sorted_largest_first() {
        let c: Communities = [("a", 1), ("b", 1), ("c", 0), ("d", 1)]
            .into_iter()
            .map(|(k, v)| (Value::from(k), v))
            .collect();
        assert_eq!(community_sizes(&c), vec![(1, 3), (0, 1)]);
    }

    #[test]
    fn empty_graph_has_no_communities() {
        let g = InteractionGraph::new();
        assert!(detect_communities(&g, CommunityMethod::Louvain).is_empty());
        assert!(detect_communities(&g, CommunityMethod::Greedy).is_empty());
    }

    #[test]
    fn renumber_is_dense_in_first_seen_order() {
        assert_eq!(renumber(&[7, 3, 7, 9, 3]), vec![0, 1, 0, 2, 1]);
    }
}
