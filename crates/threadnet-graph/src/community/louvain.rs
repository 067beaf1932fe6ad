//! Multi-level Louvain community detection.
//!
//! ## Algorithm Overview
//!
//! 1. **Local moving**: visit nodes in random order and move each to the
//!    neighbouring community with the largest modularity gain, until a full
//!    pass moves nothing.
//! 2. **Aggregation**: collapse every community into a super-node (internal
//!    weight becomes a self-loop) and repeat on the smaller graph.
//! 3. Stop when a level moves no node or improves modularity by less than
//!    [`LouvainConfig::threshold`].
//!
//! Reference: Blondel et al., "Fast unfolding of communities in large
//! networks", J. Stat. Mech. (2008).

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::community::{LouvainConfig, renumber};
use crate::graph::build::InteractionGraph;

/// Weighted graph on dense `usize` nodes, rebuilt at each level.
#[derive(Debug, Clone)]
struct Level {
    /// Neighbour lists, self-loops excluded.
    adj: Vec<Vec<(usize, f64)>>,
    /// Self-loop weight per node (internal weight of the collapsed community).
    self_loops: Vec<f64>,
}

impl Level {
    fn from_graph(graph: &InteractionGraph) -> Self {
        let g = &graph.graph;
        let n = g.node_count();
        let mut adj = vec![Vec::new(); n];
        for edge in g.edge_indices() {
            if let (Some((a, b)), Some(&w)) = (g.edge_endpoints(edge), g.edge_weight(edge)) {
                adj[a.index()].push((b.index(), w));
                adj[b.index()].push((a.index(), w));
            }
        }
        Self {
            adj,
            self_loops: vec![0.0; n],
        }
    }

    fn len(&self) -> usize {
        self.adj.len()
    }

    /// Weighted degree; a self-loop counts twice.
    fn degree(&self, node: usize) -> f64 {
        self.adj[node].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.self_loops[node]
    }

    fn total_weight(&self) -> f64 {
        (0..self.len()).map(|v| self.degree(v)).sum::<f64>() / 2.0
    }

    fn modularity(&self, community: &[usize], resolution: f64) -> f64 {
        let m = self.total_weight();
        if m <= 0.0 {
            return 0.0;
        }
        let mut internal: HashMap<usize, f64> = HashMap::new();
        let mut totals: HashMap<usize, f64> = HashMap::new();
        for v in 0..self.len() {
            let c = community[v];
            *totals.entry(c).or_default() += self.degree(v);
            let mut inside = self.self_loops[v];
            for &(u, w) in &self.adj[v] {
                if community[u] == c {
                    // Each internal edge is seen from both ends.
                    inside += w / 2.0;
                }
            }
            *internal.entry(c).or_default() += inside;
        }
        totals
            .iter()
            .map(|(c, &tot)| {
                let lc = internal.get(c).copied().unwrap_or(0.0);
                lc / m - resolution * (tot / (2.0 * m)).powi(2)
            })
            .sum()
    }

    /// Collapse communities (dense labels `0..k`) into a new level.
    fn aggregate(&self, community: &[usize], k: usize) -> Self {
        let mut self_loops = vec![0.0; k];
        let mut between: HashMap<(usize, usize), f64> = HashMap::new();

        for v in 0..self.len() {
            let cv = community[v];
            self_loops[cv] += self.self_loops[v];
            for &(u, w) in &self.adj[v] {
                let cu = community[u];
                if cu == cv {
                    self_loops[cv] += w / 2.0;
                } else if cv < cu {
                    *between.entry((cv, cu)).or_default() += w;
                }
            }
        }

        let mut adj = vec![Vec::new(); k];
        let mut pairs: Vec<((usize, usize), f64)> = between.into_iter().collect();
        pairs.sort_by_key(|&(key, _)| key);
        for ((a, b), w) in pairs {
            adj[a].push((b, w));
            adj[b].push((a, w));
        }
        Self { adj, self_loops }
    }
}

/// Run Louvain on `graph`; returns a dense label per node index.
pub(crate) fn louvain(graph: &InteractionGraph, config: &LouvainConfig) -> Vec<u32> {
    let n = graph.node_count();
    if n == 0 {
        return Vec::new();
    }

    let mut level = Level::from_graph(graph);
    let m = level.total_weight();
    if m <= 0.0 {
        // No edge weight: every node is its own community.
        return renumber(&(0..n).collect::<Vec<_>>());
    }

    let mut rng = config
        .seed
        .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

    // membership[v] = current super-node of original node v.
    let mut membership: Vec<usize> = (0..n).collect();
    let mut modularity = level.modularity(&(0..level.len()).collect::<Vec<_>>(), config.resolution);

    for depth in 0.. {
        let (community, moved) = local_moving(&level, m, config.resolution, &mut rng);
        if !moved {
            break;
        }

        let dense: Vec<usize> = renumber(&community)
            .into_iter()
            .map(|c| c as usize)
            .collect();
        let k = dense.iter().max().map_or(0, |&c| c + 1);

        let new_modularity = level.modularity(&dense, config.resolution);
        for slot in &mut membership {
            *slot = dense[*slot];
        }
        debug!(depth, communities = k, modularity = new_modularity, "louvain level");

        let gain = new_modularity - modularity;
        modularity = new_modularity;
        level = level.aggregate(&dense, k);

        if gain < config.threshold || k == 1 {
            break;
        }
    }

    renumber(&membership)
}

/// One local-moving phase. Returns the community of each node and whether
/// any node changed community.
fn local_moving(level: &Level, m: f64, resolution: f64, rng: &mut StdRng) -> (Vec<usize>, bool) {
    let n = level.len();
    let degrees: Vec<f64> = (0..n).map(|v| level.degree(v)).collect();
    let mut community: Vec<usize> = (0..n).collect();
    let mut totals: Vec<f64> = degrees.clone();

    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let mut moved_any = false;
    loop {
        let mut moved = false;
        for &node in &order {
            let current = community[node];
            let k = degrees[node];

            // Weight from node to each neighbouring community.
            let mut links: HashMap<usize, f64> = HashMap::new();
            for &(u, w) in &level.adj[node] {
                *links.entry(community[u]).or_default() += w;
            }

            totals[current] -= k;
            let gain = |c: usize, w: f64| w - resolution * totals[c] * k / (2.0 * m);

            let mut best = current;
            let mut best_gain = gain(current, links.get(&current).copied().unwrap_or(0.0));
            let mut candidates: Vec<(usize, f64)> = links.into_iter().collect();
            candidates.sort_by_key(|&(c, _)| c);
            for (c, w) in candidates {
                let g = gain(c, w);
                if g > best_gain {
                    best_gain = g;
                    best = c;
                }
            }

            totals[best] += k;
            if best != current {
                community[node] = best;
                moved = true;
                moved_any = true;
            }
        }
        if !moved {
            break;
        }
    }

    (community, moved_any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::community::{Communities, modularity as partition_modularity};

    fn keyed(graph: &InteractionGraph, labels: &[u32]) -> Communities {
        graph
            .nodes()
            .cloned()
            .zip(labels.iter().copied())
            .collect()
    }

    #[test]
    fn barbell_splits_at_bridge() {
        // Two 4-cliques joined by a single bridge d - e.
        let mut edges = Vec::new();
        for side in [["a", "b", "c", "d"], ["e", "f", "g", "h"]] {
            for i in 0..4 {
                for j in (i + 1)..4 {
                    edges.push((side[i], side[j], 1.0));
                }
            }
        }
        edges.push(("d", "e", 1.0));
        let g = InteractionGraph::from_edges(edges);

        let config = LouvainConfig {
            seed: Some(42),
            ..LouvainConfig::default()
        };
        let labels = louvain(&g, &config);
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[0], 0);
        assert!(labels[..4].iter().all(|&l| l == labels[0]));
        assert!(labels[4..].iter().all(|&l| l == labels[4]));
        assert_ne!(labels[0], labels[4]);

        let q = partition_modularity(&g, &keyed(&g, &labels));
        assert!(q > 0.4);
    }

    #[test]
    fn heavy_edge_pulls_pairs_together() {
        // A path where weights favour {a,b} and {c,d}.
        let g = InteractionGraph::from_edges([("a", "b", 10.0), ("b", "c", 0.1), ("c", "d", 10.0)]);
        let labels = louvain(
            &g,
            &LouvainConfig {
                seed: Some(7),
                ..LouvainConfig::default()
            },
        );
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[2], labels[3]);
        assert_ne!(labels[1], labels[2]);
    }

    #[test]
    fn zero_weight_graph_is_all_singletons() {
        let g = InteractionGraph::from_edges([("a", "b", 0.0), ("b", "c", 0.0)]);
        assert_eq!(louvain(&g, &LouvainConfig::default()), vec![0, 1, 2]);
    }

    #[test]
    fn single_node() {
        let mut g = InteractionGraph::new();
        g.add_node("solo".into());
        assert_eq!(louvain(&g, &LouvainConfig::default()), vec![0]);
    }
}
