//! Betweenness centrality via Brandes' algorithm.
//!
//! # Algorithm
//!
//! Brandes (2001) for unweighted graphs:
//!
//! 1. For each source node `s`, run BFS to compute shortest-path counts
//!    and distances.
//! 2. Accumulate dependency scores in reverse BFS order (farthest nodes first).
//! 3. Sum the dependency scores across all source nodes.
//!
//! Complexity: O(V * E).
//!
//! # Normalization
//!
//! On an undirected graph every pair is visited from both ends, so the raw
//! sum counts each pair twice. For `n > 2` the sum is multiplied by
//! `1 / ((n-1)(n-2))`, which maps a star centre to exactly 1.0. Graphs with
//! two or fewer nodes have no intermediate nodes and score 0.0 everywhere.

use std::collections::VecDeque;

use petgraph::graph::{NodeIndex, UnGraph};
use threadnet_core::table::Value;
use tracing::instrument;

use crate::graph::build::InteractionGraph;
use crate::metrics::{Scores, keyed};

/// Compute normalized betweenness centrality for every node.
///
/// Disconnected nodes and nodes with no shortest paths through them score
/// 0.0.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn betweenness_centrality(graph: &InteractionGraph) -> Scores {
    keyed(&graph.graph, &betweenness_scores(&graph.graph))
}

#[allow(clippy::cast_precision_loss)]
pub(crate) fn betweenness_scores(g: &UnGraph<Value, f64>) -> Vec<f64> {
    let n = g.node_count();
    let mut cb: Vec<f64> = vec![0.0; n];

    for s in g.node_indices() {
        let si = s.index();

        // Nodes in order of discovery (farthest popped first).
        let mut stack: Vec<NodeIndex> = Vec::with_capacity(n);
        let mut predecessors: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];

        // sigma[t]: number of shortest paths from s to t.
        let mut sigma: Vec<f64> = vec![0.0; n];
        sigma[si] = 1.0;

        // dist[t]: distance from s to t (-1 = unvisited).
        let mut dist: Vec<i64> = vec![-1; n];
        dist[si] = 0;

        let mut queue: VecDeque<NodeIndex> = VecDeque::from([s]);

        while let Some(v) = queue.pop_front() {
            let vi = v.index();
            stack.push(v);

            for w in g.neighbors(v) {
                let wi = w.index();
                if dist[wi] < 0 {
                    dist[wi] = dist[vi] + 1;
                    queue.push_back(w);
                }
                if dist[wi] == dist[vi] + 1 {
                    sigma[wi] += sigma[vi];
                    predecessors[wi].push(v);
                }
            }
        }

        let mut delta: Vec<f64> = vec![0.0; n];
        while let Some(w) = stack.pop() {
            let wi = w.index();
            for &v in &predecessors[wi] {
                let vi = v.index();
                if sigma[wi] > 0.0 {
                    delta[vi] += (sigma[vi] / sigma[wi]) * (1.0 + delta[wi]);
                }
            }
            if wi != si {
                cb[wi] += delta[wi];
            }
        }
    }

    if n > 2 {
        let scale = 1.0 / ((n - 1) * (n - 2)) as f64;
        for score in &mut cb {
            *score *= scale;
        }
    }
    cb
}
