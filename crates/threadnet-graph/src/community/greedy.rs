//! Clauset–Newman–Moore greedy modularity merging.
//!
//! Starts with every node in its own community and repeatedly merges the
//! pair of adjacent communities with the largest modularity increase `dQ`,
//! until no merge increases modularity. Edge weights are ignored.
//!
//! Communities are labelled by size, largest first; equal sizes are ordered
//! by their lowest node index.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::community::renumber;
use crate::graph::build::InteractionGraph;

/// Run greedy modularity merging; returns a dense label per node index.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn greedy_modularity(graph: &InteractionGraph) -> Vec<u32> {
    let g = &graph.graph;
    let n = g.node_count();
    if n == 0 {
        return Vec::new();
    }
    let m = g.edge_count();
    if m == 0 {
        return renumber(&(0..n).collect::<Vec<_>>());
    }

    let two_m = 2.0 * m as f64;

    // e[i][j]: fraction of edge ends joining community i to community j.
    // a[i]: fraction of edge ends attached to community i.
    let mut e: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); n];
    let mut a: Vec<f64> = vec![0.0; n];
    for edge in g.edge_indices() {
        if let Some((u, v)) = g.edge_endpoints(edge) {
            let (u, v) = (u.index(), v.index());
            *e[u].entry(v).or_default() += 1.0 / two_m;
            *e[v].entry(u).or_default() += 1.0 / two_m;
            a[u] += 1.0 / two_m;
            a[v] += 1.0 / two_m;
        }
    }

    // merged_into[j] = community that absorbed j.
    let mut alive: Vec<bool> = vec![true; n];
    let mut merged_into: Vec<usize> = (0..n).collect();
    let mut merges = 0_usize;

    loop {
        let mut best: Option<(f64, usize, usize)> = None;
        for i in (0..n).filter(|&i| alive[i]) {
            for (&j, &eij) in &e[i] {
                if j <= i {
                    continue;
                }
                let dq = 2.0 * (eij - a[i] * a[j]);
                if best.is_none_or(|(b, _, _)| dq > b) {
                    best = Some((dq, i, j));
                }
            }
        }

        let Some((dq, i, j)) = best else { break };
        if dq <= 0.0 {
            break;
        }

        // Merge j into i.
        let row_j = std::mem::take(&mut e[j]);
        for (k, ejk) in row_j {
            if k == i {
                continue;
            }
            *e[i].entry(k).or_default() += ejk;
            if let Some(ekj) = e[k].remove(&j) {
                *e[k].entry(i).or_default() += ekj;
            }
        }
        e[i].remove(&j);
        a[i] += a[j];
        a[j] = 0.0;
        alive[j] = false;
        merged_into[j] = i;
        merges += 1;
    }

    debug!(merges, "greedy modularity merging finished");

    // Resolve every node to its surviving community.
    let root = |mut v: usize| {
        while merged_into[v] != v {
            v = merged_into[v];
        }
        v
    };
    let roots: Vec<usize> = (0..n).map(root).collect();

    // Order communities by size (desc), then by lowest member index.
    let mut groups: HashMap<usize, (usize, usize)> = HashMap::new();
    for (v, &r) in roots.iter().enumerate() {
        let entry = groups.entry(r).or_insert((0, v));
        entry.0 += 1;
        entry.1 = entry.1.min(v);
    }
    let mut ordered: Vec<(usize, (usize, usize))> = groups.into_iter().collect();
    ordered.sort_by(|x, y| y.1.0.cmp(&x.1.0).then(x.1.1.cmp(&y.1.1)));
    let rank: HashMap<usize, u32> = ordered
        .iter()
        .zip(0_u32..)
        .map(|(&(r, _), label)| (r, label))
        .collect();

    roots.iter().map(|r| rank.get(r).copied().unwrap_or(0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn largest_community_gets_label_zero() {
        // Triangle x-y-z first, then a 4-clique a-b-c-d.
        let mut edges = vec![("x", "y", 1.0), ("y", "z", 1.0), ("z", "x", 1.0)];
        let clique = ["a", "b", "c", "d"];
        for i in 0..4 {
            for j in (i + 1)..4 {
                edges.push((clique[i], clique[j], 1.0));
            }
        }
        let g = InteractionGraph::from_edges(edges);
        let labels = greedy_modularity(&g);
        assert_eq!(&labels[..3], &[1, 1, 1]);
        assert_eq!(&labels[3..], &[0, 0, 0, 0]);
    }

    #[test]
    fn weights_do_not_matter() {
        let light = InteractionGraph::from_edges([("a", "b", 1.0), ("b", "c", 1.0), ("c", "d", 1.0)]);
        let heavy = InteractionGraph::from_edges([("a", "b", 1.0), ("b", "c", 50.0), ("c", "d", 1.0)]);
        assert_eq!(greedy_modularity(&light), greedy_modularity(&heavy));
    }

    #[test]
    fn edgeless_nodes_stay_apart() {
        let mut g = InteractionGraph::new();
        g.add_node("p".into());
        g.add_node("q".into());
        assert_eq!(greedy_modularity(&g), vec![0, 1]);
    }
}
