//! Centrality metrics for interaction graphs.
//!
//! # Overview
//!
//! Every metric treats the graph as **unweighted** and undirected:
//!
//! - **Degree** (`basic`): share of the other nodes a node touches.
//! - **Betweenness** (`betweenness`): how often a node lies on shortest
//!   paths between other pairs.
//! - **Closeness** (`closeness`): inverse mean distance to reachable nodes,
//!   scaled by the reachable share of the graph.
//! - **Eigenvector** (`eigenvector`): connection to other well-connected
//!   nodes.
//!
//! [`table::centrality_table`] runs all four and joins them per node.
//!
//! # Usage
//!
//! ```rust,ignore
//! use threadnet_graph::metrics::{betweenness::betweenness_centrality, table::top_nodes};
//!
//! let bc = betweenness_centrality(&graph);
//! let top = top_nodes(&graph, 10, CentralityMetric::Degree)?;
//! ```

use std::collections::HashMap;

use petgraph::graph::UnGraph;
use threadnet_core::table::Value;

pub mod basic;
pub mod betweenness;
pub mod closeness;
pub mod eigenvector;
pub mod table;

pub use table::{CentralityMetric, CentralityRow, CentralityTable, centrality_table, top_nodes};

/// Per-node scores keyed by node id.
pub type Scores = HashMap<Value, f64>;

/// Key a node-index-ordered score vector by node id.
pub(crate) fn keyed(g: &UnGraph<Value, f64>, scores: &[f64]) -> Scores {
    g.node_indices()
        .filter_map(|idx| Some((g.node_weight(idx)?.clone(), *scores.get(idx.index())?)))
        .collect()
}
