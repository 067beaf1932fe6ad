//! Interaction graph construction from a message table.
//!
//! # Overview
//!
//! Each record of the table links the value in the *source* column to the
//! value in the *target* column (by default author → topic). Records are
//! folded into an undirected [`petgraph`] graph whose edge weight is the
//! number of records (or the sum of a weight column) seen for that pair.
//!
//! ## Edge Keys
//!
//! Edges are keyed on the **unordered** pair of endpoints: a record
//! `(A, B)` and a record `(B, A)` add to the same edge. Edges are inserted
//! in order of first occurrence, and nodes in order of first appearance
//! (source before target within a record).
//!
//! ## Skipped Records
//!
//! - A record with a null source or target is skipped.
//! - A record whose source equals its target is dropped and counted in
//!   [`InteractionGraph::self_loops_dropped`].
//!
//! ## Cache Invalidation
//!
//! The graph carries a BLAKE3 hash of its sorted weighted edge list, so two
//! builds from equivalent data can be compared without walking the graph.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use threadnet_core::table::{Column, Table, Value};
use tracing::{debug, info, instrument, warn};

use crate::error::{GraphError, Result};

// ---------------------------------------------------------------------------
// InteractionGraph
// ---------------------------------------------------------------------------

/// An undirected, weighted interaction graph.
///
/// Nodes are cell values (author ids, topic ids, ...) with their original
/// type preserved. Edge weights are `f64` totals.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    /// Undirected graph: nodes = ids, edge weight = interaction total.
    pub graph: UnGraph<Value, f64>,
    /// Mapping from node id to petgraph `NodeIndex`.
    pub node_map: HashMap<Value, NodeIndex>,
    /// BLAKE3 content hash of the weighted edge set.
    pub content_hash: String,
    /// Records dropped because source and target were equal.
    pub self_loops_dropped: usize,
    edge_map: HashMap<(NodeIndex, NodeIndex), EdgeIndex>,
}

impl InteractionGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        let mut graph = Self::default();
        graph.refresh_hash();
        graph
    }

    /// Build a graph from explicit `(a, b, weight)` triples.
    ///
    /// Triples with equal endpoints are counted as dropped self-loops.
    pub fn from_edges<A, B>(edges: impl IntoIterator<Item = (A, B, f64)>) -> Self
    where
        A: Into<Value>,
        B: Into<Value>,
    {
        let mut graph = Self::default();
        for (a, b, w) in edges {
            let (a, b) = (a.into(), b.into());
            if a == b {
                graph.self_loops_dropped += 1;
            } else {
                graph.add_interaction(a, b, w);
            }
        }
        graph.refresh_hash();
        graph
    }

    /// Add `node` if absent and return its index.
    pub fn add_node(&mut self, node: Value) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&node) {
            return idx;
        }
        let idx = self.graph.add_node(node.clone());
        self.node_map.insert(node, idx);
        idx
    }

    /// Accumulate `weight` onto the edge between `a` and `b`.
    fn add_interaction(&mut self, a: Value, b: Value, weight: f64) {
        let ai = self.add_node(a);
        let bi = self.add_node(b);
        let key = if ai <= bi { (ai, bi) } else { (bi, ai) };

        match self.edge_map.get(&key) {
            Some(&edge) => {
                if let Some(w) = self.graph.edge_weight_mut(edge) {
                    *w += weight;
                }
            }
            None => {
                let edge = self.graph.add_edge(ai, bi, weight);
                self.edge_map.insert(key, edge);
            }
        }
    }

    fn refresh_hash(&mut self) {
        self.content_hash = compute_edge_hash(&self.graph);
    }

    /// Return the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Return `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Look up the `NodeIndex` for a node id.
    #[must_use]
    pub fn node_index(&self, id: &Value) -> Option<NodeIndex> {
        self.node_map.get(id).copied()
    }

    /// Return the node id at `idx`.
    #[must_use]
    pub fn node_id(&self, idx: NodeIndex) -> Option<&Value> {
        self.graph.node_weight(idx)
    }

    /// Node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Value> + '_ {
        self.graph.node_weights()
    }

    /// Weight of the edge between `a` and `b`, in either orientation.
    #[must_use]
    pub fn edge_weight(&self, a: &Value, b: &Value) -> Option<f64> {
        let (ai, bi) = (self.node_index(a)?, self.node_index(b)?);
        let edge = self.graph.find_edge(ai, bi)?;
        self.graph.edge_weight(edge).copied()
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.graph.edge_weights().sum()
    }

    /// Unweighted degree of every node, indexed by `NodeIndex::index()`.
    #[must_use]
    pub fn degrees(&self) -> Vec<usize> {
        self.graph
            .node_indices()
            .map(|idx| self.graph.neighbors(idx).count())
            .collect()
    }

    /// Edge list as a table with columns `source, target, weight`, in edge
    /// insertion order.
    #[must_use]
    pub fn to_edge_table(&self) -> Table {
        let edges: Vec<(Value, Value, f64)> = self
            .graph
            .edge_references()
            .map(|e| {
                (
                    self.graph[e.source()].clone(),
                    self.graph[e.target()].clone(),
                    *e.weight(),
                )
            })
            .collect();
        let columns = vec![
            Column::new("source", edges.iter().map(|e| e.0.clone())),
            Column::new("target", edges.iter().map(|e| e.1.clone())),
            Column::new("weight", edges.iter().map(|e| Value::float(e.2))),
        ];
        Table::from_columns(columns).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the interaction graph of `table`.
///
/// Edge weight is the record count per unordered pair, or the sum of
/// `weight_col` when given (null weights count as zero).
///
/// # Errors
///
/// Returns [`GraphError::ColumnNotFound`] if any named column is absent and
/// [`GraphError::NonNumericWeight`] for a weight cell that is not a number.
#[instrument(skip(table))]
pub fn build_interaction_graph(
    table: &Table,
    source_col: &str,
    target_col: &str,
    weight_col: Option<&str>,
) -> Result<InteractionGraph> {
    let source = column(table, source_col)?;
    let target = column(table, target_col)?;
    let weights = weight_col.map(|name| column(table, name)).transpose()?;

    let graph = build_from_rows(source, target, weights, 0..table.row_count())?;

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built interaction graph"
    );
    Ok(graph)
}

/// Fold the selected `rows` into a graph.
pub(crate) fn build_from_rows(
    source: &Column,
    target: &Column,
    weights: Option<&Column>,
    rows: impl IntoIterator<Item = usize>,
) -> Result<InteractionGraph> {
    let mut graph = InteractionGraph::default();
    let mut null_endpoints = 0_usize;

    for row in rows {
        let (Some(a), Some(b)) = (source.values.get(row), target.values.get(row)) else {
            continue;
        };
        if a.is_null() || b.is_null() {
            null_endpoints += 1;
            continue;
        }
        if a == b {
            graph.self_loops_dropped += 1;
            continue;
        }

        let weight = match weights {
            Some(col) => weight_at(col, row)?,
            None => 1.0,
        };
        graph.add_interaction(a.clone(), b.clone(), weight);
    }

    if null_endpoints > 0 {
        debug!(skipped = null_endpoints, "skipped records with a null endpoint");
    }
    if graph.self_loops_dropped > 0 {
        warn!(
            dropped = graph.self_loops_dropped,
            "dropped self-loop records (source equals target)"
        );
    }

    graph.refresh_hash();
    Ok(graph)
}

pub(crate) fn column<'t>(table: &'t Table, name: &str) -> Result<&'t Column> {
    table
        .column(name)
        .ok_or_else(|| GraphError::ColumnNotFound(name.to_string()))
}

fn weight_at(col: &Column, row: usize) -> Result<f64> {
    match col.values.get(row) {
        None | Some(Value::Null) => Ok(0.0),
        Some(value) => value.as_f64().ok_or_else(|| GraphError::NonNumericWeight {
            column: col.name.clone(),
            row,
            value: value.to_string(),
        }),
    }
}

/// Compute a BLAKE3 hash of the sorted weighted edge list.
fn compute_edge_hash(graph: &UnGraph<Value, f64>) -> String {
    let mut edges: Vec<(String, String, u64)> = graph
        .edge_references()
        .map(|e| {
            let a = graph[e.source()].to_string();
            let b = graph[e.target()].to_string();
            let (a, b) = if a <= b { (a, b) } else { (b, a) };
            (a, b, e.weight().to_bits())
        })
        .collect();
    edges.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for (a, b, w) in &edges {
        hasher.update(a.as_bytes());
        hasher.update(b"\x00");
        hasher.update(b.as_bytes());
        hasher.update(b"\x00");
        hasher.update(&w.to_le_bytes());
        hasher.update(b"\n");
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
