//! Interaction graph module.
//!
//! # Overview
//!
//! Builds petgraph-based undirected interaction graphs from a message table,
//! either over the whole table or one per calendar period, and computes
//! whole-graph statistics on them.
//!
//! ## Pipeline
//!
//! ```text
//! Table (author, topic, date, ...)
//!        ↓  build::build_interaction_graph()
//! InteractionGraph (UnGraph<Value, f64>, unordered edge keys)
//!        ↓  stats::graph_properties()
//! GraphProperties (density, components, diameter, ...)
//!
//! Table
//!        ↓  temporal::build_temporal_graphs(window)
//! BTreeMap<Period, InteractionGraph>
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use threadnet_graph::graph::{build_interaction_graph, graph_properties};
//!
//! let graph = build_interaction_graph(&table, "msg_author_id", "msg_topic_id", None)?;
//! let props = graph_properties(&graph)?;
//! println!("nodes={} edges={} density={:.3}", props.num_nodes, props.num_edges, props.density);
//! ```

pub mod build;
pub mod stats;
pub mod temporal;

pub use build::{InteractionGraph, build_interaction_graph};
pub use stats::{GraphProperties, graph_properties, hop_distances};
pub use temporal::{
    ActivityMatrix, Period, TemporalGraphs, TimeWindow, activity_matrix, build_temporal_graphs,
    temporal_properties,
};
