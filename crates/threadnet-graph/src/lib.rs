#![forbid(unsafe_code)]
//! threadnet-graph library.
//!
//! # Conventions
//!
//! - **Errors**: Typed [`GraphError`] for every fallible operation.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//! - **Weights**: Centralities, graph properties and greedy communities are
//!   unweighted; Louvain and [`community::modularity`] use edge weights.

pub mod community;
pub mod error;
pub mod graph;
pub mod metrics;

pub use community::{CommunityMethod, Communities, LouvainConfig, detect_communities};
pub use error::GraphError;
pub use graph::{
    ActivityMatrix, GraphProperties, InteractionGraph, Period, TemporalGraphs, TimeWindow,
    activity_matrix, build_interaction_graph, build_temporal_graphs, graph_properties,
    hop_distances, temporal_properties,
};
pub use metrics::{CentralityMetric, CentralityTable, centrality_table, top_nodes};
