//! Joined centrality table and top-N ranking.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use threadnet_core::table::{Column, Table, Value};
use tracing::{info, instrument};

use crate::error::{GraphError, Result};
use crate::graph::build::InteractionGraph;
use crate::metrics::basic::degree_scores;
use crate::metrics::betweenness::betweenness_scores;
use crate::metrics::closeness::closeness_scores;
use crate::metrics::eigenvector::{DEFAULT_MAX_ITER, DEFAULT_TOL, eigenvector_scores};

// ---------------------------------------------------------------------------
// CentralityMetric
// ---------------------------------------------------------------------------

/// One of the four node centrality measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CentralityMetric {
    #[default]
    Degree,
    Betweenness,
    Closeness,
    Eigenvector,
}

impl CentralityMetric {
    /// All metrics in table column order.
    pub const ALL: [Self; 4] = [
        Self::Degree,
        Self::Betweenness,
        Self::Closeness,
        Self::Eigenvector,
    ];

    /// Stable lowercase name; also the table column header.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Degree => "degree",
            Self::Betweenness => "betweenness",
            Self::Closeness => "closeness",
            Self::Eigenvector => "eigenvector",
        }
    }

    /// Compute this metric for every node, in node-index order.
    fn scores(self, graph: &InteractionGraph) -> Result<Vec<f64>> {
        let g = &graph.graph;
        if g.node_count() == 0 {
            return Err(GraphError::EmptyGraph);
        }
        Ok(match self {
            Self::Degree => degree_scores(g),
            Self::Betweenness => betweenness_scores(g),
            Self::Closeness => closeness_scores(g),
            Self::Eigenvector => eigenvector_scores(g, DEFAULT_MAX_ITER, DEFAULT_TOL)?,
        })
    }
}

impl fmt::Display for CentralityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CentralityMetric {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "degree" => Ok(Self::Degree),
            "betweenness" => Ok(Self::Betweenness),
            "closeness" => Ok(Self::Closeness),
            "eigenvector" => Ok(Self::Eigenvector),
            other => Err(GraphError::unknown("centrality metric", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// CentralityTable
// ---------------------------------------------------------------------------

/// All four centralities of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CentralityRow {
    pub node: Value,
    pub degree: f64,
    pub betweenness: f64,
    pub closeness: f64,
    pub eigenvector: f64,
}

impl CentralityRow {
    /// Score for `metric`.
    #[must_use]
    pub const fn score(&self, metric: CentralityMetric) -> f64 {
        match metric {
            CentralityMetric::Degree => self.degree,
            CentralityMetric::Betweenness => self.betweenness,
            CentralityMetric::Closeness => self.closeness,
            CentralityMetric::Eigenvector => self.eigenvector,
        }
    }
}

/// Per-node centralities, sorted by degree centrality (highest first).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CentralityTable {
    pub rows: Vec<CentralityRow>,
}

impl CentralityTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Scores of one metric, in row order.
    #[must_use]
    pub fn scores(&self, metric: CentralityMetric) -> Vec<f64> {
        self.rows.iter().map(|r| r.score(metric)).collect()
    }

    /// The `n` rows with the highest `metric` score. Ties keep row order.
    #[must_use]
    pub fn top(&self, n: usize, metric: CentralityMetric) -> Vec<&CentralityRow> {
        let mut rows: Vec<&CentralityRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.score(metric).total_cmp(&a.score(metric)));
        rows.truncate(n);
        rows
    }

    /// Convert to a [`Table`] with columns `node, degree, betweenness,
    /// closeness, eigenvector` for saving.
    #[must_use]
    pub fn to_table(&self) -> Table {
        let mut columns = vec![Column::new(
            "node",
            self.rows.iter().map(|r| r.node.clone()),
        )];
        columns.extend(CentralityMetric::ALL.iter().map(|&metric| {
            Column::new(
                metric.as_str(),
                self.rows.iter().map(|r| Value::float(r.score(metric))),
            )
        }));
        Table::from_columns(columns).unwrap_or_default()
    }
}

/// Compute all four centralities for `graph`.
///
/// Eigenvector centrality runs with at most 1000 iterations and tolerance
/// `1e-6`.
///
/// # Errors
///
/// Returns [`GraphError::EmptyGraph`] for a graph without nodes and
/// [`GraphError::NotConverged`] if eigenvector iteration fails.
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn centrality_table(graph: &InteractionGraph) -> Result<CentralityTable> {
    let degree = CentralityMetric::Degree.scores(graph)?;
    let betweenness = CentralityMetric::Betweenness.scores(graph)?;
    let closeness = CentralityMetric::Closeness.scores(graph)?;
    let eigenvector = CentralityMetric::Eigenvector.scores(graph)?;

    let mut rows: Vec<CentralityRow> = graph
        .graph
        .node_indices()
        .map(|idx| {
            let i = idx.index();
            CentralityRow {
                node: graph.graph[idx].clone(),
                degree: degree[i],
                betweenness: betweenness[i],
                closeness: closeness[i],
                eigenvector: eigenvector[i],
            }
        })
        .collect();
    rows.sort_by(|a, b| b.degree.total_cmp(&a.degree));

    info!(nodes = rows.len(), "computed centrality table");
    Ok(CentralityTable { rows })
}

/// The `n` nodes with the highest `metric` score, highest first.
///
/// Ties keep node insertion order. Fewer than `n` pairs are returned when the
/// graph is smaller.
///
/// # Errors
///
/// Returns [`GraphError::EmptyGraph`] for a graph without nodes and
/// [`GraphError::NotConverged`] if eigenvector iteration fails.
pub fn top_nodes(
    graph: &InteractionGraph,
    n: usize,
    metric: CentralityMetric,
) -> Result<Vec<(Value, f64)>> {
    let scores = metric.scores(graph)?;
    let mut ranked: Vec<(Value, f64)> = graph
        .graph
        .node_indices()
        .map(|idx| (graph.graph[idx].clone(), scores[idx.index()]))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(n);
    Ok(ranked)
}
