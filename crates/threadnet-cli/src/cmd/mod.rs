pub mod centrality;
pub mod clean;
pub mod communities;
pub mod convert;
pub mod graph;
pub mod plot;
pub mod summary;
pub mod temporal;
pub mod top;

use std::path::Path;

use anyhow::Context as _;
use clap::Args;
use threadnet_core::config::AnalysisConfig;
use threadnet_core::{Table, TableLoader};
use threadnet_graph::{InteractionGraph, build_interaction_graph};

use crate::output::OutputMode;

/// Settings shared by every command handler.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: AnalysisConfig,
    pub output: OutputMode,
}

/// Column overrides for commands that build an interaction graph.
///
/// Unset flags fall back to the `[columns]` section of the configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct ColumnArgs {
    /// Source column (default: msg_author_id).
    #[arg(long, value_name = "COLUMN")]
    pub source: Option<String>,

    /// Target column (default: msg_topic_id).
    #[arg(long, value_name = "COLUMN")]
    pub target: Option<String>,

    /// Numeric column summed into edge weights instead of counting records.
    #[arg(long, value_name = "COLUMN")]
    pub weight: Option<String>,
}

impl ColumnArgs {
    pub fn source<'a>(&'a self, ctx: &'a Context) -> &'a str {
        self.source.as_deref().unwrap_or(&ctx.config.columns.source)
    }

    pub fn target<'a>(&'a self, ctx: &'a Context) -> &'a str {
        self.target.as_deref().unwrap_or(&ctx.config.columns.target)
    }

    pub fn weight<'a>(&'a self, ctx: &'a Context) -> Option<&'a str> {
        self.weight
            .as_deref()
            .or(ctx.config.columns.weight.as_deref())
    }
}

/// Load a CSV or XLSX dataset.
pub fn load_table(path: &Path) -> anyhow::Result<Table> {
    let mut loader = TableLoader::new(path);
    loader
        .load()
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok(loader.into_table()?)
}

/// Load a dataset and build its interaction graph.
pub fn load_graph(
    path: &Path,
    columns: &ColumnArgs,
    ctx: &Context,
) -> anyhow::Result<InteractionGraph> {
    let table = load_table(path)?;
    build_graph(&table, columns, ctx)
}

/// Build the interaction graph of an already-loaded table.
pub fn build_graph(
    table: &Table,
    columns: &ColumnArgs,
    ctx: &Context,
) -> anyhow::Result<InteractionGraph> {
    let (source, target) = (columns.source(ctx), columns.target(ctx));
    build_interaction_graph(table, source, target, columns.weight(ctx))
        .with_context(|| format!("failed to build graph from '{source}' -> '{target}'"))
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
