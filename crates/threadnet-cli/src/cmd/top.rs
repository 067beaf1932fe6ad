//! `threadnet top`: the most central nodes under one metric.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use threadnet_core::Value;
use threadnet_graph::{CentralityMetric, top_nodes};

use crate::cmd::{ColumnArgs, Context, load_graph};
use crate::output::{Renderable, render_list};

#[derive(Args, Debug)]
pub struct TopArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// degree, betweenness, closeness, or eigenvector.
    #[arg(long)]
    pub metric: Option<String>,

    /// Number of nodes (default: `analysis.top` from the config).
    #[arg(short = 'n', long)]
    pub count: Option<usize>,
}

/// One ranked node.
#[derive(Debug, Serialize)]
pub struct NodeScore {
    pub rank: usize,
    pub node: Value,
    pub metric: CentralityMetric,
    pub score: f64,
}

impl Renderable for NodeScore {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{:>3}. {:<24} {:.6}", self.rank, self.node.to_string(), self.score)
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}\t{}\t{}", self.rank, self.node, self.score)
    }

    fn table_headers() -> &'static [&'static str] {
        &["RANK", "NODE", "SCORE"]
    }
}

pub fn run_top(args: &TopArgs, ctx: &Context) -> anyhow::Result<()> {
    let metric: CentralityMetric = args
        .metric
        .as_deref()
        .unwrap_or(&ctx.config.analysis.metric)
        .parse()?;
    let n = args.count.unwrap_or(ctx.config.analysis.top);

    let graph = load_graph(&args.input, &args.columns, ctx)?;
    let rows: Vec<NodeScore> = top_nodes(&graph, n, metric)?
        .into_iter()
        .enumerate()
        .map(|(i, (node, score))| NodeScore {
            rank: i + 1,
            node,
            metric,
            score,
        })
        .collect();

    render_list(&rows, ctx.output)
}
