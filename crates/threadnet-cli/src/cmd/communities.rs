//! `threadnet communities`: partition the graph and score the partition.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use threadnet_core::io::write_table;
use threadnet_core::{Column, Table, Value};
use threadnet_graph::community::{
    community_sizes, count_communities, detect_communities_with, modularity,
};
use threadnet_graph::{CommunityMethod, Communities, InteractionGraph, LouvainConfig};
use tracing::info;

use crate::cmd::{ColumnArgs, Context, load_graph};
use crate::output::{pretty_kv, pretty_rule, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct CommunitiesArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// louvain or greedy.
    #[arg(long)]
    pub method: Option<String>,

    /// Seed for Louvain node ordering.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Louvain resolution; higher values give smaller communities.
    #[arg(long, default_value_t = 1.0)]
    pub resolution: f64,

    /// Save node assignments as `node, community` (.csv or .xlsx).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CommunitySize {
    community: u32,
    size: usize,
}

#[derive(Debug, Serialize)]
struct CommunityReport {
    method: CommunityMethod,
    count: usize,
    modularity: f64,
    sizes: Vec<CommunitySize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    assignments_file: Option<PathBuf>,
}

pub fn run_communities(args: &CommunitiesArgs, ctx: &Context) -> anyhow::Result<()> {
    let method: CommunityMethod = args
        .method
        .as_deref()
        .unwrap_or(&ctx.config.analysis.community_method)
        .parse()?;
    let config = LouvainConfig {
        resolution: args.resolution,
        seed: args.seed.or(ctx.config.analysis.seed),
        ..LouvainConfig::default()
    };

    let graph = load_graph(&args.input, &args.columns, ctx)?;
    let communities = detect_communities_with(&graph, method, &config);

    if let Some(path) = &args.output {
        write_table(&assignment_table(&graph, &communities)?, path)?;
        info!(path = %path.display(), "wrote community assignments");
    }

    let report = CommunityReport {
        method,
        count: count_communities(&communities),
        modularity: modularity(&graph, &communities),
        sizes: community_sizes(&communities)
            .into_iter()
            .map(|(community, size)| CommunitySize { community, size })
            .collect(),
        assignments_file: args.output.clone(),
    };
    render_mode(ctx.output, &report, write_text, write_pretty)
}

/// Node ids with their labels, in node insertion order.
fn assignment_table(
    graph: &InteractionGraph,
    communities: &Communities,
) -> anyhow::Result<Table> {
    let (nodes, labels): (Vec<Value>, Vec<Value>) = graph
        .nodes()
        .filter_map(|id| {
            let label = communities.get(id)?;
            Some((id.clone(), Value::Int(i64::from(*label))))
        })
        .unzip();
    Ok(Table::from_columns(vec![
        Column::new("node", nodes),
        Column::new("community", labels),
    ])?)
}

fn write_text(r: &CommunityReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "method={}", r.method)?;
    writeln!(w, "count={}", r.count)?;
    writeln!(w, "modularity={:.6}", r.modularity)?;
    for s in &r.sizes {
        writeln!(w, "community={}\tsize={}", s.community, s.size)?;
    }
    Ok(())
}

fn write_pretty(r: &CommunityReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Communities")?;
    pretty_kv(w, "Method", r.method.as_str())?;
    pretty_kv(w, "Communities", r.count.to_string())?;
    pretty_kv(w, "Modularity", format!("{:.4}", r.modularity))?;
    if let Some(path) = &r.assignments_file {
        pretty_kv(w, "Assignments", path.display().to_string())?;
    }
    pretty_rule(w)?;
    for s in &r.sizes {
        writeln!(w, "  #{:<6} {:>6} nodes", s.community, s.size)?;
    }
    Ok(())
}
