//! `threadnet graph`: build the interaction graph and report its shape.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use threadnet_core::io::write_table;
use threadnet_graph::{GraphProperties, graph_properties};
use tracing::info;

use crate::cmd::{ColumnArgs, Context, load_graph};
use crate::output::{pretty_kv, pretty_rule, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Also write the weighted edge list (source, target, weight).
    #[arg(long, value_name = "FILE")]
    pub edges: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct GraphReport {
    pub nodes: usize,
    pub edges: usize,
    pub total_weight: f64,
    pub self_loops_dropped: usize,
    pub content_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_file: Option<PathBuf>,
    pub properties: GraphProperties,
}

pub fn run_graph(args: &GraphArgs, ctx: &Context) -> anyhow::Result<()> {
    let graph = load_graph(&args.input, &args.columns, ctx)?;
    let properties = graph_properties(&graph)?;

    if let Some(path) = &args.edges {
        write_table(&graph.to_edge_table(), path)?;
        info!(path = %path.display(), edges = graph.edge_count(), "wrote edge list");
    }

    let report = GraphReport {
        nodes: graph.node_count(),
        edges: graph.edge_count(),
        total_weight: graph.total_weight(),
        self_loops_dropped: graph.self_loops_dropped,
        content_hash: graph.content_hash.clone(),
        edge_file: args.edges.clone(),
        properties,
    };
    render_mode(ctx.output, &report, write_text, write_pretty)
}

fn fmt_opt<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn write_text(r: &GraphReport, w: &mut dyn Write) -> std::io::Result<()> {
    let p = &r.properties;
    writeln!(w, "nodes={}", r.nodes)?;
    writeln!(w, "edges={}", r.edges)?;
    writeln!(w, "total_weight={}", r.total_weight)?;
    writeln!(w, "self_loops_dropped={}", r.self_loops_dropped)?;
    writeln!(w, "content_hash={}", r.content_hash)?;
    writeln!(w, "density={:.6}", p.density)?;
    writeln!(w, "num_components={}", p.num_components)?;
    writeln!(w, "avg_degree={:.4}", p.avg_degree)?;
    if p.is_connected() {
        writeln!(w, "diameter={}", fmt_opt(p.diameter))?;
        writeln!(w, "avg_shortest_path={}", fmt_opt(p.avg_shortest_path))?;
    } else {
        writeln!(w, "diameter_largest_cc={}", fmt_opt(p.diameter_largest_cc))?;
        writeln!(
            w,
            "avg_shortest_path_largest_cc={}",
            fmt_opt(p.avg_shortest_path_largest_cc)
        )?;
    }
    if let Some(path) = &r.edge_file {
        writeln!(w, "edge_file={}", path.display())?;
    }
    Ok(())
}

fn write_pretty(r: &GraphReport, w: &mut dyn Write) -> std::io::Result<()> {
    let p = &r.properties;
    pretty_section(w, "Interaction Graph")?;
    pretty_kv(w, "Nodes", r.nodes.to_string())?;
    pretty_kv(w, "Edges", r.edges.to_string())?;
    pretty_kv(w, "Total weight", r.total_weight.to_string())?;
    pretty_kv(w, "Self-loops dropped", r.self_loops_dropped.to_string())?;
    pretty_kv(w, "Content hash", &r.content_hash)?;
    pretty_rule(w)?;
    pretty_kv(w, "Density", format!("{:.6}", p.density))?;
    pretty_kv(w, "Components", p.num_components.to_string())?;
    pretty_kv(w, "Average degree", format!("{:.4}", p.avg_degree))?;
    if p.is_connected() {
        pretty_kv(w, "Diameter", fmt_opt(p.diameter))?;
        pretty_kv(
            w,
            "Avg shortest path",
            fmt_opt(p.avg_shortest_path.map(|v| format!("{v:.4}"))),
        )?;
    } else {
        pretty_kv(w, "Diameter (LCC)", fmt_opt(p.diameter_largest_cc))?;
        pretty_kv(
            w,
            "Avg path (LCC)",
            fmt_opt(p.avg_shortest_path_largest_cc.map(|v| format!("{v:.4}"))),
        )?;
    }
    if let Some(path) = &r.edge_file {
        pretty_kv(w, "Edge list", path.display().to_string())?;
    }
    Ok(())
}
