//! `threadnet temporal`: graph properties per calendar period.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use threadnet_graph::{
    GraphProperties, Period, TimeWindow, build_temporal_graphs, temporal_properties,
};

use crate::cmd::{ColumnArgs, Context, load_table};
use crate::output::{Renderable, render_list};

#[derive(Args, Debug)]
pub struct TemporalArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Timestamp column (UNIX seconds or datetime text).
    #[arg(long, value_name = "COLUMN")]
    pub time: Option<String>,

    /// day, week, month, or year (also D, W, M, Y).
    #[arg(long)]
    pub window: Option<String>,
}

/// Properties of one period's graph.
#[derive(Debug, Serialize)]
pub struct PeriodRow {
    pub period: Period,
    #[serde(flatten)]
    pub properties: GraphProperties,
}

impl Renderable for PeriodRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        let p = &self.properties;
        writeln!(
            w,
            "{:<23} nodes={:<6} edges={:<6} density={:.4} components={} avg_degree={:.3}",
            self.period.label(),
            p.num_nodes,
            p.num_edges,
            p.density,
            p.num_components,
            p.avg_degree
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let p = &self.properties;
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.period, p.num_nodes, p.num_edges, p.density, p.num_components, p.avg_degree
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["PERIOD", "NODES", "EDGES", "DENSITY", "COMPONENTS", "AVG_DEGREE"]
    }
}

/// Resolve the time column and window from flags, then the config.
pub fn time_settings<'a>(
    time: Option<&'a str>,
    window: Option<&'a str>,
    ctx: &'a Context,
) -> anyhow::Result<(&'a str, TimeWindow)> {
    let time = time.unwrap_or(&ctx.config.columns.time);
    let window = window.unwrap_or(&ctx.config.analysis.window).parse()?;
    Ok((time, window))
}

pub fn run_temporal(args: &TemporalArgs, ctx: &Context) -> anyhow::Result<()> {
    let (time_col, window) = time_settings(args.time.as_deref(), args.window.as_deref(), ctx)?;
    let table = load_table(&args.input)?;
    let graphs = build_temporal_graphs(
        &table,
        time_col,
        window,
        args.columns.source(ctx),
        args.columns.target(ctx),
    )?;

    let rows: Vec<PeriodRow> = temporal_properties(&graphs)?
        .into_iter()
        .map(|(period, properties)| PeriodRow { period, properties })
        .collect();
    render_list(&rows, ctx.output)
}
