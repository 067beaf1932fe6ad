//! `threadnet centrality`: all four centralities per node.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use threadnet_core::io::write_table;
use threadnet_graph::centrality_table;
use threadnet_graph::metrics::CentralityRow;
use tracing::info;

use crate::cmd::{ColumnArgs, Context, load_graph};
use crate::output::{OutputMode, Renderable, pretty_rule, render_list};

#[derive(Args, Debug)]
pub struct CentralityArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Save the full table (.csv or .xlsx).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Rows to print; the saved table is never truncated.
    #[arg(long, default_value_t = 20)]
    pub limit: usize,
}

impl Renderable for CentralityRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{:<24} {:>10.6} {:>12.6} {:>10.6} {:>12.6}",
            self.node.to_string(),
            self.degree,
            self.betweenness,
            self.closeness,
            self.eigenvector
        )
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            self.node, self.degree, self.betweenness, self.closeness, self.eigenvector
        )
    }

    fn table_headers() -> &'static [&'static str] {
        &["NODE", "DEGREE", "BETWEENNESS", "CLOSENESS", "EIGENVECTOR"]
    }
}

pub fn run_centrality(args: &CentralityArgs, ctx: &Context) -> anyhow::Result<()> {
    let graph = load_graph(&args.input, &args.columns, ctx)?;
    let table = centrality_table(&graph)?;

    if let Some(path) = &args.output {
        write_table(&table.to_table(), path)?;
        info!(path = %path.display(), rows = table.len(), "wrote centrality table");
    }

    let shown = &table.rows[..args.limit.min(table.len())];
    if ctx.output == OutputMode::Pretty {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(
            out,
            "{:<24} {:>10} {:>12} {:>10} {:>12}",
            "NODE", "DEGREE", "BETWEENNESS", "CLOSENESS", "EIGENVECTOR"
        )?;
        pretty_rule(&mut out)?;
    }
    render_list(shown, ctx.output)
}
