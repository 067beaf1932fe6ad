//! `threadnet clean`: normalize text columns and save the result.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use threadnet_core::CleaningMethod;
use threadnet_core::io::write_table;
use threadnet_core::text::clean_columns;
use tracing::info;

use crate::cmd::{Context, load_table, split_list};
use crate::output::{pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    /// Destination file (.csv or .xlsx).
    #[arg(short, long)]
    pub output: PathBuf,

    /// Comma-separated columns to clean (default: the configured text columns).
    #[arg(long, value_name = "A,B")]
    pub columns: Option<String>,

    /// Cleaning method: advanced, basic, or html_only.
    #[arg(long)]
    pub method: Option<CleaningMethod>,
}

#[derive(Debug, Serialize)]
struct CleanReport {
    input: PathBuf,
    output: PathBuf,
    method: CleaningMethod,
    columns: Vec<String>,
    rows: usize,
}

pub fn run_clean(args: &CleanArgs, ctx: &Context) -> anyhow::Result<()> {
    let columns = args
        .columns
        .as_deref()
        .map_or_else(|| ctx.config.columns.text.clone(), split_list);
    let method = args.method.unwrap_or(ctx.config.analysis.clean_method);

    let mut table = load_table(&args.input)?;
    clean_columns(&mut table, &columns, method)?;
    write_table(&table, &args.output)?;
    info!(path = %args.output.display(), "wrote cleaned dataset");

    let report = CleanReport {
        input: args.input.clone(),
        output: args.output.clone(),
        method,
        columns,
        rows: table.row_count(),
    };
    render_mode(ctx.output, &report, write_text, write_pretty)
}

fn write_text(r: &CleanReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "output={}", r.output.display())?;
    writeln!(w, "method={}", r.method)?;
    writeln!(w, "columns={}", r.columns.join(","))?;
    writeln!(w, "rows={}", r.rows)
}

fn write_pretty(r: &CleanReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Cleaned Dataset")?;
    pretty_kv(w, "Input", r.input.display().to_string())?;
    pretty_kv(w, "Output", r.output.display().to_string())?;
    pretty_kv(w, "Method", r.method.as_str())?;
    pretty_kv(w, "Columns", r.columns.join(", "))?;
    pretty_kv(w, "Rows", r.rows.to_string())
}
