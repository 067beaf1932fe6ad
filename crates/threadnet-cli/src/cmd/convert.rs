//! `threadnet convert`: reformat a dataset, optionally adding UTC columns
//! and dropping unused ones.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Args;
use serde::Serialize;
use threadnet_core::TableLoader;
use threadnet_core::io::FileFormat;
use threadnet_core::loader::xlsx_to_csv;

use crate::cmd::{Context, split_list};
use crate::output::{pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    /// Destination file; the format follows the extension.
    #[arg(short, long)]
    pub output: PathBuf,

    /// UNIX-seconds column to render as `<COLUMN>_UTC` (repeatable).
    #[arg(long = "timestamp", value_name = "COLUMN")]
    pub timestamps: Vec<String>,

    /// Comma-separated columns to keep, in order.
    #[arg(long, value_name = "A,B")]
    pub keep: Option<String>,
}

#[derive(Debug, Serialize)]
struct ConvertReport {
    input: PathBuf,
    output: PathBuf,
    rows: Option<usize>,
    columns: Option<Vec<String>>,
}

pub fn run_convert(args: &ConvertArgs, ctx: &Context) -> anyhow::Result<()> {
    let report = if is_plain_workbook_export(args)? {
        xlsx_to_csv(&args.input, &args.output)?;
        ConvertReport {
            input: args.input.clone(),
            output: args.output.clone(),
            rows: None,
            columns: None,
        }
    } else {
        transform(args)?
    };

    render_mode(ctx.output, &report, write_text, write_pretty)
}

/// XLSX to CSV with no column edits.
fn is_plain_workbook_export(args: &ConvertArgs) -> anyhow::Result<bool> {
    if !args.timestamps.is_empty() || args.keep.is_some() {
        return Ok(false);
    }
    Ok(format_of(&args.input)? == FileFormat::Xlsx && format_of(&args.output)? == FileFormat::Csv)
}

fn format_of(path: &Path) -> anyhow::Result<FileFormat> {
    Ok(FileFormat::from_path(path)?)
}

fn transform(args: &ConvertArgs) -> anyhow::Result<ConvertReport> {
    let mut loader = TableLoader::new(&args.input);
    loader
        .load()
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    for column in &args.timestamps {
        loader.convert_unix_timestamp(column)?;
    }
    if let Some(keep) = args.keep.as_deref() {
        loader.filter_columns(&split_list(keep))?;
    }
    loader.save(&args.output)?;

    let table = loader.table()?;
    Ok(ConvertReport {
        input: args.input.clone(),
        output: args.output.clone(),
        rows: Some(table.row_count()),
        columns: Some(table.column_names()),
    })
}

fn write_text(r: &ConvertReport, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "output={}", r.output.display())?;
    if let Some(rows) = r.rows {
        writeln!(w, "rows={rows}")?;
    }
    if let Some(columns) = &r.columns {
        writeln!(w, "columns={}", columns.join(","))?;
    }
    Ok(())
}

fn write_pretty(r: &ConvertReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Converted Dataset")?;
    pretty_kv(w, "Input", r.input.display().to_string())?;
    pretty_kv(w, "Output", r.output.display().to_string())?;
    if let Some(rows) = r.rows {
        pretty_kv(w, "Rows", rows.to_string())?;
    }
    if let Some(columns) = &r.columns {
        pretty_kv(w, "Columns", columns.join(", "))?;
    }
    Ok(())
}
