//! `threadnet summary`: headline counts for a dataset.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use threadnet_core::DatasetSummary;

use crate::cmd::{Context, load_table};
use crate::output::{pretty_kv, pretty_section, render_mode};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,
}

pub fn run_summary(args: &SummaryArgs, ctx: &Context) -> anyhow::Result<()> {
    let table = load_table(&args.input)?;
    let summary = DatasetSummary::of(&table);

    render_mode(ctx.output, &summary, write_text, write_pretty)
}

fn date_range(s: &DatasetSummary) -> String {
    s.date_range
        .as_ref()
        .map_or_else(|| "-".to_string(), |(lo, hi)| format!("{lo} .. {hi}"))
}

fn write_text(s: &DatasetSummary, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "total_messages={}", s.total_messages)?;
    writeln!(w, "unique_authors={}", s.unique_authors)?;
    writeln!(w, "unique_topics={}", s.unique_topics)?;
    writeln!(w, "unique_ips={}", s.unique_ips)?;
    writeln!(w, "date_range={}", date_range(s))?;
    writeln!(w, "columns={}", s.columns.join(","))
}

fn write_pretty(s: &DatasetSummary, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Dataset Summary")?;
    pretty_kv(w, "Total messages", s.total_messages.to_string())?;
    pretty_kv(w, "Unique authors", s.unique_authors.to_string())?;
    pretty_kv(w, "Unique topics", s.unique_topics.to_string())?;
    pretty_kv(w, "Unique IPs", s.unique_ips.to_string())?;
    pretty_kv(w, "Date range", date_range(s))?;
    writeln!(w)?;
    writeln!(w, "Columns ({}):", s.columns.len())?;
    for name in &s.columns {
        writeln!(w, "  {name}")?;
    }
    Ok(())
}
