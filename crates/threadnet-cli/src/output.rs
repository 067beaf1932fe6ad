//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! Every command handler receives an [`OutputMode`] and formats its output
//! accordingly: pretty output for humans, compact text for scripts and
//! pipes, or stable JSON.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.

use std::io::{self, IsTerminal, Write};

use clap::ValueEnum;
use serde::Serialize;
use threadnet_core::{ConfigError, TableError};
use threadnet_graph::GraphError;
use threadnet_render::RenderError;

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<20} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (tables, sections, visual framing).
    Pretty,
    /// Plain `key=value` lines and tab-separated rows.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Core resolution logic, separated from I/O for testability.
fn resolve_output_mode_inner(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    format_env: Option<&str>,
    is_tty: bool,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }

    if json_flag {
        return OutputMode::Json;
    }

    if let Some(val) = format_env {
        match val.to_lowercase().as_str() {
            "json" => return OutputMode::Json,
            "text" => return OutputMode::Text,
            "pretty" => return OutputMode::Pretty,
            _ => {} // unknown value, fall through to TTY detection
        }
    }

    if is_tty {
        OutputMode::Pretty
    } else {
        OutputMode::Text
    }
}

/// Resolve the output mode from CLI flags, environment, and TTY defaults.
pub fn resolve_output_mode(format_flag: Option<OutputMode>, json_flag: bool) -> OutputMode {
    let env_val = std::env::var("FORMAT").ok();
    let is_tty = io::stdout().is_terminal();
    resolve_output_mode_inner(format_flag, json_flag, env_val.as_deref(), is_tty)
}

/// A result row type that can be rendered in every mode.
///
/// `render_table` is reused for text mode rows.
pub trait Renderable: Serialize {
    /// Render for human consumption.
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Render as a single tab-separated text row (see [`table_headers`]).
    ///
    /// [`table_headers`]: Renderable::table_headers
    fn render_table(&self, w: &mut dyn Write) -> io::Result<()>;

    /// Column headers for text mode, in the same order as `render_table`.
    fn table_headers() -> &'static [&'static str]
    where
        Self: Sized,
    {
        &[]
    }
}

/// Write a list of [`Renderable`] rows to `out`.
///
/// - In JSON mode, a single JSON array.
/// - In text mode, a header line followed by one row per item.
/// - In pretty mode, items in sequence.
pub fn write_list<R: Renderable>(out: &mut dyn Write, items: &[R], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Pretty => {
            for item in items {
                item.render_human(out)?;
            }
        }
        OutputMode::Text => {
            let headers = R::table_headers();
            if !items.is_empty() && !headers.is_empty() {
                writeln!(out, "{}", headers.join("\t"))?;
            }
            for item in items {
                item.render_table(out)?;
            }
        }
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut *out, items)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Render a list of [`Renderable`] rows to stdout.
pub fn render_list<R: Renderable>(items: &[R], mode: OutputMode) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_list(&mut out, items, mode)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render a serializable value to stdout in the requested format.
///
/// Pretty and text modes share `human_fn`; use [`render_mode`] when they
/// differ.
pub fn render<T: Serialize>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            human_fn(value, &mut out)?;
        }
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "column_not_found").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl From<&anyhow::Error> for CliError {
    fn from(err: &anyhow::Error) -> Self {
        let (code, suggestion) = classify(err).map_or((None, None), |(code, hint)| {
            (Some(code.to_string()), hint.map(str::to_string))
        });
        Self {
            message: format!("{err:#}"),
            suggestion,
            error_code: code,
        }
    }
}

/// Error code and optional hint for the first library error in the chain.
fn classify(err: &anyhow::Error) -> Option<(&'static str, Option<&'static str>)> {
    const COLUMNS_HINT: &str = "run `threadnet summary <file>` to list the available columns";
    const OPTION_HINT: &str = "run with --help to see the accepted values";

    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<TableError>() {
            return Some(match e {
                TableError::UnsupportedFormat(_) => ("unsupported_format", Some("use a .csv or .xlsx file")),
                TableError::NotLoaded => ("not_loaded", None),
                TableError::ColumnNotFound(_) => ("column_not_found", Some(COLUMNS_HINT)),
                TableError::UnknownOption { .. } => ("unknown_option", Some(OPTION_HINT)),
                TableError::InvalidTimestamp { .. } => ("invalid_timestamp", None),
                _ => ("table_error", None),
            });
        }
        if let Some(e) = cause.downcast_ref::<GraphError>() {
            return Some(match e {
                GraphError::ColumnNotFound(_) => ("column_not_found", Some(COLUMNS_HINT)),
                GraphError::NonNumericWeight { .. } => ("non_numeric_weight", None),
                GraphError::InvalidTimestamp { .. } => ("invalid_timestamp", None),
                GraphError::UnknownOption { .. } => ("unknown_option", Some(OPTION_HINT)),
                GraphError::EmptyGraph => ("empty_graph", Some("check that the source and target columns have values")),
                GraphError::NotConverged { .. } => ("not_converged", None),
            });
        }
        if let Some(e) = cause.downcast_ref::<RenderError>() {
            return Some(match e {
                RenderError::UnknownOption { .. } => ("unknown_option", Some(OPTION_HINT)),
                RenderError::EmptyInput(_) => ("empty_input", None),
                _ => ("render_error", None),
            });
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return Some(("config_error", None));
        }
    }
    None
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_format_flag_wins_over_json_and_env() {
        let mode = resolve_output_mode_inner(Some(OutputMode::Text), true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_json_flag_wins_over_env() {
        let mode = resolve_output_mode_inner(None, true, Some("pretty"), true);
        assert_eq!(mode, OutputMode::Json);
    }

    #[test]
    fn resolve_format_env_case_insensitive() {
        let mode = resolve_output_mode_inner(None, false, Some("TEXT"), true);
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn resolve_format_env_unknown_falls_through_to_tty() {
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("fancy"), true),
            OutputMode::Pretty
        );
        assert_eq!(
            resolve_output_mode_inner(None, false, Some("fancy"), false),
            OutputMode::Text
        );
    }

    #[test]
    fn resolve_default_no_tty_is_text() {
        assert_eq!(resolve_output_mode_inner(None, false, None, false), OutputMode::Text);
    }

    #[derive(Serialize)]
    struct Row {
        name: String,
        count: u32,
    }

    impl Renderable for Row {
        fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
            writeln!(w, "{}: {}", self.name, self.count)
        }

        fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
            writeln!(w, "{}\t{}", self.name, self.count)
        }

        fn table_headers() -> &'static [&'static str] {
            &["NAME", "COUNT"]
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "a".into(),
                count: 1,
            },
            Row {
                name: "b".into(),
                count: 2,
            },
        ]
    }

    #[test]
    fn write_list_text_has_header() {
        let mut buf = Vec::new();
        write_list(&mut buf, &rows(), OutputMode::Text).expect("write");
        let s = String::from_utf8(buf).expect("utf8");
        assert_eq!(s, "NAME\tCOUNT\na\t1\nb\t2\n");
    }

    #[test]
    fn write_list_json_is_an_array() {
        let mut buf = Vec::new();
        write_list(&mut buf, &rows(), OutputMode::Json).expect("write");
        let v: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(v[1]["name"], "b");
        assert_eq!(v.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn write_list_empty_text_has_no_header() {
        let mut buf = Vec::new();
        write_list::<Row>(&mut buf, &[], OutputMode::Text).expect("write");
        assert!(buf.is_empty());
    }

    #[test]
    fn cli_error_classifies_library_errors() {
        let err = anyhow::Error::new(GraphError::ColumnNotFound("msg_author_id".into()))
            .context("building graph");
        let cli = CliError::from(&err);
        assert_eq!(cli.error_code.as_deref(), Some("column_not_found"));
        assert!(cli.suggestion.is_some());
        assert!(cli.message.contains("building graph"));
        assert!(cli.message.contains("msg_author_id"));

        let plain = CliError::from(&anyhow::anyhow!("boom"));
        assert!(plain.error_code.is_none());
        assert_eq!(plain.message, "boom");
    }
}
