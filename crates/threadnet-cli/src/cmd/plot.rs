//! `threadnet plot <kind>`: render PNG figures.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Subcommand};
use serde::Serialize;
use threadnet_core::CleaningMethod;
use threadnet_core::text::{clean_column, concat_column_text};
use threadnet_graph::{
    CentralityMetric, activity_matrix, build_temporal_graphs, centrality_table,
    temporal_properties,
};
use threadnet_render::{
    HeatmapOptions, Layout, NetworkPlotOptions, RenderConfig, Renderer, WordCloudOptions,
};

use crate::cmd::temporal::time_settings;
use crate::cmd::{ColumnArgs, Context, load_graph, load_table, split_list};
use crate::output::{pretty_kv, render};

#[derive(Args, Debug)]
pub struct PlotArgs {
    #[command(subcommand)]
    pub kind: PlotKind,

    /// Directory for figures without an explicit --save path.
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Raster resolution.
    #[arg(long, global = true)]
    pub dpi: Option<u32>,

    /// Write the figure to this path instead of the output directory.
    #[arg(short = 'o', long = "save", global = true, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum PlotKind {
    /// Node-link drawing of the interaction graph.
    Network(NetworkArgs),
    /// Histogram of one centrality next to its top ten nodes.
    Centrality(CentralityPlotArgs),
    /// Node degree histogram.
    Degrees(DegreesArgs),
    /// Graph properties per calendar period.
    Temporal(TemporalPlotArgs),
    /// Records per period of the most active sources.
    Heatmap(HeatmapArgs),
    /// Word cloud of a text column.
    Wordcloud(WordcloudArgs),
}

#[derive(Args, Debug)]
pub struct NetworkArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// spring, circular, or kamada_kawai (default: `render.layout`).
    #[arg(long)]
    pub layout: Option<String>,

    #[arg(long, default_value = "Network Graph")]
    pub title: String,

    /// Draw node ids.
    #[arg(long)]
    pub labels: bool,

    /// Marker area in square points.
    #[arg(long, default_value_t = 300.0)]
    pub node_size: f64,

    /// Colour name or #rrggbb.
    #[arg(long, default_value = "lightblue")]
    pub node_color: String,

    /// Seed for the spring layout.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Args, Debug)]
pub struct CentralityPlotArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// degree, betweenness, closeness, or eigenvector.
    #[arg(long)]
    pub metric: Option<String>,

    #[arg(long)]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct DegreesArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Omit the log-scale panel.
    #[arg(long)]
    pub linear: bool,
}

#[derive(Args, Debug)]
pub struct TemporalPlotArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    #[command(flatten)]
    pub columns: ColumnArgs,

    /// Timestamp column.
    #[arg(long, value_name = "COLUMN")]
    pub time: Option<String>,

    /// day, week, month, or year.
    #[arg(long)]
    pub window: Option<String>,

    /// Comma-separated properties (default: num_nodes,num_edges,density,avg_degree).
    #[arg(long, value_name = "A,B")]
    pub metrics: Option<String>,
}

#[derive(Args, Debug)]
pub struct HeatmapArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    /// Column whose values become heatmap rows (default: the source column).
    #[arg(long, value_name = "COLUMN")]
    pub source: Option<String>,

    /// Timestamp column.
    #[arg(long, value_name = "COLUMN")]
    pub time: Option<String>,

    /// day, week, month, or year.
    #[arg(long)]
    pub window: Option<String>,

    /// Number of most active sources to show.
    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    #[arg(long, default_value = "Activity Heatmap")]
    pub title: String,
}

#[derive(Args, Debug)]
pub struct WordcloudArgs {
    /// CSV or XLSX dataset.
    pub input: PathBuf,

    /// Text column (default: the first configured text column).
    #[arg(long, value_name = "COLUMN")]
    pub column: Option<String>,

    #[arg(long, default_value_t = 100)]
    pub max_words: usize,

    /// Colour name or #rrggbb.
    #[arg(long, default_value = "white")]
    pub background: String,

    /// Clean the column with this method first.
    #[arg(long, value_name = "METHOD")]
    pub clean: Option<CleaningMethod>,

    #[arg(long, default_value = "Word Cloud")]
    pub title: String,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Serialize)]
struct PlotReport {
    kind: &'static str,
    path: Option<PathBuf>,
}

pub fn run_plot(args: &PlotArgs, ctx: &Context) -> anyhow::Result<()> {
    let renderer = Renderer::new(RenderConfig {
        output_dir: args
            .output_dir
            .clone()
            .unwrap_or_else(|| ctx.config.render.output_dir.clone()),
        dpi: args.dpi.unwrap_or(ctx.config.render.dpi),
    })?;
    let save = args.save.as_deref();

    let (kind, path) = match &args.kind {
        PlotKind::Network(a) => {
            let layout: Layout = a
                .layout
                .as_deref()
                .unwrap_or(&ctx.config.render.layout)
                .parse()?;
            let graph = load_graph(&a.input, &a.columns, ctx)?;
            let options = NetworkPlotOptions {
                title: a.title.clone(),
                node_size: a.node_size,
                node_color: a.node_color.clone(),
                with_labels: a.labels,
                layout,
                seed: a.seed,
                save_path: args.save.clone(),
            };
            ("network", Some(renderer.plot_network(&graph, &options)?))
        }
        PlotKind::Centrality(a) => {
            let metric: CentralityMetric = a
                .metric
                .as_deref()
                .unwrap_or(&ctx.config.analysis.metric)
                .parse()?;
            let graph = load_graph(&a.input, &a.columns, ctx)?;
            let table = centrality_table(&graph)?;
            let path =
                renderer.plot_centrality_distribution(&table, metric, a.title.as_deref(), save)?;
            ("centrality", Some(path))
        }
        PlotKind::Degrees(a) => {
            let graph = load_graph(&a.input, &a.columns, ctx)?;
            let path = renderer.plot_degree_distribution(&graph, !a.linear, save)?;
            ("degrees", Some(path))
        }
        PlotKind::Temporal(a) => {
            let (time_col, window) = time_settings(a.time.as_deref(), a.window.as_deref(), ctx)?;
            let table = load_table(&a.input)?;
            let graphs = build_temporal_graphs(
                &table,
                time_col,
                window,
                a.columns.source(ctx),
                a.columns.target(ctx),
            )?;
            let series = temporal_properties(&graphs)?;
            let metrics = a.metrics.as_deref().map(split_list).unwrap_or_default();
            let metrics: Vec<&str> = metrics.iter().map(String::as_str).collect();
            let path = renderer.plot_temporal_graph_properties(&series, &metrics, save)?;
            ("temporal", Some(path))
        }
        PlotKind::Heatmap(a) => {
            let (time_col, window) = time_settings(a.time.as_deref(), a.window.as_deref(), ctx)?;
            let source = a.source.as_deref().unwrap_or(&ctx.config.columns.source);
            let table = load_table(&a.input)?;
            let matrix = activity_matrix(&table, time_col, window, source, a.rows)?;
            let options = HeatmapOptions {
                title: a.title.clone(),
                xlabel: "Period".to_string(),
                ylabel: source.to_string(),
                x_labels: matrix.periods.iter().map(ToString::to_string).collect(),
                y_labels: matrix.rows.iter().map(ToString::to_string).collect(),
                save_path: args.save.clone(),
            };
            ("heatmap", Some(renderer.plot_heatmap(&matrix.counts, &options)?))
        }
        PlotKind::Wordcloud(a) => {
            let column = match a.column.as_deref() {
                Some(c) => c,
                None => ctx
                    .config
                    .columns
                    .text
                    .first()
                    .map(String::as_str)
                    .context("no text column configured; pass --column")?,
            };
            let mut table = load_table(&a.input)?;
            if let Some(method) = a.clean {
                clean_column(&mut table, column, method)?;
            }
            let text = concat_column_text(&table, column)?;
            let options = WordCloudOptions {
                title: a.title.clone(),
                max_words: a.max_words,
                background: a.background.clone(),
                seed: a.seed,
                save_path: args.save.clone(),
            };
            ("wordcloud", renderer.create_wordcloud(&text, &options)?)
        }
    };

    let report = PlotReport { kind, path };
    render(ctx.output, &report, |r, w| {
        pretty_kv(w, "Plot", r.kind)?;
        match &r.path {
            Some(p) => pretty_kv(w, "Saved", p.display().to_string()),
            None => pretty_kv(w, "Saved", "nothing (word cloud support not compiled in)"),
        }
    })
}
