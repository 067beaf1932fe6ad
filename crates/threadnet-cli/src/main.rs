#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use threadnet_core::config::resolve_config;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "threadnet: interaction graphs from forum message exports",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for --format json.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Analysis config (default: ./threadnet.toml when present).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Data",
        about = "Summarize a dataset",
        long_about = "Print record count, distinct authors/topics/IPs, columns and date range.",
        after_help = "EXAMPLES:\n    # Summarize an export\n    threadnet summary data/messages.csv\n\n    # Emit machine-readable output\n    threadnet summary data/messages.xlsx --format json"
    )]
    Summary(cmd::summary::SummaryArgs),

    #[command(
        next_help_heading = "Data",
        about = "Clean text columns",
        long_about = "Normalize text columns (HTML, URLs, special characters, whitespace) and save the result.",
        after_help = "EXAMPLES:\n    # Clean the configured text columns\n    threadnet clean data/messages.csv -o out/clean.csv\n\n    # Strip only HTML from one column\n    threadnet clean data/messages.csv -o out/clean.xlsx --columns msg_post --method html_only"
    )]
    Clean(cmd::clean::CleanArgs),

    #[command(
        next_help_heading = "Data",
        about = "Convert, filter and annotate a dataset",
        long_about = "Rewrite a dataset as CSV or XLSX, optionally adding <COLUMN>_UTC columns and keeping a subset of columns.",
        after_help = "EXAMPLES:\n    # Workbook to CSV\n    threadnet convert data/messages.xlsx -o data/messages.csv\n\n    # Add UTC dates and keep the graph columns\n    threadnet convert data/messages.csv -o out/slim.xlsx --timestamp msg_date --keep msg_author_id,msg_topic_id,msg_date_UTC"
    )]
    Convert(cmd::convert::ConvertArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Build the interaction graph",
        long_about = "Build the weighted author-topic interaction graph and report its properties.",
        after_help = "EXAMPLES:\n    # Default columns\n    threadnet graph data/messages.csv\n\n    # Custom columns, saving the edge list\n    threadnet graph data/replies.csv --source from --target to --weight count --edges out/edges.csv"
    )]
    Graph(cmd::graph::GraphArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Compute node centralities",
        long_about = "Compute degree, betweenness, closeness and eigenvector centrality for every node.",
        after_help = "EXAMPLES:\n    # Print the top rows\n    threadnet centrality data/messages.csv --limit 10\n\n    # Save the full table\n    threadnet centrality data/messages.csv -o out/centrality.xlsx"
    )]
    Centrality(cmd::centrality::CentralityArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Rank the most central nodes",
        long_about = "List the N nodes with the highest score for one centrality metric.",
        after_help = "EXAMPLES:\n    # Ten highest-betweenness nodes\n    threadnet top data/messages.csv --metric betweenness -n 10"
    )]
    Top(cmd::top::TopArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Detect communities",
        long_about = "Partition the interaction graph with Louvain or greedy modularity and report modularity and community sizes.",
        after_help = "EXAMPLES:\n    # Reproducible Louvain run\n    threadnet communities data/messages.csv --seed 7\n\n    # Greedy merging, saving assignments\n    threadnet communities data/messages.csv --method greedy -o out/communities.csv"
    )]
    Communities(cmd::communities::CommunitiesArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Graph properties over time",
        long_about = "Bucket records by calendar period and report the properties of each period's graph.",
        after_help = "EXAMPLES:\n    # Monthly graphs\n    threadnet temporal data/messages.csv --window month\n\n    # Weekly, JSON\n    threadnet temporal data/messages.csv --window W --format json"
    )]
    Temporal(cmd::temporal::TemporalArgs),

    #[command(
        next_help_heading = "Figures",
        about = "Render PNG figures",
        long_about = "Render a network drawing, centrality or degree histogram, temporal series, activity heatmap, or word cloud.",
        after_help = "EXAMPLES:\n    # Spring layout network\n    threadnet plot network data/messages.csv\n\n    # Degree histogram at screen resolution\n    threadnet plot degrees data/messages.csv --dpi 100 -o out/degrees.png\n\n    # Word cloud of cleaned posts\n    threadnet plot wordcloud data/messages.csv --column msg_post --clean advanced"
    )]
    Plot(cmd::plot::PlotArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("THREADNET_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "threadnet_core=debug,threadnet_graph=debug,threadnet_render=debug,threadnet=debug,info"
        } else {
            "threadnet_core=info,threadnet_graph=info,threadnet_render=info,threadnet=info,warn"
        })
    });

    let format = env::var("THREADNET_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    let cwd = env::current_dir()?;
    let config = resolve_config(cli.config.as_deref(), &cwd)?;
    debug!(?config, "resolved configuration");
    let ctx = cmd::Context { config, output };

    match &cli.command {
        Commands::Summary(args) => cmd::summary::run_summary(args, &ctx),
        Commands::Clean(args) => cmd::clean::run_clean(args, &ctx),
        Commands::Convert(args) => cmd::convert::run_convert(args, &ctx),
        Commands::Graph(args) => cmd::graph::run_graph(args, &ctx),
        Commands::Centrality(args) => cmd::centrality::run_centrality(args, &ctx),
        Commands::Top(args) => cmd::top::run_top(args, &ctx),
        Commands::Communities(args) => cmd::communities::run_communities(args, &ctx),
        Commands::Temporal(args) => cmd::temporal::run_temporal(args, &ctx),
        Commands::Plot(args) => cmd::plot::run_plot(args, &ctx),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = cli.output_mode();
    if let Err(err) = run(&cli, output) {
        tracing::debug!(error = ?err, "command failed");
        if render_error(output, &CliError::from(&err)).is_err() {
            eprintln!("error: {err:#}");
        }
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_sets_output_mode() {
        let cli = Cli::parse_from(["threadnet", "--json", "summary", "x.csv"]);
        assert!(cli.json);
        assert!(cli.output_mode().is_json());
    }

    #[test]
    fn format_flag_after_subcommand() {
        let cli = Cli::parse_from(["threadnet", "summary", "x.csv", "--format", "text"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["threadnet", "graph", "x.csv", "--config", "a.toml"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("a.toml")));
    }

    #[test]
    fn column_overrides_parse() {
        let cli = Cli::parse_from([
            "threadnet", "graph", "x.csv", "--source", "from", "--target", "to", "--weight", "n",
        ]);
        let Commands::Graph(args) = cli.command else {
            panic!("expected graph");
        };
        assert_eq!(args.columns.source.as_deref(), Some("from"));
        assert_eq!(args.columns.target.as_deref(), Some("to"));
        assert_eq!(args.columns.weight.as_deref(), Some("n"));
    }

    #[test]
    fn plot_shared_flags_parse_after_kind() {
        let cli = Cli::parse_from([
            "threadnet", "plot", "degrees", "x.csv", "--dpi", "72", "-o", "d.png", "--linear",
        ]);
        let Commands::Plot(args) = cli.command else {
            panic!("expected plot");
        };
        assert_eq!(args.dpi, Some(72));
        assert_eq!(args.save.as_deref(), Some(std::path::Path::new("d.png")));
        assert!(matches!(
            args.kind,
            cmd::plot::PlotKind::Degrees(cmd::plot::DegreesArgs { linear: true, .. })
        ));
    }

    #[test]
    fn clean_method_parses_via_from_str() {
        let cli = Cli::parse_from([
            "threadnet", "clean", "x.csv", "-o", "y.csv", "--method", "html_only",
        ]);
        let Commands::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert_eq!(args.method, Some(threadnet_core::CleaningMethod::HtmlOnly));
        assert!(
            Cli::try_parse_from(["threadnet", "clean", "x.csv", "-o", "y.csv", "--method", "nope"])
                .is_err()
        );
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["threadnet", "summary", "x.csv"],
            vec!["threadnet", "clean", "x.csv", "-o", "y.csv"],
            vec!["threadnet", "convert", "x.xlsx", "-o", "y.csv"],
            vec!["threadnet", "graph", "x.csv"],
            vec!["threadnet", "centrality", "x.csv"],
            vec!["threadnet", "top", "x.csv", "-n", "5"],
            vec!["threadnet", "communities", "x.csv", "--seed", "1"],
            vec!["threadnet", "temporal", "x.csv", "--window", "W"],
            vec!["threadnet", "plot", "network", "x.csv"],
            vec!["threadnet", "plot", "centrality", "x.csv"],
            vec!["threadnet", "plot", "degrees", "x.csv"],
            vec!["threadnet", "plot", "temporal", "x.csv"],
            vec!["threadnet", "plot", "heatmap", "x.csv"],
            vec!["threadnet", "plot", "wordcloud", "x.csv"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?}: {:?}",
                args,
                result.err()
            );
        }
    }
}
