//! Lineage CLI - Explore OpenLineage lineage graphs from the terminal
//!
//! Reads exported OpenLineage run events, builds the job and dataset graph,
//! and lets you inspect it or export it for diagramming tools.

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::*;
use config::LineageConfig;
use output::OutputFormat;

/// Data lineage explorer for OpenLineage events.
///
/// Builds a directed graph of jobs and datasets, classifies datasets into
/// source, bronze, silver and gold layers, and traces what feeds a table
/// and what it feeds.
#[derive(Parser)]
#[command(name = "lineage")]
#[command(author, version)]
#[command(about = "Data lineage explorer for OpenLineage events")]
#[command(propagate_version = true)]
#[command(next_help_heading = "Options")]
#[command(after_help = "Quick Start:
  lineage graph                 Summarize the lineage graph
  lineage tables                List tables by source system
  lineage show orders           What feeds orders, and what it feeds

Examples:
  lineage graph --system \"Data Lake\" --hide-jobs
  lineage catalog --layer gold
  lineage export -F mermaid -o lineage.mmd")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// OpenLineage event file (JSON envelope, JSON array or JSON Lines)
    #[arg(short, long, global = true, env = "LINEAGE_INPUT")]
    input: Option<PathBuf>,

    /// Use every event instead of the latest COMPLETE run per job
    #[arg(long, global = true)]
    all_events: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the lineage graph: counts, nodes and cycles
    #[command(visible_alias = "g")]
    Graph {
        /// Only datasets from this source system (jobs are always kept)
        #[arg(short, long)]
        system: Option<String>,

        /// Only the upstream and downstream lineage of this table
        #[arg(short, long)]
        table: Option<String>,

        /// Drop job nodes and link datasets directly
        #[arg(long)]
        hide_jobs: bool,
    },

    /// Show what feeds a table and what it feeds
    Show {
        /// Table name (see `lineage tables`)
        table: String,

        /// Only datasets from this source system
        #[arg(short, long)]
        system: Option<String>,

        /// Drop job nodes and link datasets directly
        #[arg(long)]
        hide_jobs: bool,
    },

    /// List table names by source system
    #[command(visible_alias = "ls")]
    Tables {
        /// Only this source system
        #[arg(short, long)]
        system: Option<String>,
    },

    /// Dataset details: layer, source, volume and schema
    Catalog {
        /// Only datasets in this layer (source, bronze, silver, gold, unknown)
        #[arg(short, long)]
        layer: Option<String>,

        /// Only datasets from this source system
        #[arg(short, long)]
        system: Option<String>,

        /// Only the lineage of this table
        #[arg(short, long)]
        table: Option<String>,
    },

    /// Export the lineage graph as JSON, Mermaid or Graphviz DOT
    Export {
        /// Export format: json, mermaid, dot
        #[arg(short = 'F', long = "export-format", default_value = "json")]
        export_format: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only datasets from this source system
        #[arg(short, long)]
        system: Option<String>,

        /// Only the lineage of this table
        #[arg(short, long)]
        table: Option<String>,

        /// Drop job nodes and link datasets directly
        #[arg(long)]
        hide_jobs: bool,

        /// Single-line JSON (json format only)
        #[arg(long)]
        compact: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: completions::Shell,

        /// Show installation instructions instead of generating completions
        #[arg(long)]
        instructions: bool,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = LineageConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    // Apply color override from config if set
    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    let source = EventSource {
        path: cli.input.unwrap_or_else(|| config.input_path()),
        latest_only: config.latest_only() && !cli.all_events,
    };
    let show_jobs = |hide_jobs: bool| config.show_jobs() && !hide_jobs;

    match command {
        Commands::Graph {
            system,
            table,
            hide_jobs,
        } => {
            let view = GraphView {
                system,
                table,
                show_jobs: show_jobs(hide_jobs),
            };
            graph::run(&source, &view, format)
        }
        Commands::Show {
            table,
            system,
            hide_jobs,
        } => show::run(
            &source,
            &table,
            system.as_deref(),
            show_jobs(hide_jobs),
            format,
        ),
        Commands::Tables { system } => tables::run(&source, system.as_deref(), format),
        Commands::Catalog {
            layer,
            system,
            table,
        } => {
            let view = GraphView {
                system,
                table,
                show_jobs: true,
            };
            catalog::run(&source, &view, layer.as_deref(), format)
        }
        Commands::Export {
            export_format,
            output,
            system,
            table,
            hide_jobs,
            compact,
        } => {
            let view = GraphView {
                system,
                table,
                show_jobs: show_jobs(hide_jobs),
            };
            export::run(
                &source,
                &view,
                &export_format,
                output.as_deref(),
                compact,
                format,
            )
        }
        Commands::Completions {
            shell,
            instructions,
        } => {
            if instructions {
                completions::run(shell, format)
            } else {
                let mut cmd = Cli::command();
                completions::generate_completions_with_cmd(shell, &mut cmd);
                Ok(())
            }
        }
    }
}
