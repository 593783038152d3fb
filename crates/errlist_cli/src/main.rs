//! errlist CLI - browse ImportErrorList diagnostics by subject, file and tag.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "errlist")]
#[command(about = "Browse diagnostic lists by subject, file and tag", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to ./errlist.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Which part of the tree to print.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum View {
    /// All three views
    All,
    /// Grouped by subject
    Subject,
    /// Grouped by file path
    File,
    /// Grouped by tag
    Tag,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the classification tree
    Tree {
        /// ImportErrorList JSON document
        file: PathBuf,
        /// View to print
        #[arg(long, value_enum, default_value = "all")]
        view: View,
        /// Hide node ids
        #[arg(long)]
        no_ids: bool,
    },
    /// List the immediate children of a node
    Children {
        /// ImportErrorList JSON document
        file: PathBuf,
        /// Node id (omit for the root)
        #[arg(long)]
        node: Option<u32>,
        /// Node kind (root, subject, file, tag, directory, node, data)
        #[arg(long, default_value = "root")]
        kind: String,
        /// Output format (json, text)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the diagnostic behind a leaf node
    Show {
        /// ImportErrorList JSON document
        file: PathBuf,
        /// Leaf node id
        node: u32,
        /// Output format (json, text)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Keep only diagnostics containing a word and print the rebuilt tree
    Search {
        /// ImportErrorList JSON document
        file: PathBuf,
        /// Substring to look for in filename, subject, description and tags
        query: String,
        /// View to print
        #[arg(long, value_enum, default_value = "all")]
        view: View,
    },
    /// Bookmark the locations under one or more nodes
    Mark {
        /// ImportErrorList JSON document
        file: PathBuf,
        /// Node ids; a group marks every diagnostic below it
        #[arg(required = true)]
        nodes: Vec<u32>,
    },
    /// Show node counts
    Stats {
        /// ImportErrorList JSON document
        file: PathBuf,
    },
    /// Load a document and verify the tree built from it
    Check {
        /// ImportErrorList JSON document
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize tracing subscriber
    // Respects RUST_LOG environment variable (e.g., RUST_LOG=debug)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Tree { file, view, no_ids } => commands::tree::run(&config, &file, view, no_ids),
        Commands::Children {
            file,
            node,
            kind,
            format,
        } => commands::children::run(&config, &file, &kind, node, &format),
        Commands::Show { file, node, format } => commands::show::run(&config, &file, node, &format),
        Commands::Search { file, query, view } => {
            commands::search::run(&config, &file, &query, view)
        }
        Commands::Mark { file, nodes } => commands::mark::run(&config, &file, &nodes),
        Commands::Stats { file } => commands::stats::run(&config, &file),
        Commands::Check { file } => commands::check::run(&config, &file),
    }
}
