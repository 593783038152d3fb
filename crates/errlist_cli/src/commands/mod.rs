//! CLI commands.

pub mod check;
pub mod children;
pub mod mark;
pub mod search;
pub mod show;
pub mod stats;
pub mod tree;

use crate::View;
use anyhow::{Context, Result};
use console::{style, StyledObject};
use errlist_core::{
    read_document, spawn_load, Config, DisplayConfig, ErrListError, Explorer, NewRecord,
    NodeId, NodeKind, NodeView, Severity,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Loads the configuration named on the command line, or `./errlist.toml`.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::load_file(p)
            .with_context(|| format!("Failed to load config {}", p.display()))?,
        None => Config::load(Path::new(".")).context("Failed to load errlist.toml")?,
    };
    Ok(config)
}

/// Parses a document and builds the explorer on a background thread,
/// showing a progress bar while it runs.
pub fn open_explorer(config: &Config, file: &Path) -> Result<Explorer> {
    let records = read_with_spinner(file)?;

    let pb = ProgressBar::new(records.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} {msg:12} [{bar:40.cyan/blue}] {pos}/{len}")
            .unwrap()
            .progress_chars("█▓▒░  "),
    );
    pb.set_message("Loading");

    let handle = spawn_load(Explorer::new(config), records);
    while !handle.is_finished() {
        let (done, _) = handle.progress();
        pb.set_position(done as u64);
        std::thread::sleep(Duration::from_millis(50));
    }
    let outcome = handle.join()?;
    pb.finish_and_clear();

    let report = outcome.result.map_err(with_suggestion)?;
    tracing::debug!(
        records = report.records,
        skipped = report.skipped_paths,
        "document loaded"
    );
    Ok(outcome.explorer)
}

/// Reads and parses a document behind a spinner.
pub fn read_with_spinner(file: &Path) -> Result<Vec<NewRecord>> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Reading {}...", file.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let records = read_document(file);
    spinner.finish_and_clear();
    records.map_err(with_suggestion)
}

/// Attaches the recovery suggestion of a core error to its message.
pub fn with_suggestion(err: ErrListError) -> anyhow::Error {
    match err.recovery_suggestion() {
        Some(hint) => anyhow::anyhow!("{}\n  hint: {}", err, hint),
        None => err.into(),
    }
}

/// Root node of a view.
pub fn view_root(view: View) -> NodeId {
    match view {
        View::All => NodeId::ROOT,
        View::Subject => NodeId::SUBJECT,
        View::File => NodeId::FILE,
        View::Tag => NodeId::TAG,
    }
}

/// Styles text by severity.
pub fn severity_style(text: String, severity: Severity, display: &DisplayConfig) -> StyledObject<String> {
    let styled = style(text);
    if !display.color {
        return styled;
    }
    match severity {
        Severity::Error => styled.red(),
        Severity::Warning => styled.yellow(),
        Severity::Comment => styled.blue(),
        Severity::None => styled.dim(),
    }
}

/// Prints the subtree under `from` with severity colours.
pub fn print_tree(explorer: &Explorer, from: NodeId, display: &DisplayConfig) -> Result<()> {
    let start = explorer
        .tree()
        .get_tree_node(from)
        .ok_or(ErrListError::NodeNotFound(from.0))?;
    if from != NodeId::ROOT {
        println!("{}", style(&start.name).bold());
    }
    let base = usize::from(from != NodeId::ROOT);
    print_children(explorer, &start, base, display);
    Ok(())
}

fn print_children(explorer: &Explorer, parent: &NodeView, depth: usize, display: &DisplayConfig) {
    let Some(children) = explorer.children(parent.kind, Some(parent.id)) else {
        return;
    };
    for child in children {
        let pad = " ".repeat(depth * display.indent);
        let label = if display.show_ids {
            format!("[{}] {}", child.id, child.name)
        } else {
            child.name.clone()
        };
        match child.kind {
            NodeKind::Data => println!("{}{}", pad, severity_style(label, child.severity, display)),
            NodeKind::Directory => println!("{}{}", pad, style(label).cyan()),
            _ => println!("{}{}", pad, style(label).bold()),
        }
        print_children(explorer, &child, depth + 1, display);
    }
}
