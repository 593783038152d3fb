//! Stats command - node counts per view.

use super::open_explorer;
use anyhow::Result;
use console::style;
use errlist_core::{Config, Severity};
use std::path::Path;

/// Print record and node counts for `file`.
pub fn run(config: &Config, file: &Path) -> Result<()> {
    let explorer = open_explorer(config, file)?;
    let stats = explorer.tree().stats();
    let store = explorer.store();

    let count = |severity: Severity| store.iter().filter(|r| r.severity == severity).count();

    println!("{}", style("Records:").bold());
    println!("  Total:          {}", style(store.len()).cyan());
    println!("  Errors:         {}", style(count(Severity::Error)).red());
    println!("  Warnings:       {}", style(count(Severity::Warning)).yellow());
    println!("  Comments:       {}", style(count(Severity::Comment)).blue());
    println!("  Unclassified:   {}", style(count(Severity::None)).dim());
    println!();
    println!("{}", style("Tree:").bold());
    println!("  Subjects:       {}", style(stats.subject_groups).cyan());
    println!("  Tags:           {}", style(stats.tag_groups).cyan());
    println!("  Directories:    {}", style(stats.directories).cyan());
    println!("  Files:          {}", style(stats.files).cyan());
    println!("  Leaves:         {}", style(stats.data_nodes).cyan());
    println!("  Nodes:          {}", style(explorer.tree().node_count()).cyan());

    Ok(())
}
