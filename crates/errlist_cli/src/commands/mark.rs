//! Mark command - bookmark the locations under selected nodes.

use super::{open_explorer, severity_style, with_suggestion};
use anyhow::Result;
use console::style;
use errlist_core::{Config, MarkerRegistry, NodeId};
use std::path::Path;

/// Mark every diagnostic under `nodes` and print the markers per file.
pub fn run(config: &Config, file: &Path, nodes: &[u32]) -> Result<()> {
    let explorer = open_explorer(config, file)?;

    let mut markers = MarkerRegistry::new();
    for &node in nodes {
        let records = explorer
            .records_under(NodeId(node))
            .map_err(with_suggestion)?;
        let added = markers.mark_records(records);
        tracing::debug!(node = node, added = added, "marked records");
    }

    println!(
        "{} {} marker(s)",
        style("✓").green(),
        style(markers.len()).cyan()
    );
    let mut current: Option<String> = None;
    for marker in markers.iter() {
        if current.as_deref() != Some(marker.filename.as_str()) {
            println!("{}", style(&marker.filename).bold());
            current = Some(marker.filename.clone());
        }
        println!(
            "  {:>6}  {}",
            marker.row,
            severity_style(marker.severity.to_string(), marker.severity, &config.display)
        );
    }

    Ok(())
}
