//! Show command - resolve a leaf to its diagnostic and navigation target.

use super::{open_explorer, severity_style, with_suggestion};
use anyhow::{Context, Result};
use console::style;
use errlist_core::{Config, NodeId};
use serde_json::json;
use std::path::Path;

/// Print the record behind a data node and where an editor should jump.
pub fn run(config: &Config, file: &Path, node: u32, format: &str) -> Result<()> {
    let explorer = open_explorer(config, file)?;
    let record = explorer.resolve(NodeId(node)).map_err(with_suggestion)?;
    let target = explorer
        .navigation_target(NodeId(node))
        .map_err(with_suggestion)?;

    match format {
        "json" => {
            let value = json!({ "record": record, "target": target });
            let json = serde_json::to_string_pretty(&value).context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
        "text" => {
            println!(
                "{} {}",
                severity_style(record.severity.to_string(), record.severity, &config.display),
                style(&record.subject).bold()
            );
            println!("  File:        {}:{}:{}", record.filename, record.row, record.column);
            if !record.description.is_empty() {
                println!("  Description: {}", record.description);
            }
            if !record.tags.is_empty() {
                println!("  Tags:        {}", record.tags.join(", "));
            }
            if !record.comment.is_empty() {
                println!("  Comment:     {}", record.comment);
            }
            println!(
                "  Jump to:     {} line {} column {} (0-based)",
                style(&target.filename).cyan(),
                target.line,
                target.column
            );
        }
        _ => {
            anyhow::bail!("Unsupported format: {}. Use 'json' or 'text'.", format);
        }
    }

    Ok(())
}
