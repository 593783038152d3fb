//! Children command - one level of the tree, the way a tree view asks for it.

use super::{open_explorer, severity_style};
use anyhow::{Context, Result};
use console::style;
use errlist_core::{Config, NodeId, NodeKind};
use std::path::Path;

/// List the immediate children of `node`, interpreted as a node of `kind`.
pub fn run(config: &Config, file: &Path, kind: &str, node: Option<u32>, format: &str) -> Result<()> {
    let kind = NodeKind::parse(kind).with_context(|| {
        format!(
            "Unknown node kind: {}. Use root, subject, file, tag, directory, node or data.",
            kind
        )
    })?;
    let explorer = open_explorer(config, file)?;

    let children = explorer
        .children(kind, node.map(NodeId))
        .with_context(|| match node {
            Some(id) => format!("No {} node with id {}", kind, id),
            None => format!("A {} node needs --node", kind),
        })?;

    match format {
        "json" => {
            let json = serde_json::to_string_pretty(&children)
                .context("Failed to serialize to JSON")?;
            println!("{}", json);
        }
        "text" => {
            for child in &children {
                let marker = if child.is_collapsible() { "+" } else { " " };
                let name = match child.kind {
                    NodeKind::Data => {
                        severity_style(child.name.clone(), child.severity, &config.display)
                    }
                    _ => style(child.name.clone()).bold(),
                };
                println!(
                    "{} {}  {:<9} {}",
                    marker,
                    style(format!("{:>6}", child.id)).dim(),
                    child.kind.as_str(),
                    name
                );
            }
        }
        _ => {
            anyhow::bail!("Unsupported format: {}. Use 'json' or 'text'.", format);
        }
    }

    Ok(())
}
