//! Search command - filter records and rebuild the tree from the survivors.

use super::{open_explorer, print_tree, view_root, with_suggestion};
use crate::View;
use anyhow::Result;
use console::style;
use errlist_core::Config;
use std::path::Path;

/// Keep the records containing `query` and print the rebuilt tree.
pub fn run(config: &Config, file: &Path, query: &str, view: View) -> Result<()> {
    let mut explorer = open_explorer(config, file)?;

    let removed = explorer.filter(query);
    let report = explorer.rebuild().map_err(with_suggestion)?;

    println!(
        "{} {} of {} records match {}",
        style("→").cyan(),
        style(report.records).green(),
        report.records + removed,
        style(format!("{:?}", query)).bold()
    );
    if report.records == 0 {
        return Ok(());
    }
    println!();
    print_tree(&explorer, view_root(view), &config.display)
}
