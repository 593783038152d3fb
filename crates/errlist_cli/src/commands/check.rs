//! Check command - load a document and verify the resulting tree.

use super::{read_with_spinner, with_suggestion};
use anyhow::Result;
use console::style;
use errlist_core::{CancelToken, Config, Explorer};
use std::path::Path;

/// Load `file` and report on the structure built from it.
pub fn run(config: &Config, file: &Path) -> Result<()> {
    let records = read_with_spinner(file)?;

    let mut explorer = Explorer::new(config);
    let report = explorer
        .load_records(records, None, &CancelToken::new())
        .map_err(with_suggestion)?;
    let problems = explorer.tree().check_invariants();

    println!();
    println!("{}", style("Check Report:").bold());
    println!("  Records loaded:      {}", style(report.records).cyan());
    println!(
        "  Directories merged:  {}",
        style(report.merged_directories).cyan()
    );
    println!(
        "  Load time:           {}",
        style(format!("{:.1?}", report.elapsed)).cyan()
    );
    if report.skipped_paths > 0 {
        println!(
            "  Without a path:      {}",
            style(report.skipped_paths).yellow()
        );
    }
    for problem in &problems {
        println!("    {} {}", style("×").red(), problem);
    }

    println!();
    if problems.is_empty() {
        println!("{} {}", style("✓").green(), style("Tree is consistent").green());
    } else {
        anyhow::bail!("{} structural problem(s) found", problems.len());
    }
    if report.skipped_paths > 0 {
        println!();
        println!("{}", style("Recommendations:").bold());
        println!(
            "  {} Records without a filename only appear in the Subject and Tag views",
            style("→").cyan()
        );
    }

    Ok(())
}
