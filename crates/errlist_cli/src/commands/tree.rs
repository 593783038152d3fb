//! Tree command - print the classification tree.

use super::{open_explorer, print_tree, view_root};
use crate::View;
use anyhow::Result;
use errlist_core::Config;
use std::path::Path;

/// Print one view, or all three, of the tree built from `file`.
pub fn run(config: &Config, file: &Path, view: View, no_ids: bool) -> Result<()> {
    let explorer = open_explorer(config, file)?;

    let mut display = config.display.clone();
    if no_ids {
        display.show_ids = false;
    }
    print_tree(&explorer, view_root(view), &display)
}
