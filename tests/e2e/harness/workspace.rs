use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding the documents a scenario loads
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create a workspace holding `documents`, keyed by relative path
    pub fn with_files(documents: HashMap<String, Vec<u8>>) -> Result<Self> {
        let dir = TempDir::new().context("Failed to create scenario directory")?;
        let workspace = Self { dir };
        for (name, bytes) in &documents {
            workspace.write_file(name, bytes)?;
        }
        Ok(workspace)
    }

    /// Copy every document of `tests/fixtures/<name>` next to the others.
    /// Fixture directories are flat.
    pub fn add_fixture(&self, name: &str) -> Result<()> {
        let source = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("fixtures")
            .join(name);
        let entries = fs::read_dir(&source)
            .with_context(|| format!("Fixture not found: {}", source.display()))?;
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let bytes = fs::read(&path)
                .with_context(|| format!("Failed to read fixture {}", path.display()))?;
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .with_context(|| format!("Fixture file name is not UTF-8: {}", path.display()))?;
            self.write_file(file_name, &bytes)?;
        }
        Ok(())
    }

    /// Root of the workspace
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a document, creating missing directories on the way
    pub fn write_file(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let target = self.file_path(name);
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        fs::write(&target, bytes).with_context(|| format!("Failed to write {}", name))
    }

    /// Absolute path of a document in the workspace
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.path().join(name)
    }
}
