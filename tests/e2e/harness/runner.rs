use super::assertions::{Assertion, StatusMatch, View};
use super::steps::ScenarioStep;
use super::workspace::TestWorkspace;
use anyhow::{anyhow, Context, Result};
use errlist_core::{
    spawn_load, CancelToken, Config, ErrListError, Explorer, LoadStatus, MarkerRegistry,
    NodeId, NodeKind, NodeView, FIRST_RECORD_ID,
};
use std::collections::{HashMap, HashSet};

/// Executes scenarios against a real explorer
pub struct ScenarioRunner {
    workspace: TestWorkspace,
    config: Config,
    explorer: Explorer,
    markers: MarkerRegistry,
    last_error: Option<ErrListError>,
    current_step: usize,
}

impl ScenarioRunner {
    /// Create a new runner with initial files and fixtures
    pub fn new(
        initial_files: HashMap<String, Vec<u8>>,
        fixtures: &[String],
        config: Config,
    ) -> Result<Self> {
        let workspace = TestWorkspace::with_files(initial_files)?;
        for fixture in fixtures {
            workspace.add_fixture(fixture)?;
        }
        let explorer = Explorer::new(&config);

        Ok(Self {
            workspace,
            config,
            explorer,
            markers: MarkerRegistry::new(),
            last_error: None,
            current_step: 0,
        })
    }

    /// Get current step number
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// Execute all steps in sequence
    pub fn execute(&mut self, steps: &[ScenarioStep]) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            self.current_step = i;
            self.execute_step(step)
                .with_context(|| format!("Step {}: {:?}", i, step))?;
        }
        Ok(())
    }

    /// Execute a single step
    fn execute_step(&mut self, step: &ScenarioStep) -> Result<()> {
        match step {
            ScenarioStep::LoadDocument { name } => self.handle_load(name),
            ScenarioStep::LoadInBackground { name } => self.handle_background_load(name),
            ScenarioStep::LoadCancelledAfter { name, batches } => {
                self.handle_cancelled_load(name, *batches)
            }
            ScenarioStep::LoadExpectingFailure { name } => self.handle_failing_load(name),
            ScenarioStep::Filter { query } => {
                self.explorer.filter(query);
                Ok(())
            }
            ScenarioStep::Rebuild => {
                self.explorer.rebuild().context("Rebuild failed")?;
                Ok(())
            }
            ScenarioStep::RebuildExpectingFailure => match self.explorer.rebuild() {
                Ok(report) => Err(anyhow!(
                    "Expected rebuild to fail, it built {} records",
                    report.records
                )),
                Err(e) => {
                    self.last_error = Some(e);
                    Ok(())
                }
            },
            ScenarioStep::Mark { view, path } => self.handle_mark(*view, path),
            ScenarioStep::Assert { assertion } => self.handle_assertion(assertion),
        }
    }

    // ===== Loading =====

    fn handle_load(&mut self, name: &str) -> Result<()> {
        let path = self.workspace.file_path(name);
        self.explorer
            .load_file(&path, None, &CancelToken::new())
            .with_context(|| format!("Failed to load {}", name))?;
        Ok(())
    }

    fn handle_background_load(&mut self, name: &str) -> Result<()> {
        let path = self.workspace.file_path(name);
        let records = errlist_core::read_document(&path)?;
        let explorer = std::mem::replace(&mut self.explorer, Explorer::new(&self.config));

        let handle = spawn_load(explorer, records);
        let outcome = handle.join()?;
        self.explorer = outcome.explorer;
        outcome.result.with_context(|| format!("Background load of {} failed", name))?;
        Ok(())
    }

    fn handle_cancelled_load(&mut self, name: &str, batches: usize) -> Result<()> {
        let path = self.workspace.file_path(name);
        let cancel = CancelToken::new();
        let seen = std::sync::atomic::AtomicUsize::new(0);
        let token = cancel.clone();
        let progress = move |_done: usize, _total: usize| {
            let n = seen.fetch_add(1, std::sync::atomic::Ordering::SeqCst) + 1;
            if n >= batches {
                token.cancel();
            }
        };
        if batches == 0 {
            cancel.cancel();
        }

        match self.explorer.load_file(&path, Some(&progress), &cancel) {
            Err(ErrListError::Cancelled { .. }) => Ok(()),
            Err(e) => Err(anyhow!("Expected cancellation, got error: {}", e)),
            Ok(report) => Err(anyhow!(
                "Expected cancellation, load finished with {} records",
                report.records
            )),
        }
    }

    fn handle_failing_load(&mut self, name: &str) -> Result<()> {
        let path = self.workspace.file_path(name);
        match self.explorer.load_file(&path, None, &CancelToken::new()) {
            Ok(_) => Err(anyhow!("Expected load of {} to fail", name)),
            Err(e) => {
                self.last_error = Some(e);
                Ok(())
            }
        }
    }

    fn handle_mark(&mut self, view: View, path: &[String]) -> Result<()> {
        let node = find_node(&self.explorer, view, path)?;
        let records = self.explorer.records_under(node.id)?;
        self.markers.mark_records(records);
        Ok(())
    }

    // ===== Assertions =====

    fn handle_assertion(&self, assertion: &Assertion) -> Result<()> {
        let explorer = &self.explorer;
        match assertion {
            Assertion::Status(expected) => assert_status(explorer, expected),
            Assertion::RecordCount(n) => {
                let actual = explorer.store().len();
                if actual != *n {
                    return Err(anyhow!("Expected {} records, got {}", n, actual));
                }
                Ok(())
            }
            Assertion::LastLoadFailed => match &self.last_error {
                Some(_) => Ok(()),
                None => Err(anyhow!("Nothing has failed")),
            },
            Assertion::LastErrorContains(text) => {
                let error = self
                    .last_error
                    .as_ref()
                    .ok_or_else(|| anyhow!("Nothing has failed"))?;
                if !error.to_string().contains(text.as_str()) {
                    return Err(anyhow!("Error {:?} does not contain {:?}", error.to_string(), text));
                }
                Ok(())
            }
            Assertion::ChildNames { view, path, names } => {
                let node = find_node(explorer, *view, path)?;
                let actual: Vec<String> = explorer
                    .children(node.kind, Some(node.id))
                    .ok_or_else(|| anyhow!("Node {} has no children list", node.id))?
                    .into_iter()
                    .map(|c| c.name)
                    .collect();
                if &actual != names {
                    return Err(anyhow!(
                        "Children of {:?} mismatch: expected {:?}, got {:?}",
                        path,
                        names,
                        actual
                    ));
                }
                Ok(())
            }
            Assertion::NodeKindIs { view, path, kind } => {
                let node = find_node(explorer, *view, path)?;
                if node.kind != *kind {
                    return Err(anyhow!(
                        "Node {:?} is {:?}, expected {:?}",
                        path,
                        node.kind,
                        kind
                    ));
                }
                Ok(())
            }
            Assertion::Rendered { view, expected } => {
                let actual = explorer
                    .tree()
                    .render(view.root_id(), 2, false)
                    .ok_or_else(|| anyhow!("View {:?} missing", view))?;
                if &actual != expected {
                    return Err(anyhow!(
                        "Rendered {:?} view mismatch:\n--- expected\n{}--- actual\n{}",
                        view,
                        expected,
                        actual
                    ));
                }
                Ok(())
            }
            Assertion::Stats(expected) => {
                let actual = explorer.tree().stats();
                if &actual != expected {
                    return Err(anyhow!("Stats mismatch: expected {:?}, got {:?}", expected, actual));
                }
                Ok(())
            }
            Assertion::TreeConsistent => {
                let problems = explorer.tree().check_invariants();
                if !problems.is_empty() {
                    return Err(anyhow!("Tree problems: {:?}", problems));
                }
                Ok(())
            }
            Assertion::PruneIdempotent => assert_prune_idempotent(explorer),
            Assertion::LeavesResolve => assert_leaves_resolve(explorer),
            Assertion::IdsUnique => assert_ids_unique(explorer),
            Assertion::NavigatesTo {
                view,
                path,
                filename,
                line,
                column,
            } => {
                let node = find_node(explorer, *view, path)?;
                let target = explorer.navigation_target(node.id)?;
                if &target.filename != filename || target.line != *line || target.column != *column {
                    return Err(anyhow!(
                        "Navigation mismatch: expected {}:{}:{}, got {}:{}:{}",
                        filename,
                        line,
                        column,
                        target.filename,
                        target.line,
                        target.column
                    ));
                }
                Ok(())
            }
            Assertion::MarkerCount(n) => {
                if self.markers.len() != *n {
                    return Err(anyhow!("Expected {} markers, got {}", n, self.markers.len()));
                }
                Ok(())
            }
            Assertion::Marked { filename, row } => {
                if !self.markers.is_marked(filename, *row) {
                    return Err(anyhow!("{}:{} is not marked", filename, row));
                }
                Ok(())
            }
            Assertion::Custom(f) => f(explorer),
        }
    }
}

/// Walks from a view root along child names.
pub fn find_node(explorer: &Explorer, view: View, path: &[String]) -> Result<NodeView> {
    let mut node = explorer
        .tree()
        .get_tree_node(view.root_id())
        .ok_or_else(|| anyhow!("View {:?} missing", view))?;
    for name in path {
        node = explorer
            .children(node.kind, Some(node.id))
            .ok_or_else(|| anyhow!("Node {} has no children list", node.id))?
            .into_iter()
            .find(|c| &c.name == name)
            .ok_or_else(|| anyhow!("No child {:?} under {:?}", name, node.name))?;
    }
    Ok(node)
}

fn assert_status(explorer: &Explorer, expected: &StatusMatch) -> Result<()> {
    let actual = explorer.status();
    let matches = matches!(
        (expected, actual),
        (StatusMatch::Empty, LoadStatus::Empty)
            | (StatusMatch::Ready, LoadStatus::Ready)
            | (StatusMatch::Incomplete, LoadStatus::Incomplete)
    );
    if !matches {
        return Err(anyhow!(
            "Status mismatch: expected {:?}, got {:?}",
            expected,
            actual
        ));
    }
    Ok(())
}

fn assert_prune_idempotent(explorer: &Explorer) -> Result<()> {
    let tree = explorer.tree();
    let before = tree.render(View::File.root_id(), 2, true);
    let records_before = tree.descendant_records(View::File.root_id());

    let mut again = tree.clone();
    let merged = again.prune_file();
    if merged != 0 {
        return Err(anyhow!("Second compaction merged {} directories", merged));
    }
    if again.render(View::File.root_id(), 2, true) != before {
        return Err(anyhow!("Second compaction changed the file view"));
    }
    if again.descendant_records(View::File.root_id()) != records_before {
        return Err(anyhow!("Second compaction changed the leaves of the file view"));
    }
    Ok(())
}

fn assert_leaves_resolve(explorer: &Explorer) -> Result<()> {
    let all = explorer
        .tree()
        .descendants(NodeId::ROOT)
        .ok_or_else(|| anyhow!("Root missing"))?;
    for leaf in all.iter().filter(|n| n.kind == NodeKind::Data) {
        let record = explorer.resolve(leaf.id)?;
        if Some(record.id) != leaf.record {
            return Err(anyhow!("Leaf {} resolved to record {}", leaf.id, record.id));
        }
    }
    Ok(())
}

fn assert_ids_unique(explorer: &Explorer) -> Result<()> {
    let all = explorer
        .tree()
        .descendants(NodeId::ROOT)
        .ok_or_else(|| anyhow!("Root missing"))?;
    let mut seen = HashSet::new();
    for node in &all {
        if !seen.insert(node.id) {
            return Err(anyhow!("Node id {} appears twice", node.id));
        }
    }
    let mut records = HashSet::new();
    for record in explorer.store().iter() {
        if record.id.0 < FIRST_RECORD_ID {
            return Err(anyhow!("Record id {} below the first record id", record.id));
        }
        if !records.insert(record.id) {
            return Err(anyhow!("Record id {} appears twice", record.id));
        }
    }
    Ok(())
}
