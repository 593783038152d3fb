use crate::harness::{Scenario, View};
use errlist_core::{NodeId, NodeKind};
use std::collections::HashSet;

fn mixed(scenario: Scenario) -> Scenario {
    scenario
        .with_tagged_record("/a/b/c/one.c", "alpha", 3, &["t1"])
        .with_tagged_record("/a/b/c/one.c", "beta", 1, &["t1", "t2"])
        .with_record("/a/b/d/two.c", "alpha", 8)
        .with_record("/a/e.c", "gamma", 2)
        .with_record(r"D:\w\three.c", "beta", 5)
        .with_record("", "gamma", 1)
}

#[test]
fn test_mixed_document_is_well_formed() {
    mixed(Scenario::new("mixed_well_formed"))
        .load()
        .assert_well_formed()
        .run()
        .expect("scenario should pass");
}

#[test]
fn test_every_record_reachable_from_file_view() {
    mixed(Scenario::new("file_view_complete"))
        .load()
        .assert_with(|explorer| {
            let under_file: HashSet<_> = explorer
                .tree()
                .descendant_records(NodeId::FILE)
                .ok_or_else(|| anyhow::anyhow!("file view missing"))?
                .into_iter()
                .collect();
            let with_path: HashSet<_> = explorer
                .store()
                .iter()
                .filter(|r| !r.filename.is_empty())
                .map(|r| r.id)
                .collect();
            anyhow::ensure!(under_file == with_path, "file view lost records");
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_shared_prefix_shares_directory() {
    mixed(Scenario::new("shared_prefix"))
        .load()
        .assert_children(View::File, &[], &["/a", "D:/w"])
        .assert_children(View::File, &["/a"], &["b", "e.c"])
        .assert_children(View::File, &["/a", "b"], &["c", "d"])
        .assert_with(|explorer| {
            let tree = explorer.tree();
            let files: Vec<_> = tree
                .descendants(NodeId::FILE)
                .ok_or_else(|| anyhow::anyhow!("file view missing"))?
                .into_iter()
                .filter(|n| n.kind == NodeKind::Node && (n.name == "one.c" || n.name == "two.c"))
                .collect();
            anyhow::ensure!(files.len() == 2, "expected one.c and two.c");
            let mut grandparents = HashSet::new();
            for file in &files {
                let dir = tree
                    .parent(file.id)
                    .ok_or_else(|| anyhow::anyhow!("{} has no parent", file.name))?;
                let up = tree
                    .parent(dir.id)
                    .ok_or_else(|| anyhow::anyhow!("{} has no parent", dir.name))?;
                grandparents.insert(up.id);
            }
            anyhow::ensure!(grandparents.len() == 1, "paths under /a/b split: {:?}", grandparents);
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_subject_leaves_live_under_one_group() {
    mixed(Scenario::new("subject_partition"))
        .load()
        .assert_children(View::Subject, &[], &["alpha", "beta", "gamma"])
        .assert_with(|explorer| {
            for group in explorer
                .children(NodeKind::SubjectGroupRoot, Some(NodeId::SUBJECT))
                .ok_or_else(|| anyhow::anyhow!("subject view missing"))?
            {
                for record in explorer.records_under(group.id)? {
                    anyhow::ensure!(
                        record.subject == group.name,
                        "{} filed under {}",
                        record.subject,
                        group.name
                    );
                }
            }
            Ok(())
        })
        .run()
        .unwrap();
}

#[test]
fn test_root_lists_three_views() {
    Scenario::new("root_views")
        .assert_with(|explorer| {
            let views: Vec<_> = explorer
                .children(NodeKind::Root, None)
                .ok_or_else(|| anyhow::anyhow!("root missing"))?
                .into_iter()
                .map(|v| (v.id, v.kind))
                .collect();
            anyhow::ensure!(
                views
                    == vec![
                        (NodeId::SUBJECT, NodeKind::SubjectGroupRoot),
                        (NodeId::FILE, NodeKind::FileGroupRoot),
                        (NodeId::TAG, NodeKind::TagGroupRoot),
                    ],
                "views were {:?}",
                views
            );
            anyhow::ensure!(
                explorer.children(NodeKind::Directory, Some(NodeId::FILE)).is_none(),
                "kind mismatch must not answer"
            );
            Ok(())
        })
        .run()
        .unwrap();
}
