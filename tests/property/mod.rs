//! Property-based testing for treemirror
//!
//! Uses proptest to verify mirror and digest invariants across randomly
//! generated trees and tampering patterns.

use ::treemirror::*;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// What to do to a destination file before verifying
#[derive(Debug, Clone, Copy)]
pub enum Tamper {
    Keep,
    Delete,
    Corrupt,
}

/// Generate random relative file paths
///
/// Directory components never contain a dot and file names always do, so a
/// generated file can never collide with a generated directory.
fn path_strategy() -> impl Strategy<Value = PathBuf> {
    let dir_strategy = prop::collection::vec("[a-z]{1,6}", 0..=3);
    let filename_strategy = "[a-z0-9]{1,8}\\.(txt|bin|md)";

    (dir_strategy, filename_strategy).prop_map(|(dirs, filename)| {
        let mut path = PathBuf::new();
        for dir in dirs {
            path.push(dir);
        }
        path.join(filename)
    })
}

/// Generate random file content
fn content_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        "[a-zA-Z0-9 \n]{0,500}".prop_map(|s| s.into_bytes()),
        prop::collection::vec(any::<u8>(), 0..10000),
        (any::<u8>(), 1..9000usize).prop_map(|(byte, count)| vec![byte; count]),
    ]
}

fn tree_strategy() -> impl Strategy<Value = BTreeMap<PathBuf, Vec<u8>>> {
    prop::collection::btree_map(path_strategy(), content_strategy(), 1..25)
}

fn tamper_strategy() -> impl Strategy<Value = Tamper> {
    prop_oneof![Just(Tamper::Keep), Just(Tamper::Delete), Just(Tamper::Corrupt)]
}

fn write_tree(root: &Path, tree: &BTreeMap<PathBuf, Vec<u8>>) {
    for (path, content) in tree {
        let full_path = root.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
}

fn engine_for(src: &TempDir, dst: &TempDir) -> (SyncEngine, Arc<MemoryReporter>) {
    let config = Arc::new(SyncConfig::new(src.path(), dst.path(), 1).unwrap());
    let reporter = Arc::new(MemoryReporter::new());
    (SyncEngine::new(config, reporter.clone()), reporter)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(40))]

    /// A cycle always produces a byte-identical mirror
    #[test]
    fn cycle_produces_identical_tree(tree in tree_strategy()) {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        write_tree(src.path(), &tree);
        let (engine, reporter) = engine_for(&src, &dst);

        let outcome = engine.run_cycle(1);
        prop_assert!(outcome.is_success());
        prop_assert_eq!(reporter.error_count(), 0);

        for (path, content) in &tree {
            prop_assert_eq!(&fs::read(dst.path().join(path)).unwrap(), content);
        }
    }

    /// Tampering with M of N files yields exactly M classified failures
    #[test]
    fn failures_match_tampering(
        entries in prop::collection::btree_map(path_strategy(), (content_strategy(), tamper_strategy()), 1..25)
    ) {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let tree: BTreeMap<PathBuf, Vec<u8>> =
            entries.iter().map(|(p, (c, _))| (p.clone(), c.clone())).collect();
        write_tree(src.path(), &tree);

        let (engine, _) = engine_for(&src, &dst);
        prop_assert!(engine.run_cycle(1).is_success());

        let mut expected_missing = 0;
        let mut expected_mismatch = 0;
        for (path, (content, tamper)) in &entries {
            let target = dst.path().join(path);
            match tamper {
                Tamper::Keep => {}
                Tamper::Delete => {
                    fs::remove_file(&target).unwrap();
                    expected_missing += 1;
                }
                Tamper::Corrupt => {
                    let mut changed = content.clone();
                    changed.push(0xFF);
                    fs::write(&target, changed).unwrap();
                    expected_mismatch += 1;
                }
            }
        }

        let result = Verifier::new(Arc::new(MemoryReporter::new()))
            .verify(src.path(), dst.path())
            .unwrap();

        prop_assert_eq!(result.files_checked, entries.len());
        prop_assert_eq!(result.missing_count(), expected_missing);
        prop_assert_eq!(result.mismatch_count(), expected_mismatch);
        prop_assert_eq!(result.failures.len(), expected_missing + expected_mismatch);
        prop_assert_eq!(result.overall_success, expected_missing + expected_mismatch == 0);
    }

    /// Digests depend on content only, not on how the file is read
    #[test]
    fn digest_depends_on_content_only(a in content_strategy(), b in content_strategy()) {
        let dir = TempDir::new().unwrap();
        let path_a = dir.path().join("a");
        let path_b = dir.path().join("b");
        fs::write(&path_a, &a).unwrap();
        fs::write(&path_b, &b).unwrap();

        let digest_a = digest_file(&path_a).unwrap();
        let digest_b = digest_file(&path_b).unwrap();

        prop_assert_eq!(digest_a, hasher::digest_bytes(&a));
        prop_assert_eq!(a == b, digest_a == digest_b);
    }
}
