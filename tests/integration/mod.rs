//! Integration tests for full mirror scenarios
//!
//! Exercises the replacer, verifier and engine together against real
//! temporary directory trees.

use ::treemirror::*;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Source/destination pair with an engine wired to a recording reporter
pub struct MirrorHarness {
    pub source: TempDir,
    pub destination: TempDir,
    pub reporter: Arc<MemoryReporter>,
    pub engine: SyncEngine,
}

impl MirrorHarness {
    /// Create a harness whose source holds `a.txt` ("hello") and `sub/b.txt` ("world")
    pub fn new() -> Self {
        let source = TempDir::new().unwrap();
        let destination = TempDir::new().unwrap();
        fs::create_dir_all(source.path().join("sub")).unwrap();
        fs::write(source.path().join("a.txt"), "hello").unwrap();
        fs::write(source.path().join("sub/b.txt"), "world").unwrap();

        let config = Arc::new(SyncConfig::new(source.path(), destination.path(), 1).unwrap());
        let reporter = Arc::new(MemoryReporter::new());
        let engine = SyncEngine::new(config, reporter.clone());

        Self {
            source,
            destination,
            reporter,
            engine,
        }
    }

    pub fn src(&self) -> &Path {
        self.source.path()
    }

    pub fn dst(&self) -> &Path {
        self.destination.path()
    }

    pub fn replace(&self) -> ReplaceStats {
        Replacer::new(self.reporter.clone())
            .replace(self.src(), self.dst())
            .unwrap()
    }

    pub fn verify(&self) -> VerificationResult {
        Verifier::new(self.reporter.clone())
            .verify(self.src(), self.dst())
            .unwrap()
    }

    /// Add `count` files spread over a few nested directories
    pub fn populate(&self, count: usize) {
        for i in 0..count {
            let dir = self.src().join(format!("level_{}/inner_{}", i % 4, i % 3));
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join(format!("file_{}.dat", i)), format!("payload {}", i).repeat(i + 1))
                .unwrap();
        }
    }
}

#[test]
fn test_replace_then_verify_scenario() {
    let harness = MirrorHarness::new();
    harness.replace();

    assert_eq!(fs::read(harness.dst().join("a.txt")).unwrap(), b"hello");
    assert_eq!(fs::read(harness.dst().join("sub/b.txt")).unwrap(), b"world");

    let result = harness.verify();
    assert!(result.overall_success);
    assert!(result.failures.is_empty());
}

#[test]
fn test_changed_destination_file_scenario() {
    let harness = MirrorHarness::new();
    harness.replace();
    fs::write(harness.dst().join("a.txt"), "HELLO").unwrap();

    let result = harness.verify();
    assert!(!result.overall_success);
    assert_eq!(result.failures.len(), 1);
    assert!(matches!(
        &result.failures[0],
        FailureEntry::DigestMismatch { relative_path, .. } if relative_path == "a.txt"
    ));
}

#[test]
fn test_deleted_destination_file_scenario() {
    let harness = MirrorHarness::new();
    harness.replace();
    fs::remove_file(harness.dst().join("sub/b.txt")).unwrap();

    let result = harness.verify();
    assert_eq!(
        result.failures,
        vec![FailureEntry::MissingFile {
            relative_path: "sub/b.txt".to_string()
        }]
    );
}

#[test]
fn test_idempotent_replace_and_verify() {
    let harness = MirrorHarness::new();
    harness.populate(25);

    for _ in 0..2 {
        harness.replace();
        assert!(harness.verify().overall_success);
    }
}

#[test]
fn test_completeness_of_failure_report() {
    let harness = MirrorHarness::new();
    harness.populate(30);
    harness.replace();

    let files: Vec<FileRecord> = TreeWalker::new(harness.dst())
        .walk()
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    assert_eq!(files.len(), 32);

    // Delete every 5th file and corrupt every 7th (skipping the deleted ones)
    let mut deleted = 0;
    let mut corrupted = 0;
    for (i, record) in files.iter().enumerate() {
        if i % 5 == 0 {
            fs::remove_file(&record.absolute_path).unwrap();
            deleted += 1;
        } else if i % 7 == 0 {
            fs::write(&record.absolute_path, b"corrupted").unwrap();
            corrupted += 1;
        }
    }

    let result = harness.verify();
    assert_eq!(result.files_checked, 32);
    assert_eq!(result.failures.len(), deleted + corrupted);
    assert_eq!(result.missing_count(), deleted);
    assert_eq!(result.mismatch_count(), corrupted);
}

#[test]
fn test_cycle_events_in_order() {
    let harness = MirrorHarness::new();
    harness.engine.run_cycle(1);

    let events = harness.reporter.events();
    let position = |pred: &dyn Fn(&SyncEvent) -> bool| events.iter().position(|e| pred(e)).unwrap();

    let started = position(&|e| matches!(e, SyncEvent::CycleStarted { .. }));
    let cleanup = position(&|e| matches!(e, SyncEvent::CleanupFinished { .. }));
    let copy = position(&|e| matches!(e, SyncEvent::CopyStarted { .. }));
    let verify = position(&|e| matches!(e, SyncEvent::VerificationStarted));
    let done = position(&|e| matches!(e, SyncEvent::CycleSucceeded { .. }));

    assert!(started < cleanup && cleanup < copy && copy < verify && verify < done);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, SyncEvent::FileVerified { .. }))
            .count(),
        2
    );
}

#[test]
fn test_destination_changes_between_cycles_are_lost() {
    let harness = MirrorHarness::new();
    assert!(harness.engine.run_cycle(1).is_success());

    fs::write(harness.dst().join("a.txt"), "edited in mirror").unwrap();
    fs::write(harness.dst().join("extra.txt"), "added in mirror").unwrap();

    assert!(harness.engine.run_cycle(2).is_success());
    assert_eq!(fs::read_to_string(harness.dst().join("a.txt")).unwrap(), "hello");
    assert!(!harness.dst().join("extra.txt").exists());
}

#[test]
fn test_source_changes_are_picked_up() {
    let harness = MirrorHarness::new();
    assert!(harness.engine.run_cycle(1).is_success());

    fs::write(harness.src().join("a.txt"), "hello again").unwrap();
    fs::remove_file(harness.src().join("sub/b.txt")).unwrap();
    fs::write(harness.src().join("c.txt"), "new").unwrap();

    let outcome = harness.engine.run_cycle(2);
    assert!(outcome.is_success());
    assert_eq!(outcome.verification.unwrap().files_checked, 2);
    assert_eq!(fs::read_to_string(harness.dst().join("a.txt")).unwrap(), "hello again");
    assert!(!harness.dst().join("sub/b.txt").exists());
}

#[test]
fn test_vanished_source_fails_cycle_then_recovers() {
    let harness = MirrorHarness::new();
    let parking = TempDir::new().unwrap();
    let parked = parking.path().join("parked");
    fs::rename(harness.src(), &parked).unwrap();

    let outcome = harness.engine.run_cycle(1);
    assert!(!outcome.is_success());
    assert!(outcome.replace_error.unwrap().contains("does not exist"));

    fs::rename(&parked, harness.src()).unwrap();
    assert!(harness.engine.run_cycle(2).is_success());
}
