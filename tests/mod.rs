//! Main test module for treemirror
//!
//! This module includes all test suites:
//! - Integration tests for full mirror scenarios
//! - Property-based tests for invariants

pub mod integration;
pub mod property;

#[cfg(test)]
mod edge_cases {
    use ::treemirror::*;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn engine(src: &TempDir, dst: &TempDir) -> SyncEngine {
        let config = Arc::new(SyncConfig::new(src.path(), dst.path(), 1).unwrap());
        SyncEngine::new(config, Arc::new(MemoryReporter::new()))
    }

    #[test]
    fn test_empty_source() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::write(dst.path().join("leftover.txt"), "old").unwrap();

        let outcome = engine(&src, &dst).run_cycle(1);

        assert!(outcome.is_success());
        assert_eq!(outcome.verification.unwrap().files_checked, 0);
        assert!(dst.path().is_dir());
        assert!(!dst.path().join("leftover.txt").exists());
    }

    #[test]
    fn test_special_filenames() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();

        let special_names = vec![
            "file with spaces.txt",
            "file-with-dashes.txt",
            "file.with.dots.txt",
            "file@with#special$chars.txt",
            "file(with)parens.txt",
            "file[with]brackets.txt",
            "ünïcödé.txt",
        ];

        let mut written = 0;
        for name in &special_names {
            if fs::write(src.path().join(name), format!("Content of {}", name)).is_ok() {
                written += 1;
            }
        }

        let outcome = engine(&src, &dst).run_cycle(1);
        assert!(outcome.is_success());
        assert_eq!(outcome.verification.unwrap().files_checked, written);
    }

    #[test]
    fn test_empty_files_and_empty_dirs() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("a/b/c")).unwrap();
        fs::write(src.path().join("a/empty.txt"), "").unwrap();

        let outcome = engine(&src, &dst).run_cycle(1);

        assert!(outcome.is_success());
        assert!(dst.path().join("a/b/c").is_dir());
        assert_eq!(fs::read(dst.path().join("a/empty.txt")).unwrap(), b"");
    }

    #[test]
    fn test_binary_content() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        let bytes: Vec<u8> = (0..=255u8).cycle().take(10_000).collect();
        fs::write(src.path().join("blob.bin"), &bytes).unwrap();

        assert!(engine(&src, &dst).run_cycle(1).is_success());
        assert_eq!(fs::read(dst.path().join("blob.bin")).unwrap(), bytes);
    }
}
