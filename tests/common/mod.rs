//! Common test utilities for integration tests
//!
//! Provides a temporary workspace builder and logging setup shared by the
//! integration test files.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Shape of a package written into a test workspace.
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageSpec {
    /// Add a `tsconfig.json`
    pub types: bool,
    /// Add a `test` script
    pub tests: bool,
    /// Extra bytes of source placed directly in the package directory
    pub padding: usize,
}

impl PackageSpec {
    /// Type-checked and tested: weight 2 from complexity alone.
    pub const fn complex() -> Self {
        Self {
            types: true,
            tests: true,
            padding: 0,
        }
    }

    /// No complexity signals.
    pub const fn plain() -> Self {
        Self {
            types: false,
            tests: false,
            padding: 0,
        }
    }
}

/// A throwaway multi-package workspace on disk.
pub struct TestWorkspace {
    dir: TempDir,
}

impl TestWorkspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    /// Workspace root.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Add a lint-capable package at `rel` named `name`.
    pub fn package(&self, rel: &str, name: &str, spec: PackageSpec) -> PathBuf {
        let dir = self.root().join(rel);
        fs::create_dir_all(&dir).expect("Failed to create package dir");

        let mut scripts = serde_json::json!({ "lint": "eslint ." });
        if spec.tests {
            scripts["test"] = serde_json::json!("vitest run");
        }
        let manifest = serde_json::json!({
            "name": name,
            "private": true,
            "scripts": scripts,
        });
        fs::write(
            dir.join("package.json"),
            serde_json::to_string_pretty(&manifest).expect("Failed to serialize manifest"),
        )
        .expect("Failed to write manifest");

        if spec.types {
            fs::write(dir.join("tsconfig.json"), "{}").expect("Failed to write tsconfig");
        }
        if spec.padding > 0 {
            fs::write(dir.join("bundle.txt"), "x".repeat(spec.padding))
                .expect("Failed to write padding");
        }
        dir
    }

    /// Write an arbitrary file relative to the root.
    pub fn file(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().expect("file has a parent"))
            .expect("Failed to create parent dir");
        fs::write(&path, contents).expect("Failed to write file");
        path
    }
}

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
