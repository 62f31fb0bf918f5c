//! Source file enumeration for the text heuristics.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Selects the source files scanned by text-based gate checks.
#[derive(Debug, Clone)]
pub struct SourceFiles {
    skip_dirs: HashSet<String>,
    extensions: HashSet<String>,
}

impl SourceFiles {
    /// Walk files with one of `extensions`, pruning any directory in `skip_dirs`.
    pub fn new(skip_dirs: &[String], extensions: &[String]) -> Self {
        Self {
            skip_dirs: skip_dirs.iter().cloned().collect(),
            extensions: extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
        }
    }

    /// Matching files under `root`, sorted by path.
    pub fn collect(&self, root: &Path) -> Vec<PathBuf> {
        WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || e.file_name()
                        .to_str()
                        .map_or(true, |name| !self.skip_dirs.contains(name))
            })
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::debug!(error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| self.extensions.contains(ext))
            })
            .map(walkdir::DirEntry::into_path)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_filters_by_extension_and_skip_dirs() {
        let root = TempDir::new().unwrap();
        for rel in [
            "src/a.ts",
            "src/b.md",
            "lib/c.js",
            "node_modules/dep/d.js",
            "dist/e.js",
        ] {
            let path = root.path().join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "x").unwrap();
        }

        let files = SourceFiles::new(
            &["node_modules".to_string(), "dist".to_string()],
            &["ts".to_string(), ".js".to_string()],
        )
        .collect(root.path());

        let rel: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(root.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(rel, vec![PathBuf::from("lib/c.js"), PathBuf::from("src/a.ts")]);
    }
}
