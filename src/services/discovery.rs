//! Package discovery.
//!
//! Walks the workspace for directories whose manifest declares a lint
//! script, skipping vendor and build-output directories, and serves repeat
//! runs from a time-limited cache.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::adapters::storage::PackageCache;
use crate::domain::models::{Package, WorkspaceConfig};

/// The subset of a package manifest discovery cares about.
#[derive(Debug, Deserialize)]
struct Manifest {
    name: Option<String>,
    #[serde(default)]
    private: bool,
    #[serde(default)]
    scripts: HashMap<String, serde_json::Value>,
}

impl Manifest {
    fn has_script(&self, script: &str) -> bool {
        self.scripts
            .get(script)
            .and_then(serde_json::Value::as_str)
            .is_some_and(|cmd| !cmd.trim().is_empty())
    }
}

/// Result of a discovery pass.
#[derive(Debug, Clone)]
pub struct DiscoveryOutcome {
    /// Discovered packages, in walk order
    pub packages: Vec<Package>,
    /// Whether the packages came from the cache
    pub from_cache: bool,
}

/// Finds lint-capable packages under a workspace root.
pub struct PackageDiscovery {
    root: PathBuf,
    config: WorkspaceConfig,
    cache: PackageCache,
}

impl PackageDiscovery {
    /// Create a discovery service for `root`.
    pub fn new(root: impl Into<PathBuf>, config: WorkspaceConfig, cache: PackageCache) -> Self {
        Self {
            root: root.into(),
            config,
            cache,
        }
    }

    /// Discover packages, preferring a fresh cache when `use_cache` is set.
    ///
    /// A fresh scan always rewrites the cache; write failures are logged and
    /// never fail discovery.
    pub fn discover(&self, use_cache: bool) -> DiscoveryOutcome {
        if use_cache {
            if let Some(packages) = self.cache.load() {
                return DiscoveryOutcome {
                    packages,
                    from_cache: true,
                };
            }
        }

        let packages = self.scan();
        if let Err(e) = self.cache.save(&packages) {
            tracing::warn!(
                path = %self.cache.path().display(),
                error = %e,
                "Failed to write package cache"
            );
        }

        DiscoveryOutcome {
            packages,
            from_cache: false,
        }
    }

    /// Walk the workspace without consulting the cache.
    pub fn scan(&self) -> Vec<Package> {
        let skip: HashSet<&str> = self
            .config
            .skip_dirs
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.config.state_dir.as_str()))
            .collect();

        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_skipped(e, &skip));

        let mut packages = Vec::new();
        let mut seen = HashSet::new();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            let Some(package) = self.inspect(entry.path()) else {
                continue;
            };

            if !seen.insert(package.name.clone()) {
                tracing::warn!(
                    package = %package.name,
                    path = %package.path.display(),
                    "Duplicate package name; keeping the first occurrence"
                );
                continue;
            }

            tracing::debug!(
                package = %package.name,
                size_bytes = package.size_bytes,
                has_type_checking = package.has_type_checking,
                has_tests = package.has_tests,
                "Discovered package"
            );
            packages.push(package);
        }

        tracing::info!(
            root = %self.root.display(),
            packages = packages.len(),
            "Package discovery complete"
        );
        packages
    }

    /// Build a [`Package`] for `dir` if its manifest declares a lint script.
    fn inspect(&self, dir: &Path) -> Option<Package> {
        let manifest_path = dir.join(&self.config.manifest);
        let metadata = fs::metadata(&manifest_path).ok()?;
        if !metadata.is_file() {
            return None;
        }

        let manifest: Manifest = match fs::read_to_string(&manifest_path)
            .map_err(|e| e.to_string())
            .and_then(|raw| serde_json::from_str(&raw).map_err(|e| e.to_string()))
        {
            Ok(manifest) => manifest,
            Err(e) => {
                tracing::warn!(
                    manifest = %manifest_path.display(),
                    error = %e,
                    "Skipping package with unparseable manifest"
                );
                return None;
            }
        };

        if !manifest.has_script(&self.config.lint_script) {
            return None;
        }

        let name = manifest
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.relative_name(dir));

        let last_modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Some(Package {
            name,
            path: dir.to_path_buf(),
            last_modified,
            has_type_checking: self
                .config
                .type_config_files
                .iter()
                .any(|f| dir.join(f).is_file()),
            has_tests: manifest.has_script(&self.config.test_script),
            is_private: manifest.private,
            size_bytes: immediate_size(dir),
        })
    }

    fn relative_name(&self, dir: &Path) -> String {
        dir.strip_prefix(&self.root)
            .unwrap_or(dir)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

fn is_skipped(entry: &DirEntry, skip: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| skip.contains(name))
}

/// Sum of the sizes of the regular files directly inside `dir`.
fn immediate_size(dir: &Path) -> u64 {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|e| e.metadata().ok())
        .filter(fs::Metadata::is_file)
        .map(|m| m.len())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn discovery(root: &Path) -> PackageDiscovery {
        let config = WorkspaceConfig::default();
        let cache = PackageCache::in_state_dir(
            &root.join(&config.state_dir),
            Duration::from_secs(config.cache_ttl_secs),
        );
        PackageDiscovery::new(root, config, cache)
    }

    #[test]
    fn test_finds_only_lint_capable_packages() {
        let root = TempDir::new().unwrap();
        write(
            root.path(),
            "packages/core/package.json",
            r#"{"name":"@acme/core","private":true,"scripts":{"lint":"eslint .","test":"vitest"}}"#,
        );
        write(root.path(), "packages/core/tsconfig.json", "{}");
        write(
            root.path(),
            "packages/docs/package.json",
            r#"{"name":"docs","scripts":{"build":"x"}}"#,
        );

        let packages = discovery(root.path()).scan();
        assert_eq!(packages.len(), 1);
        let core = &packages[0];
        assert_eq!(core.name, "@acme/core");
        assert!(core.has_type_checking);
        assert!(core.has_tests);
        assert!(core.is_private);
    }

    #[test]
    fn test_skips_vendor_directories() {
        let root = TempDir::new().unwrap();
        write(
            root.path(),
            "node_modules/dep/package.json",
            r#"{"name":"dep","scripts":{"lint":"eslint"}}"#,
        );
        write(
            root.path(),
            "apps/web/dist/package.json",
            r#"{"name":"web-dist","scripts":{"lint":"eslint"}}"#,
        );
        write(
            root.path(),
            "apps/web/package.json",
            r#"{"name":"web","scripts":{"lint":"eslint"}}"#,
        );

        let names: Vec<_> = discovery(root.path())
            .scan()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["web"]);
    }

    #[test]
    fn test_size_counts_immediate_files_only() {
        let root = TempDir::new().unwrap();
        let manifest = r#"{"name":"a","scripts":{"lint":"eslint"}}"#;
        write(root.path(), "a/package.json", manifest);
        write(root.path(), "a/index.js", &"x".repeat(100));
        write(root.path(), "a/src/deep.js", &"x".repeat(10_000));

        let packages = discovery(root.path()).scan();
        assert_eq!(packages[0].size_bytes, 100 + manifest.len() as u64);
    }

    #[test]
    fn test_unparseable_manifest_is_skipped() {
        let root = TempDir::new().unwrap();
        write(root.path(), "broken/package.json", "{ nope");
        write(
            root.path(),
            "ok/package.json",
            r#"{"name":"ok","scripts":{"lint":"eslint"}}"#,
        );

        let names: Vec<_> = discovery(root.path())
            .scan()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["ok"]);
    }

    #[test]
    fn test_name_falls_back_to_relative_path() {
        let root = TempDir::new().unwrap();
        write(
            root.path(),
            "tools/cli/package.json",
            r#"{"scripts":{"lint":"eslint"}}"#,
        );

        let packages = discovery(root.path()).scan();
        assert_eq!(packages[0].name, "tools/cli");
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let root = TempDir::new().unwrap();
        let manifest = r#"{"name":"dup","scripts":{"lint":"eslint"}}"#;
        write(root.path(), "a/package.json", manifest);
        write(root.path(), "b/package.json", manifest);

        let packages = discovery(root.path()).scan();
        assert_eq!(packages.len(), 1);
        assert!(packages[0].path.ends_with("a"));
    }

    #[test]
    fn test_second_discovery_uses_cache() {
        let root = TempDir::new().unwrap();
        write(
            root.path(),
            "a/package.json",
            r#"{"name":"a","scripts":{"lint":"eslint"}}"#,
        );
        let discovery = discovery(root.path());

        let first = discovery.discover(true);
        assert!(!first.from_cache);

        // New package added after caching is not seen until the cache expires.
        write(
            root.path(),
            "b/package.json",
            r#"{"name":"b","scripts":{"lint":"eslint"}}"#,
        );
        let second = discovery.discover(true);
        assert!(second.from_cache);
        assert_eq!(second.packages, first.packages);

        let fresh = discovery.discover(false);
        assert!(!fresh.from_cache);
        assert_eq!(fresh.packages.len(), 2);
    }
}
