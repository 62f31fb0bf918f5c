//! Time-limited package discovery cache.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Package;

/// File-backed cache of the last discovery result.
///
/// Validity is derived from the cache file's own modification time.
#[derive(Debug, Clone)]
pub struct PackageCache {
    path: PathBuf,
    ttl: Duration,
}

impl PackageCache {
    /// Cache file name inside the state directory.
    pub const FILE_NAME: &'static str = "package-cache.json";

    /// Cache stored at `path` with the given time-to-live.
    pub const fn new(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl }
    }

    /// Cache stored in `state_dir`.
    pub fn in_state_dir(state_dir: &Path, ttl: Duration) -> Self {
        Self::new(state_dir.join(Self::FILE_NAME), ttl)
    }

    /// Location of the cache artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Age of the cache artifact, if it exists.
    pub fn age(&self) -> Option<Duration> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok()?;
        Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO),
        )
    }

    /// Cached packages when the artifact is fresh and readable.
    ///
    /// Stale, missing or corrupt caches yield `None`.
    pub fn load(&self) -> Option<Vec<Package>> {
        let age = self.age()?;
        if age >= self.ttl {
            tracing::debug!(
                age_secs = age.as_secs(),
                ttl_secs = self.ttl.as_secs(),
                "Package cache expired"
            );
            return None;
        }

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Package cache unreadable");
                return None;
            }
        };

        match serde_json::from_str::<Vec<Package>>(&raw) {
            Ok(packages) => {
                tracing::info!(
                    packages = packages.len(),
                    age_secs = age.as_secs(),
                    "Using cached package discovery"
                );
                Some(packages)
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Package cache corrupt; rescanning");
                None
            }
        }
    }

    /// Persist packages, overwriting the previous cache.
    pub fn save(&self, packages: &[Package]) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DomainError::CacheWrite(format!("{}: {}", parent.display(), e))
            })?;
        }
        let json = serde_json::to_string_pretty(packages)?;
        fs::write(&self.path, json)
            .map_err(|e| DomainError::CacheWrite(format!("{}: {}", self.path.display(), e)))
    }

    /// Remove the cache artifact. Returns whether a file was removed.
    pub fn clear(&self) -> std::io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
