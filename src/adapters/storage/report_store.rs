//! Persisted run report.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::RunReport;

/// The only part of a stored report the next run depends on.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Baseline {
    quality_score: f64,
}

/// Well-known location of the last [`RunReport`].
#[derive(Debug, Clone)]
pub struct ReportStore {
    path: PathBuf,
}

impl ReportStore {
    /// Report file name inside the state directory.
    pub const FILE_NAME: &'static str = "lint-report.json";

    /// Store backed by `path`.
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store in `state_dir`.
    pub fn in_state_dir(state_dir: &Path) -> Self {
        Self::new(state_dir.join(Self::FILE_NAME))
    }

    /// Location of the report artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last persisted report, if present and readable.
    pub fn load(&self) -> Option<RunReport> {
        let raw = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Stored report unreadable");
                None
            }
        }
    }

    /// Quality score of the last persisted run, 0 when none is readable.
    ///
    /// Only `qualityScore` is read, so reports written with other fields
    /// still provide a baseline.
    pub fn load_baseline(&self) -> f64 {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return 0.0;
        };
        match serde_json::from_str::<Baseline>(&raw) {
            Ok(baseline) => baseline.quality_score,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "No baseline in stored report");
                0.0
            }
        }
    }

    /// Overwrite the stored report.
    pub fn save(&self, report: &RunReport) -> DomainResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DomainError::ReportPersistence(format!("{}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_string_pretty(report)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .and_then(|()| fs::rename(&tmp, &self.path))
            .map_err(|e| DomainError::ReportPersistence(format!("{}: {}", self.path.display(), e)))
    }
}
