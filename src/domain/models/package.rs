//! Package domain model.
//!
//! A [`Package`] is one analyzable sub-project of the workspace as found by
//! discovery. Its tier placement lives in [`CategorizedPackage`] because the
//! weight is recomputed every run and never persisted with the cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A discovered package that declares a lint capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    /// Unique package name within a discovery run
    pub name: String,
    /// Package directory
    pub path: PathBuf,
    /// Modification time of the package manifest
    pub last_modified: DateTime<Utc>,
    /// A type-checking configuration file is present
    pub has_type_checking: bool,
    /// The manifest declares a test command
    pub has_tests: bool,
    /// The manifest marks the package private
    pub is_private: bool,
    /// Sum of the sizes of the immediate regular files in `path`
    pub size_bytes: u64,
}

/// Execution tier of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Run one at a time with a per-package timeout
    Heavy,
    /// Run as a batch with a moderate concurrency cap
    Medium,
    /// Run as a batch with a wide concurrency cap
    Light,
}

impl Tier {
    /// All tiers in execution order.
    pub const ALL: [Self; 3] = [Self::Heavy, Self::Medium, Self::Light];

    /// Lowercase name used in logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Heavy => "heavy",
            Self::Medium => "medium",
            Self::Light => "light",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package with its derived weight and tier for the current run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizedPackage {
    /// The discovered package
    #[serde(flatten)]
    pub package: Package,
    /// Additive weight from size, features and name priority
    pub weight: u32,
    /// Tier derived from `weight`
    pub tier: Tier,
}

/// Packages bucketed by tier, each bucket ordered by size descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TieredPackages {
    /// Heavy-tier packages, largest first
    pub heavy: Vec<CategorizedPackage>,
    /// Medium-tier packages, largest first
    pub medium: Vec<CategorizedPackage>,
    /// Light-tier packages, largest first
    pub light: Vec<CategorizedPackage>,
}

impl TieredPackages {
    /// Packages of one tier.
    pub fn tier(&self, tier: Tier) -> &[CategorizedPackage] {
        match tier {
            Tier::Heavy => &self.heavy,
            Tier::Medium => &self.medium,
            Tier::Light => &self.light,
        }
    }

    /// Total number of packages across all tiers.
    pub fn len(&self) -> usize {
        self.heavy.len() + self.medium.len() + self.light.len()
    }

    /// Whether no package was categorized.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate every package in tier order (heavy, medium, light).
    pub fn iter(&self) -> impl Iterator<Item = &CategorizedPackage> {
        self.heavy
            .iter()
            .chain(self.medium.iter())
            .chain(self.light.iter())
    }
}
