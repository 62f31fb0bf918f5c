//! Weighted tier categorization.

use regex::Regex;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{CategorizedPackage, CategorizerConfig, Package, Tier, TieredPackages};

/// Service for assigning packages to execution tiers
///
/// Weight formula: size_weight (0-2) + complexity_weight (0-2) + priority_weight (0-2)
#[derive(Debug, Clone)]
pub struct Categorizer {
    large_size_bytes: u64,
    medium_size_bytes: u64,
    heavy_min_weight: u32,
    medium_min_weight: u32,
    critical: Vec<Regex>,
    important: Vec<Regex>,
}

impl Categorizer {
    /// Create a categorizer from configuration, compiling the name patterns.
    pub fn new(config: &CategorizerConfig) -> DomainResult<Self> {
        Ok(Self {
            large_size_bytes: config.large_size_bytes,
            medium_size_bytes: config.medium_size_bytes,
            heavy_min_weight: config.heavy_min_weight,
            medium_min_weight: config.medium_min_weight,
            critical: compile(&config.critical_patterns)?,
            important: compile(&config.important_patterns)?,
        })
    }

    /// Size component: 2 above the large threshold, 1 above the medium one.
    pub const fn size_weight(&self, size_bytes: u64) -> u32 {
        if size_bytes > self.large_size_bytes {
            2
        } else if size_bytes > self.medium_size_bytes {
            1
        } else {
            0
        }
    }

    /// Complexity component: one point each for type checking and tests.
    pub fn complexity_weight(package: &Package) -> u32 {
        u32::from(package.has_type_checking) + u32::from(package.has_tests)
    }

    /// Priority component: 2 for critical names, 1 for important names.
    pub fn priority_weight(&self, name: &str) -> u32 {
        if self.critical.iter().any(|re| re.is_match(name)) {
            2
        } else if self.important.iter().any(|re| re.is_match(name)) {
            1
        } else {
            0
        }
    }

    /// Total weight of a package.
    pub fn weight(&self, package: &Package) -> u32 {
        self.size_weight(package.size_bytes)
            + Self::complexity_weight(package)
            + self.priority_weight(&package.name)
    }

    /// Tier for a given weight.
    pub const fn tier_for(&self, weight: u32) -> Tier {
        if weight >= self.heavy_min_weight {
            Tier::Heavy
        } else if weight >= self.medium_min_weight {
            Tier::Medium
        } else {
            Tier::Light
        }
    }

    /// Categorize one package.
    pub fn categorize_one(&self, package: Package) -> CategorizedPackage {
        let weight = self.weight(&package);
        CategorizedPackage {
            tier: self.tier_for(weight),
            weight,
            package,
        }
    }

    /// Bucket packages by tier.
    ///
    /// Packages are sorted by size (largest first) before bucketing, so each
    /// tier keeps that order; ties keep discovery order.
    pub fn categorize(&self, mut packages: Vec<Package>) -> TieredPackages {
        packages.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));

        let mut tiers = TieredPackages::default();
        for package in packages {
            let categorized = self.categorize_one(package);
            tracing::debug!(
                package = %categorized.package.name,
                weight = categorized.weight,
                tier = %categorized.tier,
                "Categorized package"
            );
            match categorized.tier {
                Tier::Heavy => tiers.heavy.push(categorized),
                Tier::Medium => tiers.medium.push(categorized),
                Tier::Light => tiers.light.push(categorized),
            }
        }

        tracing::info!(
            heavy = tiers.heavy.len(),
            medium = tiers.medium.len(),
            light = tiers.light.len(),
            "Packages categorized"
        );
        tiers
    }
}

fn compile(patterns: &[String]) -> DomainResult<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            Regex::new(p).map_err(|e| DomainError::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}
