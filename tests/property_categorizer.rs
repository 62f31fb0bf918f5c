use chrono::Utc;
use proptest::prelude::*;
use qualigate::domain::models::{CategorizerConfig, Package, Tier};
use qualigate::services::Categorizer;
use std::collections::HashSet;
use std::path::PathBuf;

fn arb_package() -> impl Strategy<Value = Package> {
    (
        prop::sample::select(vec!["core", "api", "ui", "shared", "utils", "site", "docs", "x"]),
        0u64..3_000_000,
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(stem, size_bytes, has_type_checking, has_tests)| Package {
            name: stem.to_string(),
            path: PathBuf::from(stem),
            last_modified: Utc::now(),
            has_type_checking,
            has_tests,
            is_private: false,
            size_bytes,
        })
}

fn arb_packages() -> impl Strategy<Value = Vec<Package>> {
    prop::collection::vec(arb_package(), 0..40).prop_map(|packages| {
        // Names must be unique within a workspace.
        packages
            .into_iter()
            .enumerate()
            .map(|(i, mut p)| {
                p.name = format!("{}-{i}", p.name);
                p
            })
            .collect()
    })
}

proptest! {
    /// Property: weight stays within 0..=6 and tier follows the thresholds.
    #[test]
    fn prop_tier_respects_thresholds(package in arb_package()) {
        let config = CategorizerConfig::default();
        let categorizer = Categorizer::new(&config).unwrap();
        let categorized = categorizer.categorize_one(package);

        prop_assert!(categorized.weight <= 6);
        let expected = if categorized.weight >= config.heavy_min_weight {
            Tier::Heavy
        } else if categorized.weight >= config.medium_min_weight {
            Tier::Medium
        } else {
            Tier::Light
        };
        prop_assert_eq!(categorized.tier, expected);
    }

    /// Property: every package lands in exactly one tier.
    #[test]
    fn prop_partition_is_complete(packages in arb_packages()) {
        let categorizer = Categorizer::new(&CategorizerConfig::default()).unwrap();
        let input: HashSet<String> = packages.iter().map(|p| p.name.clone()).collect();
        let count = packages.len();

        let tiers = categorizer.categorize(packages);
        prop_assert_eq!(tiers.len(), count);

        let output: HashSet<String> = tiers.iter().map(|p| p.package.name.clone()).collect();
        prop_assert_eq!(output, input);

        for tier in Tier::ALL {
            prop_assert!(tiers.tier(tier).iter().all(|p| p.tier == tier));
        }
    }

    /// Property: each tier is ordered largest first.
    #[test]
    fn prop_tiers_sorted_by_size(packages in arb_packages()) {
        let categorizer = Categorizer::new(&CategorizerConfig::default()).unwrap();
        let tiers = categorizer.categorize(packages);

        for tier in Tier::ALL {
            let sizes: Vec<u64> = tiers.tier(tier).iter().map(|p| p.package.size_bytes).collect();
            prop_assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        }
    }

    /// Property: growing a package never lowers its tier.
    #[test]
    fn prop_size_is_monotonic(package in arb_package(), extra in 0u64..2_000_000) {
        let categorizer = Categorizer::new(&CategorizerConfig::default()).unwrap();
        let mut bigger = package.clone();
        bigger.size_bytes += extra;

        let small = categorizer.categorize_one(package);
        let large = categorizer.categorize_one(bigger);
        prop_assert!(large.weight >= small.weight);
        // Tier order is Heavy < Medium < Light.
        prop_assert!(large.tier <= small.tier);
    }
}
