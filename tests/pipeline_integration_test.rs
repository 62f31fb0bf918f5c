//! End-to-end pipeline tests: discovery through gate, with scripted tools.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{PackageSpec, TestWorkspace};
use qualigate::domain::models::{AttributionMode, CheckStatus, Config, Tier};
use qualigate::domain::ports::{ToolError, ToolOutput};
use qualigate::services::{QualityOrchestrator, Trend};
use qualigate::MockToolRunner;

fn build_orchestrator(
    ws: &TestWorkspace,
    config: Config,
    runner: &Arc<MockToolRunner>,
) -> QualityOrchestrator {
    QualityOrchestrator::new(ws.root(), config, runner.clone())
}

#[tokio::test]
async fn test_heavy_timeout_does_not_stop_the_run() {
    common::setup_test_logging();
    let ws = TestWorkspace::new();
    ws.package("packages/core-a", "core-a", PackageSpec::complex());
    ws.package("packages/core-b", "core-b", PackageSpec::complex());
    ws.package("apps/site", "site", PackageSpec::plain());

    let runner = Arc::new(
        MockToolRunner::new()
            .on(
                |inv| inv.program == "npm" && inv.cwd.ends_with("core-a"),
                Err(ToolError::Timeout(120)),
            )
            .on(
                |inv| inv.program == "npm" && inv.cwd.ends_with("core-b"),
                Ok(ToolOutput::ok("1:1 warning prefer-const")),
            ),
    );

    let run = build_orchestrator(&ws, Config::default(), &runner)
        .analyze(false)
        .await
        .unwrap();
    let report = &run.report;

    assert_eq!(run.workspace.tiers.heavy.len(), 2);
    assert_eq!(report.total_packages, 3);
    assert_eq!(report.linted_packages, 3);

    let core_a = &report.package_results["core-a"];
    assert_eq!(core_a.status, CheckStatus::Failed);
    assert_eq!((core_a.errors, core_a.warnings), (1, 0));
    assert_eq!(core_a.tier, Tier::Heavy);

    let core_b = &report.package_results["core-b"];
    assert_eq!(core_b.status, CheckStatus::Success);
    assert_eq!(core_b.warnings, 1);

    // Heavy packages ran one by one under the per-package timeout, before the light batch.
    let calls = runner.calls();
    assert_eq!(calls.len(), 3);
    assert!(calls[..2].iter().all(|c| c.program == "npm"));
    assert!(calls[..2]
        .iter()
        .all(|c| c.timeout == Duration::from_secs(120)));
    assert_eq!(calls[2].program, "pnpm");
    assert!(calls[2].args.contains(&"--workspace-concurrency=8".to_string()));
}

#[tokio::test]
async fn test_medium_batch_splits_errors_evenly() {
    let ws = TestWorkspace::new();
    for name in ["alpha", "beta", "gamma"] {
        ws.package(&format!("libs/{name}"), name, PackageSpec::complex());
    }

    let batch_output = (1..=6)
        .map(|i| format!("src/f{i}.ts 1:1 error no-undef"))
        .collect::<Vec<_>>()
        .join("\n");
    let runner = Arc::new(MockToolRunner::new().on_args_containing(
        "--workspace-concurrency=4",
        Ok(ToolOutput::ok(batch_output)),
    ));

    let run = build_orchestrator(&ws, Config::default(), &runner)
        .analyze(false)
        .await
        .unwrap();

    assert_eq!(run.workspace.tiers.medium.len(), 3);
    for name in ["alpha", "beta", "gamma"] {
        let result = &run.report.package_results[name];
        assert_eq!(result.errors, 2, "{name}");
        assert_eq!(result.tier, Tier::Medium);
    }
    assert_eq!(run.report.errors, 6);
    assert!((run.report.quality_score - 80.0).abs() < f64::EPSILON);

    // One batch invocation from the root, filtered to the three member directories.
    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].cwd, ws.root());
    for name in ["alpha", "beta", "gamma"] {
        assert!(calls[0].args.contains(&format!("./libs/{name}")));
    }
}

#[tokio::test]
async fn test_unnamed_package_is_selected_by_directory() {
    let ws = TestWorkspace::new();
    ws.file(
        "tools/cli/package.json",
        r#"{"private": true, "scripts": {"lint": "eslint ."}}"#,
    );

    let runner = Arc::new(MockToolRunner::new().on_args_containing(
        "--filter ./tools/cli",
        Ok(ToolOutput::ok("1:1 error no-undef")),
    ));

    let run = build_orchestrator(&ws, Config::default(), &runner)
        .analyze(false)
        .await
        .unwrap();

    let result = &run.report.package_results["tools/cli"];
    assert_eq!(result.tier, Tier::Light);
    assert_eq!(result.errors, 1);
    assert!(runner.calls()[0]
        .args
        .contains(&"--fail-if-no-match".to_string()));
}

#[tokio::test]
async fn test_per_package_attribution_is_exact() {
    let ws = TestWorkspace::new();
    ws.package("libs/alpha", "alpha", PackageSpec::complex());
    ws.package("libs/beta", "beta", PackageSpec::complex());

    let runner = Arc::new(
        MockToolRunner::new()
            .on(
                |inv| inv.cwd.ends_with("alpha"),
                Ok(ToolOutput::ok("error a\nerror b\nerror c")),
            )
            .on(|inv| inv.cwd.ends_with("beta"), Ok(ToolOutput::ok(""))),
    );

    let mut config = Config::default();
    config.scheduler.attribution = AttributionMode::PerPackage;

    let run = build_orchestrator(&ws, config, &runner)
        .analyze(false)
        .await
        .unwrap();

    assert_eq!(run.report.package_results["alpha"].errors, 3);
    assert_eq!(run.report.package_results["beta"].errors, 0);
    assert!(runner.calls().iter().all(|c| c.program == "npm"));
}

#[tokio::test]
async fn test_trend_tracks_previous_run() {
    let ws = TestWorkspace::new();
    ws.package("apps/site", "site", PackageSpec::plain());

    let noisy = Arc::new(MockToolRunner::new().on_program(
        "pnpm",
        Ok(ToolOutput::ok("warning a\nwarning b\nwarning c")),
    ));
    let first = build_orchestrator(&ws, Config::default(), &noisy)
        .analyze(true)
        .await
        .unwrap();
    assert!(!first.workspace.from_cache);
    assert!((first.report.previous_score - 0.0).abs() < f64::EPSILON);
    assert!((first.report.quality_score - 70.0).abs() < f64::EPSILON);

    let clean = Arc::new(MockToolRunner::new());
    let orchestrator = build_orchestrator(&ws, Config::default(), &clean);
    let second = orchestrator.analyze(true).await.unwrap();

    assert!(second.workspace.from_cache);
    assert!((second.report.previous_score - 70.0).abs() < f64::EPSILON);
    assert!((second.report.quality_score - 100.0).abs() < f64::EPSILON);
    assert_eq!(Trend::from_delta(second.report.delta()), Trend::Improved);

    let persisted = orchestrator.scorer().last_report().unwrap();
    assert_eq!(persisted.run_id, second.report.run_id);
}

#[tokio::test]
async fn test_single_security_match_yields_one_recommendation() {
    let ws = TestWorkspace::new();
    ws.package("apps/site", "site", PackageSpec::plain());
    ws.file(
        "apps/site/src/render.ts",
        "export const render = (el, html) => {\n  el.innerHTML = html;\n};\n",
    );

    let runner = Arc::new(MockToolRunner::new());
    let orchestrator = build_orchestrator(&ws, Config::default(), &runner);
    let run = orchestrator.analyze(false).await.unwrap();
    let gate = orchestrator.gate(&run.report, false).await.unwrap();

    let failed: Vec<_> = gate.checks.iter().filter(|c| !c.passed).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "security-scan");

    assert_eq!(gate.recommendations.len(), 1);
    assert!(gate.recommendations[0].contains("security-scan"));

    // 7 of 8 checks pass: 88%.
    assert_eq!(gate.score, 88);
    assert!(gate.passed);
}

#[tokio::test]
async fn test_gate_threshold_with_build_check() {
    let ws = TestWorkspace::new();
    ws.package("apps/site", "site", PackageSpec::plain());
    ws.file("apps/site/src/a.ts", "eval(code);\n");

    let runner = Arc::new(MockToolRunner::new());
    let orchestrator = build_orchestrator(&ws, Config::default(), &runner);
    let run = orchestrator.analyze(false).await.unwrap();

    // 8 of 9 checks pass: 89%.
    let gate = orchestrator.gate(&run.report, true).await.unwrap();
    assert_eq!(gate.checks.len(), 9);
    assert_eq!(gate.checks.last().unwrap().name, "build");
    assert_eq!(gate.score, 89);
    assert!(gate.passed);

    // A comment-debt ceiling of zero can never be met: 7 of 9 is 78%.
    let mut config = Config::default();
    config.gate.comment_debt_ceiling = 0;
    let strict = QualityOrchestrator::new(ws.root(), config, runner.clone());
    let gate = strict.gate(&run.report, true).await.unwrap();
    assert_eq!(gate.score, 78);
    assert!(!gate.passed);
    assert_eq!(gate.recommendations.len(), 2);
}

#[tokio::test]
async fn test_failing_gate_tool_is_reported() {
    let ws = TestWorkspace::new();
    let runner = Arc::new(
        MockToolRunner::new()
            .on_args_containing("tsc", Ok(ToolOutput::failed(2, "error TS2322")))
            .on_args_containing("audit", Err(ToolError::Spawn("pnpm: not found".into()))),
    );

    let orchestrator = build_orchestrator(&ws, Config::default(), &runner);
    let run = orchestrator.analyze(false).await.unwrap();
    let gate = orchestrator.gate(&run.report, false).await.unwrap();

    let failed: Vec<_> = gate
        .checks
        .iter()
        .filter(|c| !c.passed)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(failed, vec!["type-check", "dependency-audit"]);
    assert!(gate.recommendations[0].starts_with("type-check: "));
    assert!(gate.recommendations[1].starts_with("dependency-audit: "));
    // 6 of 8 checks pass: 75%.
    assert!(!gate.passed);
}
