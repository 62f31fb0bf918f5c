//! Configuration models and tool command templates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Qualigate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Workspace discovery and cache configuration
    #[serde(default)]
    pub workspace: WorkspaceConfig,

    /// Tier categorization weights and thresholds
    #[serde(default)]
    pub categorizer: CategorizerConfig,

    /// Tiered execution policy
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Release gate thresholds and tool commands
    #[serde(default)]
    pub gate: GateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// An external tool invocation template.
///
/// Arguments may contain placeholders expanded by [`ToolCommand::render`]:
/// `{path}`, `{concurrency}` and `{level}` are substituted in place, while
/// `{paths}` and `{filters}` must stand alone and expand to one argument per
/// target (`{filters}` to a `--filter <selector>` pair per target).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCommand {
    /// Executable to run
    pub program: String,
    /// Argument template
    #[serde(default)]
    pub args: Vec<String>,
}

/// Values substituted into a [`ToolCommand`] argument template.
#[derive(Debug, Clone, Default)]
pub struct Placeholders<'a> {
    /// Single package path
    pub path: Option<&'a str>,
    /// Batch member paths
    pub paths: &'a [String],
    /// Batch member selectors (`./<path relative to the root>`)
    pub selectors: &'a [String],
    /// Batch concurrency cap
    pub concurrency: Option<usize>,
    /// Audit severity floor
    pub level: Option<&'a str>,
}

impl ToolCommand {
    /// Build a command from a program and literal arguments.
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        }
    }

    /// Expand the argument template.
    pub fn render(&self, values: &Placeholders<'_>) -> Vec<String> {
        let mut rendered = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            match arg.as_str() {
                "{paths}" => rendered.extend(values.paths.iter().cloned()),
                "{filters}" => {
                    for selector in values.selectors {
                        rendered.push("--filter".to_string());
                        rendered.push(selector.clone());
                    }
                }
                _ => {
                    let mut expanded = arg.clone();
                    if let Some(path) = values.path {
                        expanded = expanded.replace("{path}", path);
                    }
                    if let Some(concurrency) = values.concurrency {
                        expanded = expanded.replace("{concurrency}", &concurrency.to_string());
                    }
                    if let Some(level) = values.level {
                        expanded = expanded.replace("{level}", level);
                    }
                    rendered.push(expanded);
                }
            }
        }
        rendered
    }

    /// Command line for logs and messages.
    pub fn display(&self, values: &Placeholders<'_>) -> String {
        std::iter::once(self.program.clone())
            .chain(self.render(values))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Workspace discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WorkspaceConfig {
    /// State directory relative to the workspace root
    #[serde(default = "default_state_dir")]
    pub state_dir: String,

    /// Package cache time-to-live in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Manifest file name identifying a package
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Manifest script that declares the lint capability
    #[serde(default = "default_lint_script")]
    pub lint_script: String,

    /// Manifest script that declares tests
    #[serde(default = "default_test_script")]
    pub test_script: String,

    /// Files whose presence marks a package as type-checked
    #[serde(default = "default_type_config_files")]
    pub type_config_files: Vec<String>,

    /// Directory names never descended into
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,
}

fn default_state_dir() -> String {
    ".qualigate".to_string()
}

const fn default_cache_ttl_secs() -> u64 {
    3600
}

fn default_manifest() -> String {
    "package.json".to_string()
}

fn default_lint_script() -> String {
    "lint".to_string()
}

fn default_test_script() -> String {
    "test".to_string()
}

fn default_type_config_files() -> Vec<String> {
    vec!["tsconfig.json".to_string()]
}

fn default_skip_dirs() -> Vec<String> {
    [
        "node_modules",
        "dist",
        "build",
        "coverage",
        "target",
        ".git",
        ".next",
        ".turbo",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            cache_ttl_secs: default_cache_ttl_secs(),
            manifest: default_manifest(),
            lint_script: default_lint_script(),
            test_script: default_test_script(),
            type_config_files: default_type_config_files(),
            skip_dirs: default_skip_dirs(),
        }
    }
}

/// Weighted categorizer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategorizerConfig {
    /// Packages above this size get the full size weight (2)
    #[serde(default = "default_large_size_bytes")]
    pub large_size_bytes: u64,

    /// Packages above this size get a size weight of 1
    #[serde(default = "default_medium_size_bytes")]
    pub medium_size_bytes: u64,

    /// Minimum weight for the heavy tier
    #[serde(default = "default_heavy_min_weight")]
    pub heavy_min_weight: u32,

    /// Minimum weight for the medium tier
    #[serde(default = "default_medium_min_weight")]
    pub medium_min_weight: u32,

    /// Name patterns (regex) worth +2
    #[serde(default = "default_critical_patterns")]
    pub critical_patterns: Vec<String>,

    /// Name patterns (regex) worth +1
    #[serde(default = "default_important_patterns")]
    pub important_patterns: Vec<String>,
}

const fn default_large_size_bytes() -> u64 {
    1_000_000
}

const fn default_medium_size_bytes() -> u64 {
    500_000
}

const fn default_heavy_min_weight() -> u32 {
    4
}

const fn default_medium_min_weight() -> u32 {
    2
}

fn default_critical_patterns() -> Vec<String> {
    vec![r"\bcore\b".to_string(), r"\bapi\b".to_string()]
}

fn default_important_patterns() -> Vec<String> {
    vec![
        r"\bui\b".to_string(),
        r"\bshared\b".to_string(),
        r"\butils\b".to_string(),
    ]
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            large_size_bytes: default_large_size_bytes(),
            medium_size_bytes: default_medium_size_bytes(),
            heavy_min_weight: default_heavy_min_weight(),
            medium_min_weight: default_medium_min_weight(),
            critical_patterns: default_critical_patterns(),
            important_patterns: default_important_patterns(),
        }
    }
}

/// How batch results are attributed to packages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributionMode {
    /// One invocation per tier, totals split evenly across members
    #[default]
    EvenSplit,
    /// One invocation per package, bounded by the tier's concurrency cap
    PerPackage,
}

/// Tiered scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerConfig {
    /// Per-package timeout for heavy packages (and per-package mode)
    #[serde(default = "default_heavy_timeout_secs")]
    pub heavy_timeout_secs: u64,

    /// Timeout for one medium or light batch
    #[serde(default = "default_batch_timeout_secs")]
    pub batch_timeout_secs: u64,

    /// Concurrency cap for the medium batch
    #[serde(default = "default_medium_concurrency")]
    pub medium_concurrency: usize,

    /// Concurrency cap for the light batch
    #[serde(default = "default_light_concurrency")]
    pub light_concurrency: usize,

    /// Batch attribution strategy
    #[serde(default)]
    pub attribution: AttributionMode,

    /// Single-package lint command, run inside the package directory
    #[serde(default = "default_lint_command")]
    pub lint_command: ToolCommand,

    /// Batch lint command, run in the workspace root
    #[serde(default = "default_batch_lint_command")]
    pub batch_lint_command: ToolCommand,
}

const fn default_heavy_timeout_secs() -> u64 {
    120
}

const fn default_batch_timeout_secs() -> u64 {
    300
}

const fn default_medium_concurrency() -> usize {
    4
}

const fn default_light_concurrency() -> usize {
    8
}

fn default_lint_command() -> ToolCommand {
    ToolCommand::new("npm", &["run", "lint"])
}

fn default_batch_lint_command() -> ToolCommand {
    ToolCommand::new(
        "pnpm",
        &[
            "--workspace-concurrency={concurrency}",
            "--fail-if-no-match",
            "{filters}",
            "run",
            "lint",
        ],
    )
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            heavy_timeout_secs: default_heavy_timeout_secs(),
            batch_timeout_secs: default_batch_timeout_secs(),
            medium_concurrency: default_medium_concurrency(),
            light_concurrency: default_light_concurrency(),
            attribution: AttributionMode::default(),
            lint_command: default_lint_command(),
            batch_lint_command: default_batch_lint_command(),
        }
    }
}

/// Quality gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GateConfig {
    /// Minimum lint quality score
    #[serde(default = "default_min_quality_score")]
    pub min_quality_score: f64,

    /// Maximum tolerated lint errors
    #[serde(default)]
    pub max_errors: u64,

    /// Maximum tolerated lint warnings
    #[serde(default = "default_max_warnings")]
    pub max_warnings: u64,

    /// Percentage of passing checks required to pass the gate
    #[serde(default = "default_pass_percentage")]
    pub pass_percentage: u32,

    /// Deferred-work marker lines must stay below this count
    #[serde(default = "default_comment_debt_ceiling")]
    pub comment_debt_ceiling: usize,

    /// Severity floor passed to the dependency audit
    #[serde(default = "default_audit_level")]
    pub audit_level: String,

    /// Timeout for each gate tool invocation
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    /// Type checker
    #[serde(default = "default_type_check_command")]
    pub type_check_command: ToolCommand,

    /// Formatting checker
    #[serde(default = "default_format_command")]
    pub format_command: ToolCommand,

    /// Dependency vulnerability scanner
    #[serde(default = "default_audit_command")]
    pub audit_command: ToolCommand,

    /// Optional build verification
    #[serde(default = "default_build_command")]
    pub build_command: ToolCommand,

    /// Source file extensions scanned by the text heuristics
    #[serde(default = "default_scan_extensions")]
    pub scan_extensions: Vec<String>,

    /// Security anti-patterns (regex)
    #[serde(default = "default_security_patterns")]
    pub security_patterns: Vec<String>,

    /// Deferred-work marker pattern (regex)
    #[serde(default = "default_comment_debt_pattern")]
    pub comment_debt_pattern: String,
}

const fn default_min_quality_score() -> f64 {
    80.0
}

const fn default_max_warnings() -> u64 {
    10
}

const fn default_pass_percentage() -> u32 {
    85
}

const fn default_comment_debt_ceiling() -> usize {
    50
}

fn default_audit_level() -> String {
    "high".to_string()
}

const fn default_tool_timeout_secs() -> u64 {
    300
}

fn default_type_check_command() -> ToolCommand {
    ToolCommand::new("pnpm", &["exec", "tsc", "--noEmit"])
}

fn default_format_command() -> ToolCommand {
    ToolCommand::new("pnpm", &["exec", "prettier", "--check", "."])
}

fn default_audit_command() -> ToolCommand {
    ToolCommand::new("pnpm", &["audit", "--audit-level={level}"])
}

fn default_build_command() -> ToolCommand {
    ToolCommand::new("pnpm", &["run", "build"])
}

fn default_scan_extensions() -> Vec<String> {
    ["js", "jsx", "ts", "tsx", "mjs", "cjs"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}

fn default_security_patterns() -> Vec<String> {
    vec![
        r"\beval\s*\(".to_string(),
        r"new\s+Function\s*\(".to_string(),
        r"\.innerHTML\s*=".to_string(),
        r"dangerouslySetInnerHTML".to_string(),
        r"document\.write\s*\(".to_string(),
        r#"(?i)(password|passwd|secret|api[_-]?key|token)\s*[:=]\s*["'][^"']{4,}["']"#.to_string(),
    ]
}

fn default_comment_debt_pattern() -> String {
    r"\b(TODO|FIXME|HACK|XXX)\b".to_string()
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_quality_score: default_min_quality_score(),
            max_errors: 0,
            max_warnings: default_max_warnings(),
            pass_percentage: default_pass_percentage(),
            comment_debt_ceiling: default_comment_debt_ceiling(),
            audit_level: default_audit_level(),
            tool_timeout_secs: default_tool_timeout_secs(),
            type_check_command: default_type_check_command(),
            format_command: default_format_command(),
            audit_command: default_audit_command(),
            build_command: default_build_command(),
            scan_extensions: default_scan_extensions(),
            security_patterns: default_security_patterns(),
            comment_debt_pattern: default_comment_debt_pattern(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json, pretty or compact
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for a daily rolling log file (stderr only when unset)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "compact".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
