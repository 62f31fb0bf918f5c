//! Security heuristic scan.
//!
//! Looks for the configured textual anti-patterns in workspace sources.
//! Any match fails the check; every match is logged individually.

use async_trait::async_trait;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use super::source_files::SourceFiles;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GateCheck, GateConfig, WorkspaceConfig};
use crate::domain::ports::{GateChecker, GateContext};

// ---------------------------------------------------------------------------
// SecurityScanChecker
// ---------------------------------------------------------------------------

/// One anti-pattern match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityFinding {
    /// File containing the match
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Pattern that matched
    pub pattern: String,
}

/// Gate checker for the security heuristics.
pub struct SecurityScanChecker {
    patterns: Vec<Regex>,
    files: SourceFiles,
}

impl SecurityScanChecker {
    /// Check name.
    pub const NAME: &'static str = "security-scan";

    /// Compile the configured patterns.
    pub fn new(gate: &GateConfig, workspace: &WorkspaceConfig) -> DomainResult<Self> {
        let patterns = gate
            .security_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| DomainError::InvalidPattern {
                    pattern: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<DomainResult<Vec<_>>>()?;

        Ok(Self {
            patterns,
            files: SourceFiles::new(&workspace.skip_dirs, &gate.scan_extensions),
        })
    }

    /// Matches in one file's contents. A line matching several patterns
    /// yields one finding per pattern.
    pub fn scan_text(&self, file: &Path, contents: &str) -> Vec<SecurityFinding> {
        let mut findings = Vec::new();
        for (idx, line) in contents.lines().enumerate() {
            for re in &self.patterns {
                if re.is_match(line) {
                    findings.push(SecurityFinding {
                        file: file.to_path_buf(),
                        line: idx + 1,
                        pattern: re.as_str().to_string(),
                    });
                }
            }
        }
        findings
    }

    /// Scan every source file under `root`.
    pub fn scan(&self, root: &Path) -> Vec<SecurityFinding> {
        let mut findings = Vec::new();
        for path in self.files.collect(root) {
            match fs::read_to_string(&path) {
                Ok(contents) => findings.extend(self.scan_text(&path, &contents)),
                Err(e) => {
                    tracing::debug!(file = %path.display(), error = %e, "Skipping unreadable file");
                }
            }
        }
        findings
    }
}

#[async_trait]
impl GateChecker for SecurityScanChecker {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn evaluate(&self, ctx: &GateContext<'_>) -> anyhow::Result<Vec<GateCheck>> {
        tracing::info!(checker = self.name(), root = %ctx.root.display(), "Running security scan");

        let findings = self.scan(ctx.root);
        for finding in &findings {
            tracing::warn!(
                file = %finding.file.display(),
                line = finding.line,
                pattern = %finding.pattern,
                "Potential security issue"
            );
        }

        #[allow(clippy::cast_precision_loss)]
        let check = if findings.is_empty() {
            GateCheck::pass(Self::NAME, "No security anti-patterns found")
        } else {
            GateCheck::fail(
                Self::NAME,
                format!("{} potential security issue(s) found", findings.len()),
            )
        }
        .with_score(findings.len() as f64);

        tracing::info!(
            checker = self.name(),
            findings = findings.len(),
            "Security scan complete"
        );
        Ok(vec![check])
    }

    fn recommendation(&self, _check: &GateCheck) -> String {
        "Remove the flagged eval/innerHTML usage and move credentials out of source".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RunReport;
    use tempfile::TempDir;

    fn checker() -> SecurityScanChecker {
        SecurityScanChecker::new(&GateConfig::default(), &WorkspaceConfig::default()).unwrap()
    }

    #[test]
    fn scan_text_empty() {
        assert!(checker().scan_text(Path::new("a.ts"), "").is_empty());
    }

    #[test]
    fn scan_text_reports_line_numbers() {
        let source = "const a = 1;\nel.innerHTML = html;\nconst b = eval(code);\n";
        let findings = checker().scan_text(Path::new("a.ts"), source);
        let lines: Vec<_> = findings.iter().map(|f| f.line).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn scan_text_detects_credential_literals() {
        let source = r#"const API_KEY = "sk-live-123456";"#;
        let findings = checker().scan_text(Path::new("a.ts"), source);
        assert_eq!(findings.len(), 1);
        // Short or computed values are not flagged.
        assert!(checker()
            .scan_text(Path::new("a.ts"), "const token = getToken();")
            .is_empty());
    }

    #[test]
    fn evaluation_word_in_identifier_is_not_flagged() {
        assert!(checker()
            .scan_text(Path::new("a.ts"), "const retrieval = medieval(x);")
            .is_empty());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let gate = GateConfig {
            security_patterns: vec!["(".to_string()],
            ..Default::default()
        };
        assert!(SecurityScanChecker::new(&gate, &WorkspaceConfig::default()).is_err());
    }

    #[tokio::test]
    async fn single_match_fails_check() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("src")).unwrap();
        fs::write(root.path().join("src/app.js"), "document.write(\"hi\");\n").unwrap();
        fs::write(root.path().join("src/ok.ts"), "export const x = 1;\n").unwrap();
        fs::create_dir_all(root.path().join("node_modules/dep")).unwrap();
        fs::write(root.path().join("node_modules/dep/i.js"), "eval(x)").unwrap();

        let report = RunReport::new(0, 0.0);
        let ctx = GateContext {
            root: root.path(),
            report: &report,
        };
        let checks = checker().evaluate(&ctx).await.unwrap();

        assert_eq!(checks.len(), 1);
        assert!(!checks[0].passed);
        assert_eq!(checks[0].message, "1 potential security issue(s) found");
        assert_eq!(checks[0].score, Some(1.0));
    }
}
