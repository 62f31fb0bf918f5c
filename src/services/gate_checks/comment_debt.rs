//! Comment-debt density check.

use async_trait::async_trait;
use regex::Regex;
use std::fs;
use std::path::Path;

use super::source_files::SourceFiles;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GateCheck, GateConfig, WorkspaceConfig};
use crate::domain::ports::{GateChecker, GateContext};

/// Counts deferred-work marker lines; passes while the count stays below
/// the configured ceiling.
pub struct CommentDebtChecker {
    marker: Regex,
    ceiling: usize,
    files: SourceFiles,
}

impl CommentDebtChecker {
    /// Check name.
    pub const NAME: &'static str = "comment-debt";

    /// Compile the marker pattern.
    pub fn new(gate: &GateConfig, workspace: &WorkspaceConfig) -> DomainResult<Self> {
        let marker =
            Regex::new(&gate.comment_debt_pattern).map_err(|e| DomainError::InvalidPattern {
                pattern: gate.comment_debt_pattern.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            marker,
            ceiling: gate.comment_debt_ceiling,
            files: SourceFiles::new(&workspace.skip_dirs, &gate.scan_extensions),
        })
    }

    /// Marker lines in one file's contents.
    pub fn count_text(&self, contents: &str) -> usize {
        contents.lines().filter(|l| self.marker.is_match(l)).count()
    }

    /// Marker lines across every source file under `root`.
    pub fn count(&self, root: &Path) -> usize {
        self.files
            .collect(root)
            .iter()
            .filter_map(|path| fs::read_to_string(path).ok())
            .map(|contents| self.count_text(&contents))
            .sum()
    }
}

#[async_trait]
impl GateChecker for CommentDebtChecker {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn evaluate(&self, ctx: &GateContext<'_>) -> anyhow::Result<Vec<GateCheck>> {
        let count = self.count(ctx.root);
        tracing::info!(
            checker = self.name(),
            markers = count,
            ceiling = self.ceiling,
            "Comment debt counted"
        );

        #[allow(clippy::cast_precision_loss)]
        let check = GateCheck::with_outcome(
            Self::NAME,
            count < self.ceiling,
            format!("{count} deferred-work marker(s) (must stay below {})", self.ceiling),
        )
        .with_score(count as f64);
        Ok(vec![check])
    }

    fn recommendation(&self, _check: &GateCheck) -> String {
        format!(
            "Resolve or ticket TODO/FIXME markers until fewer than {} remain",
            self.ceiling
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RunReport;
    use tempfile::TempDir;

    #[test]
    fn test_count_text_matches_whole_words() {
        let checker =
            CommentDebtChecker::new(&GateConfig::default(), &WorkspaceConfig::default()).unwrap();
        let source =
            "// TODO: later\n// FIXME\nconst TODOS = 1;\n// todo lowercase\n/* HACK */ // XXX\n";
        assert_eq!(checker.count_text(source), 3);
    }

    #[tokio::test]
    async fn test_count_at_ceiling_fails() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("a.ts"), "// TODO one\n// TODO two\n").unwrap();

        let gate = GateConfig {
            comment_debt_ceiling: 2,
            ..Default::default()
        };
        let checker = CommentDebtChecker::new(&gate, &WorkspaceConfig::default()).unwrap();
        let report = RunReport::new(0, 0.0);
        let ctx = GateContext {
            root: root.path(),
            report: &report,
        };

        let checks = checker.evaluate(&ctx).await.unwrap();
        assert!(!checks[0].passed);
        assert_eq!(checks[0].score, Some(2.0));

        fs::write(root.path().join("a.ts"), "// TODO one\n").unwrap();
        let checks = checker.evaluate(&ctx).await.unwrap();
        assert!(checks[0].passed);
    }
}
