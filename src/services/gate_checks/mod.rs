//! Gate checker implementations.
//!
//! Each checker implements [`GateChecker`](crate::domain::ports::GateChecker)
//! and contributes one or more named checks to the quality gate.
//!
//! | Checker                 | Checks                                                  | Input       |
//! |-------------------------|---------------------------------------------------------|-------------|
//! | [`LintQualityChecker`]  | `lint-score`, `lint-errors`, `lint-warnings`            | run report  |
//! | [`CommandChecker`]      | `type-check`, `formatting`, `dependency-audit`, `build` | tool exit   |
//! | [`SecurityScanChecker`] | `security-scan`                                         | source text |
//! | [`CommentDebtChecker`]  | `comment-debt`                                          | source text |

pub mod command;
pub mod comment_debt;
pub mod lint_quality;
pub mod security_scan;
pub mod source_files;

pub use command::CommandChecker;
pub use comment_debt::CommentDebtChecker;
pub use lint_quality::LintQualityChecker;
pub use security_scan::{SecurityFinding, SecurityScanChecker};
pub use source_files::SourceFiles;
