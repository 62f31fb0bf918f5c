//! Application services: the analysis pipeline and the quality gate.

pub mod aggregator;
pub mod categorizer;
pub mod discovery;
pub mod gate_checks;
pub mod gate_engine;
pub mod orchestrator;
pub mod quality_scorer;
pub mod scheduler;

pub use aggregator::{batch_results, count_issues, even_share, single_result, IssueCounts};
pub use categorizer::Categorizer;
pub use discovery::{DiscoveryOutcome, PackageDiscovery};
pub use gate_engine::QualityGate;
pub use orchestrator::{AnalysisRun, DiscoveredWorkspace, QualityOrchestrator};
pub use quality_scorer::{QualityScorer, Trend};
pub use scheduler::{PackageOutcome, TieredScheduler};
