//! Domain models.

pub mod config;
pub mod gate;
pub mod package;
pub mod report;

pub use config::{
    AttributionMode, CategorizerConfig, Config, GateConfig, LoggingConfig, Placeholders,
    SchedulerConfig, ToolCommand, WorkspaceConfig,
};
pub use gate::{gate_score, GateCheck, GateResult};
pub use package::{CategorizedPackage, Package, Tier, TieredPackages};
pub use report::{quality_score, CheckResult, CheckStatus, RunReport};
