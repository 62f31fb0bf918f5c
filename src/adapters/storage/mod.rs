//! File-backed state: discovery cache and run report.

pub mod package_cache;
pub mod report_store;

pub use package_cache::PackageCache;
pub use report_store::ReportStore;
