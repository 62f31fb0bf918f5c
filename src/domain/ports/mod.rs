//! Port trait definitions (Hexagonal Architecture)
//!
//! - ToolRunner: external tool invocation with timeout
//! - GateChecker: one independent quality gate criterion
//!
//! Infrastructure adapters implement these so the services stay independent
//! of subprocesses and the filesystem layout.

pub mod gate_checker;
pub mod tool_runner;

pub use gate_checker::{GateChecker, GateContext};
pub use tool_runner::{ToolError, ToolInvocation, ToolOutput, ToolRunner};
