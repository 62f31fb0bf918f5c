//! Tool runner adapters.

pub mod mock;
pub mod process;

pub use mock::MockToolRunner;
pub use process::ProcessToolRunner;
