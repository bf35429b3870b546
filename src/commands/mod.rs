//! CLI command implementations.

pub mod check;
pub mod run;
pub mod subscribers;

pub use check::CheckCommand;
pub use run::{run_with_retries, RunCommand};
pub use subscribers::format_subscribers;
