//! CLI command handlers. Each command is in its own file.

mod run;
mod scan;

pub use run::run_batch;
pub use scan::run_scan;
