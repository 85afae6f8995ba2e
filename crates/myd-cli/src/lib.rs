//! Library side of the `myd` command: the run pipeline, lint, batch
//! manifests and scaffolding.

pub mod lint;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod runlist;
pub mod scaffold;
pub mod types;

pub use pipeline::run_pipeline;
pub use types::{ExitPolicy, RunOptions, RunOutcome};
