//! The synchronization engine: the per-target cycle controller and the
//! periodic scheduler that drives it.

mod cycle;
mod scheduler;

pub use cycle::{sync_target, CycleOutcome, CycleReport};
pub use scheduler::{run_pass, run_single_pass, run_sync_loop};
