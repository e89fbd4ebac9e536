//! # Pipeline Driver
//!
//! Sequences the builder and validator stages over one immutable
//! `PipelineConfig`:
//!
//! ```text
//! START -> CHECK_STAGE1_EXISTS -> CHECK_STAGE2_EXISTS -> RUN_STAGE1 -> CHECK_ARTIFACT1
//!       -> RUN_STAGE2 -> CHECK_ARTIFACT2 -> SUCCESS
//! any failing state -> ABORT
//! ```
//!
//! Every failure is fatal. Process execution goes through a `StageRunner`,
//! so the same driver runs real programs or scripted mocks.

mod artifact;
mod engine;
mod report;
mod state;

pub use artifact::{clear_stale_outputs, require_output, require_program};
pub use engine::PipelineDriver;
pub use report::{PipelineReport, PlanSummary, PlannedStage, RunPlan};
pub use state::{DriverState, Phase};
