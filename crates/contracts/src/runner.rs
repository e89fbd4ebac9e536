//! StageRunner trait - process invocation seam
//!
//! The driver never spawns processes itself. It hands a `StageInvocation`
//! to a runner and waits for the `StageOutcome`, so the real process runner
//! and scripted test runners are interchangeable.

use crate::{PipelineError, StageInvocation, StageOutcome};

/// Runs one external stage to completion
#[trait_variant::make(StageRunner: Send)]
pub trait LocalStageRunner {
    /// Runner name (used for logging)
    fn name(&self) -> &str;

    /// Start the stage and wait until it terminates
    ///
    /// A stage that exits non-zero is not an error here: it is reported
    /// through `StageOutcome::success`. Errors are reserved for stages that
    /// could not be started, redirected or waited for.
    async fn run(&self, invocation: &StageInvocation) -> Result<StageOutcome, PipelineError>;
}
