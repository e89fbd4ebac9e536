//! Driver metrics
//!
//! All series carry the `tokpipe_` prefix. Without an installed recorder the
//! macros are no-ops, so library code records unconditionally.

use std::time::Duration;

use contracts::{StageKind, StageOutcome};
use metrics::{counter, gauge, histogram};

/// Which existence gate was evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactCheck {
    /// Stage program present before the run
    Program,
    /// Builder artifact present after stage 1
    Artifact,
    /// Results file present after stage 2
    Results,
}

impl ArtifactCheck {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactCheck::Program => "program",
            ArtifactCheck::Artifact => "artifact",
            ArtifactCheck::Results => "results",
        }
    }
}

/// Record a stage that ran to termination
pub fn record_stage_completed(outcome: &StageOutcome) {
    let status = if outcome.success { "success" } else { "failure" };
    counter!(
        "tokpipe_stage_runs_total",
        "stage" => outcome.stage.as_str(),
        "status" => status
    )
    .increment(1);

    histogram!("tokpipe_stage_duration_seconds", "stage" => outcome.stage.as_str())
        .record(outcome.duration.as_secs_f64());

    if let Some(code) = outcome.exit_code {
        gauge!("tokpipe_stage_last_exit_code", "stage" => outcome.stage.as_str())
            .set(code as f64);
    }
}

/// Record a stage that never produced an exit status (spawn failure, timeout)
pub fn record_stage_error(stage: StageKind, kind: &'static str) {
    counter!(
        "tokpipe_stage_errors_total",
        "stage" => stage.as_str(),
        "kind" => kind
    )
    .increment(1);
}

/// Record one existence gate
pub fn record_artifact_check(stage: StageKind, check: ArtifactCheck, present: bool) {
    let status = if present { "present" } else { "missing" };
    counter!(
        "tokpipe_artifact_checks_total",
        "stage" => stage.as_str(),
        "check" => check.as_str(),
        "status" => status
    )
    .increment(1);
}

/// Record the terminal state of a run
///
/// `status` is "success" or the failing error's kind label.
pub fn record_pipeline_outcome(status: &'static str, duration: Duration) {
    counter!("tokpipe_pipeline_runs_total", "status" => status).increment(1);
    histogram!("tokpipe_pipeline_duration_seconds").record(duration.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_labels() {
        assert_eq!(ArtifactCheck::Program.as_str(), "program");
        assert_eq!(ArtifactCheck::Artifact.as_str(), "artifact");
        assert_eq!(ArtifactCheck::Results.as_str(), "results");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let outcome = StageOutcome::failed(StageKind::Validator, Some(3), Duration::from_millis(5));
        record_stage_completed(&outcome);
        record_stage_error(StageKind::Builder, "stage_failure");
        record_artifact_check(StageKind::Builder, ArtifactCheck::Artifact, false);
        record_pipeline_outcome("artifact_not_produced", Duration::from_secs(1));
    }
}
