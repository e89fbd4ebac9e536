//! Layered error definitions
//!
//! Categorized by source: config / prerequisite / stage / artifact

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::StageKind;

/// Exit status for every fatal driver error without a better code
pub const EXIT_FAILURE: u8 = 1;

/// Exit status after Ctrl+C / SIGTERM
pub const EXIT_INTERRUPTED: u8 = 130;

/// Unified error type
#[derive(Debug, Error)]
pub enum PipelineError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Prerequisite Errors =====
    /// Stage program missing before any work began
    #[error("prerequisite missing: {stage} program not found: {}", .path.display())]
    MissingPrerequisite { stage: StageKind, path: PathBuf },

    // ===== Stage Errors =====
    /// Stage could not be started
    #[error("failed to start {stage} stage '{}': {source}", .program.display())]
    StageSpawn {
        stage: StageKind,
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stage terminated unsuccessfully
    #[error("{stage} stage failed with {}", describe_exit(.code))]
    StageFailed { stage: StageKind, code: Option<i32> },

    /// Stage exceeded the configured timeout and was killed
    #[error("{stage} stage timed out after {}s", .after.as_secs())]
    StageTimedOut { stage: StageKind, after: Duration },

    // ===== Artifact Errors =====
    /// Stage exited but its declared artifact is absent
    #[error("artifact not produced: {stage} stage did not create {}", .path.display())]
    ArtifactNotProduced { stage: StageKind, path: PathBuf },

    /// Results file absent after the validator ran
    #[error("results not produced: {}", .path.display())]
    ResultsNotProduced { path: PathBuf },

    /// Results file could not be opened for the stdout redirection
    #[error("cannot redirect output to {}: {source}", .path.display())]
    ResultsRedirect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ===== General Errors =====
    /// Run abandoned on user request
    #[error("interrupted")]
    Interrupted,

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create missing prerequisite error
    pub fn missing_prerequisite(stage: StageKind, path: impl Into<PathBuf>) -> Self {
        Self::MissingPrerequisite {
            stage,
            path: path.into(),
        }
    }

    /// Create missing artifact error
    pub fn artifact_not_produced(stage: StageKind, path: impl Into<PathBuf>) -> Self {
        Self::ArtifactNotProduced {
            stage,
            path: path.into(),
        }
    }

    /// Process exit status for this error
    ///
    /// A failed stage hands its own exit code through; everything else maps
    /// to 1, except interrupts.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::StageFailed {
                code: Some(code), ..
            } if (1..=255).contains(code) => *code as u8,
            Self::Interrupted => EXIT_INTERRUPTED,
            _ => EXIT_FAILURE,
        }
    }

    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigParse { .. } | Self::ConfigValidation { .. } => "config",
            Self::MissingPrerequisite { .. } => "missing_prerequisite",
            Self::StageSpawn { .. } | Self::StageFailed { .. } | Self::StageTimedOut { .. } => {
                "stage_failure"
            }
            Self::ArtifactNotProduced { .. } => "artifact_not_produced",
            Self::ResultsNotProduced { .. } | Self::ResultsRedirect { .. } => {
                "results_not_produced"
            }
            Self::Interrupted => "interrupted",
            Self::Io(_) => "other",
        }
    }
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_exit_code_is_propagated() {
        let err = PipelineError::StageFailed {
            stage: StageKind::Builder,
            code: Some(3),
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "builder stage failed with exit code 3");
    }

    #[test]
    fn test_out_of_range_codes_map_to_failure() {
        for code in [None, Some(-1), Some(0), Some(300)] {
            let err = PipelineError::StageFailed {
                stage: StageKind::Validator,
                code,
            };
            assert_eq!(err.exit_code(), EXIT_FAILURE);
        }
    }

    #[test]
    fn test_guard_failures_exit_one() {
        let err = PipelineError::missing_prerequisite(StageKind::Validator, "tokens/v.py");
        assert_eq!(err.exit_code(), 1);
        assert_eq!(
            err.to_string(),
            "prerequisite missing: validator program not found: tokens/v.py"
        );
        assert_eq!(err.kind(), "missing_prerequisite");

        let err = PipelineError::artifact_not_produced(StageKind::Builder, "tokens/t.json");
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().contains("tokens/t.json"));
    }

    #[test]
    fn test_io_error_kind() {
        let err = PipelineError::from(std::io::Error::other("disk full"));
        assert_eq!(err.kind(), "other");
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_interrupted_exit_code() {
        assert_eq!(PipelineError::Interrupted.exit_code(), 130);
    }
}
