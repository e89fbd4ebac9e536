//! Existence gates and stale output handling
//!
//! Checks are existence-only; content is never inspected.

use std::io;
use std::path::{Path, PathBuf};

use contracts::{PipelineError, StageKind};
use observability::{record_artifact_check, ArtifactCheck};
use tracing::{debug, info};

/// Stage program must be a regular file
pub fn require_program(stage: StageKind, program: &Path) -> Result<(), PipelineError> {
    let present = program.is_file();
    record_artifact_check(stage, ArtifactCheck::Program, present);

    if !present {
        debug!(stage = %stage, path = %program.display(), "Stage program not found");
        return Err(PipelineError::missing_prerequisite(stage, program));
    }
    debug!(stage = %stage, path = %program.display(), "Stage program present");
    Ok(())
}

/// Declared output of `stage` must exist after it ran
pub fn require_output(stage: StageKind, path: &Path) -> Result<(), PipelineError> {
    let check = match stage {
        StageKind::Builder => ArtifactCheck::Artifact,
        StageKind::Validator => ArtifactCheck::Results,
    };
    let present = path.is_file();
    record_artifact_check(stage, check, present);

    if !present {
        debug!(stage = %stage, path = %path.display(), "Declared output missing");
        return Err(match stage {
            StageKind::Builder => PipelineError::artifact_not_produced(stage, path),
            StageKind::Validator => PipelineError::ResultsNotProduced {
                path: path.to_path_buf(),
            },
        });
    }
    debug!(stage = %stage, path = %path.display(), "Declared output present");
    Ok(())
}

/// Delete outputs left behind by a previous run
///
/// Returns the paths actually removed. Absent files are skipped.
pub fn clear_stale_outputs(paths: &[&Path]) -> Result<Vec<PathBuf>, PipelineError> {
    let mut removed = Vec::new();
    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => {
                info!(path = %path.display(), "Removed stale output");
                removed.push(path.to_path_buf());
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(PipelineError::Io(e)),
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_require_program() {
        let dir = tempdir().unwrap();
        let program = dir.path().join("tokenizer.py");

        let err = require_program(StageKind::Builder, &program).unwrap_err();
        assert!(matches!(err, PipelineError::MissingPrerequisite { .. }));
        assert!(err.to_string().contains("tokenizer.py"));

        std::fs::write(&program, "").unwrap();
        assert!(require_program(StageKind::Builder, &program).is_ok());
    }

    #[test]
    fn test_directory_is_not_a_program() {
        let dir = tempdir().unwrap();
        assert!(require_program(StageKind::Validator, dir.path()).is_err());
    }

    #[test]
    fn test_require_output_errors_per_stage() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("absent");

        let err = require_output(StageKind::Builder, &missing).unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactNotProduced { .. }));

        let err = require_output(StageKind::Validator, &missing).unwrap_err();
        assert!(matches!(err, PipelineError::ResultsNotProduced { .. }));
    }

    #[test]
    fn test_clear_stale_outputs() {
        let dir = tempdir().unwrap();
        let artifact = dir.path().join("tokenizer.json");
        let results = dir.path().join("validation_results.txt");
        std::fs::write(&artifact, "{}").unwrap();

        let removed = clear_stale_outputs(&[artifact.as_path(), results.as_path()]).unwrap();
        assert_eq!(removed, vec![artifact.clone()]);
        assert!(!artifact.exists());

        assert!(clear_stale_outputs(&[artifact.as_path(), results.as_path()])
            .unwrap()
            .is_empty());
    }
}
