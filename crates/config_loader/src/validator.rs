//! Config validation
//!
//! Rules:
//! - corpus dir, stage names, programs and flags are non-empty
//! - builder input and output flags differ
//! - artifact and results paths are non-empty and differ
//! - the results file is not one of the stage programs
//! - WSL mount root is absolute

use std::path::Path;

use contracts::{PipelineConfig, PipelineError};

/// Validate a PipelineConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &PipelineConfig) -> Result<(), PipelineError> {
    validate_corpus(config)?;
    validate_builder(config)?;
    validate_validator(config)?;
    validate_outputs(config)?;
    validate_environment(config)?;
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), PipelineError> {
    if value.trim().is_empty() {
        return Err(PipelineError::config_validation(field, "cannot be empty"));
    }
    Ok(())
}

fn require_path(field: &str, value: &Path) -> Result<(), PipelineError> {
    if value.as_os_str().is_empty() {
        return Err(PipelineError::config_validation(field, "cannot be empty"));
    }
    Ok(())
}

fn validate_corpus(config: &PipelineConfig) -> Result<(), PipelineError> {
    require_text("corpus.dir", &config.corpus.dir)
}

fn validate_builder(config: &PipelineConfig) -> Result<(), PipelineError> {
    let builder = &config.builder;
    require_text("builder.name", &builder.name)?;
    require_path("builder.program", &builder.program)?;
    require_text("builder.input_flag", &builder.input_flag)?;
    require_text("builder.output_flag", &builder.output_flag)?;

    if builder.input_flag == builder.output_flag {
        return Err(PipelineError::config_validation(
            "builder.input_flag / builder.output_flag",
            format!("both flags are '{}'", builder.input_flag),
        ));
    }
    Ok(())
}

fn validate_validator(config: &PipelineConfig) -> Result<(), PipelineError> {
    let validator = &config.validator;
    require_text("validator.name", &validator.name)?;
    require_path("validator.program", &validator.program)?;
    require_text("validator.input_flag", &validator.input_flag)
}

fn validate_outputs(config: &PipelineConfig) -> Result<(), PipelineError> {
    let artifact = config.artifact_path();
    let results = config.results_path();
    require_path("builder.output", artifact)?;
    require_path("validator.results", results)?;

    if artifact == results {
        return Err(PipelineError::config_validation(
            "validator.results",
            format!(
                "results file '{}' would overwrite the builder artifact",
                results.display()
            ),
        ));
    }

    for program in [&config.builder.program, &config.validator.program] {
        if results == program || artifact == program {
            return Err(PipelineError::config_validation(
                "builder.output / validator.results",
                format!("output path '{}' is a stage program", program.display()),
            ));
        }
    }
    Ok(())
}

fn validate_environment(config: &PipelineConfig) -> Result<(), PipelineError> {
    let root = &config.environment.wsl_mount_root;
    if !root.has_root() {
        return Err(PipelineError::config_validation(
            "environment.wsl_mount_root",
            format!("must be absolute, got '{}'", root.display()),
        ));
    }
    Ok(())
}
