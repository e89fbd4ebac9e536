//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::PipelineConfig;
use serde::Serialize;
use stage_runner::ProcessRunner;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    corpus_dir: String,
    path_style: String,
    builder_program: String,
    validator_program: String,
    artifact: String,
    results: String,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: (!warnings.is_empty()).then_some(warnings),
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    corpus_dir: config.corpus.dir.clone(),
                    path_style: config.environment.path_style.to_string(),
                    builder_program: config.builder.program.display().to_string(),
                    validator_program: config.validator.program.display().to_string(),
                    artifact: config.artifact_path().display().to_string(),
                    results: config.results_path().display().to_string(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Non-fatal issues: things that will only fail once the pipeline runs
fn collect_warnings(config: &PipelineConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    for (name, program) in [
        (&config.builder.name, &config.builder.program),
        (&config.validator.name, &config.validator.program),
    ] {
        if !program.is_file() {
            warnings.push(format!(
                "{} program not found (relative to the current directory): {}",
                name,
                program.display()
            ));
        }
    }

    let mut interpreters: Vec<&str> = [
        config.builder.interpreter.trim(),
        config.validator.interpreter.trim(),
    ]
    .into_iter()
    .filter(|i| !i.is_empty())
    .collect();
    interpreters.dedup();
    for interpreter in interpreters {
        if !ProcessRunner::interpreter_available(interpreter) {
            warnings.push(format!("interpreter '{interpreter}' is not runnable"));
        }
    }

    if let Some(parent) = config.results_path().parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            warnings.push(format!(
                "results directory does not exist, the redirection will fail: {}",
                parent.display()
            ));
        }
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Corpus: {} ({})", summary.corpus_dir, summary.path_style);
            println!("  Builder: {}", summary.builder_program);
            println!("  Validator: {}", summary.validator_program);
            println!("  Artifact: {}", summary.artifact);
            println!("  Results: {}", summary.results);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
