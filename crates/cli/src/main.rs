//! # tokpipe
//!
//! Command-line entry point.
//!
//! - Config loading and validation
//! - Pipeline run with interrupt handling
//! - Exit status mapped from `PipelineError`

mod cli;
mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use contracts::{PipelineError, EXIT_FAILURE};
use observability::ObservabilityConfig;
use tracing::debug;

use cli::{Cli, Commands};
use commands::{run_info, run_pipeline, run_validate};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("error: {e:#}");
        return ExitCode::from(EXIT_FAILURE);
    }

    debug!(version = env!("CARGO_PKG_VERSION"), "tokpipe starting");

    let result = match &cli.command {
        Commands::Run(args) => run_pipeline(args).await,
        Commands::Validate(args) => run_validate(args),
        Commands::Info(args) => run_info(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = exit_code_for(&e);
            debug!(exit_code = code, "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::from(code)
        }
    }
}

/// Exit status for a failed command
///
/// Driver errors keep their own mapping (stage exit code, 130 on interrupt).
fn exit_code_for(e: &anyhow::Error) -> u8 {
    e.downcast_ref::<PipelineError>()
        .map(PipelineError::exit_code)
        .unwrap_or(EXIT_FAILURE)
}

/// Initialize logging and metrics based on CLI options
fn init_logging(cli: &Cli) -> Result<()> {
    observability::init_with_config(ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.metrics_port != 0).then_some(cli.metrics_port),
        default_log_level: ObservabilityConfig::level_for(cli.verbose, cli.quiet).to_string(),
        ignore_env_filter: cli.quiet,
    })
}
