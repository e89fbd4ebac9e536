//! `run` command implementation.

use anyhow::{Context, Result};
use contracts::{PipelineConfig, PipelineError, StageRunner};
use driver::{PipelineDriver, RunPlan};
use stage_runner::ProcessRunner;
use tracing::{info, warn};

use super::load_config;
use crate::cli::RunArgs;

/// Execute the `run` command
pub async fn run_pipeline(args: &RunArgs) -> Result<()> {
    let config = build_config(args)?;

    let mut driver = PipelineDriver::new(config, ProcessRunner::new()).with_progress(!args.json);
    let plan = driver.plan().context("Failed to resolve corpus path")?;

    info!(
        corpus = %plan.corpus.original,
        resolved = %plan.corpus.resolved.display(),
        path_style = %plan.corpus.style,
        artifact = %plan.builder.produces.display(),
        results = %plan.validator.produces.display(),
        "Configuration loaded"
    );

    // Dry run - resolve and check, run nothing
    if args.dry_run {
        driver.check_prerequisites()?;
        warn_missing_interpreters(&plan);
        info!("Dry run mode - prerequisites present, exiting");
        return print_plan(&plan, args.json);
    }

    let shutdown_signal = setup_shutdown_signal();

    info!(runner = driver.runner().name(), "Starting pipeline...");

    tokio::select! {
        result = driver.run() => {
            let report = result.context("pipeline aborted")?;
            if args.json {
                let json = serde_json::to_string_pretty(&report)
                    .context("Failed to serialize run report")?;
                println!("{json}");
            } else {
                report.print_summary();
            }
        }
        _ = shutdown_signal => {
            // Dropping the run future kills the running stage
            warn!("Received shutdown signal, stopping pipeline...");
            return Err(PipelineError::Interrupted.into());
        }
    }

    Ok(())
}

/// Config file (or defaults) with command-line overrides applied
fn build_config(args: &RunArgs) -> Result<PipelineConfig> {
    let mut config = load_config(args.config.as_deref())?;

    if let Some(ref dir) = args.corpus_dir {
        info!(corpus = %dir, "Overriding corpus directory from CLI");
        config.corpus.dir = dir.clone();
    }
    if let Some(style) = args.path_style {
        info!(path_style = %style, "Overriding path style from CLI");
        config.environment.path_style = style;
    }
    if let Some(secs) = args.stage_timeout {
        config.run.stage_timeout_secs = secs;
    }
    if args.clear_stale {
        config.run.clear_stale_outputs = true;
    }

    config_loader::ConfigLoader::validate(&config).context("Invalid configuration")?;
    Ok(config)
}

fn warn_missing_interpreters(plan: &RunPlan) {
    for inv in plan.stages() {
        if let Some(ref interpreter) = inv.interpreter {
            if !ProcessRunner::interpreter_available(interpreter) {
                warn!(
                    stage = %inv.stage,
                    interpreter = %interpreter,
                    "Interpreter not runnable, the stage will fail to start"
                );
            }
        }
    }
}

fn print_plan(plan: &RunPlan, json: bool) -> Result<()> {
    let summary = plan.summary();
    if json {
        let json =
            serde_json::to_string_pretty(&summary).context("Failed to serialize run plan")?;
        println!("{json}");
        return Ok(());
    }

    println!("\n=== Run Plan ===\n");
    println!("Corpus: {}", summary.corpus_dir);
    println!(
        "  resolved ({}): {}",
        summary.path_style,
        summary.resolved_corpus_dir.display()
    );
    for stage in &summary.stages {
        println!("\n{} ({}):", stage.label, stage.stage);
        println!("  $ {}", stage.command);
        println!("  produces: {}", stage.produces.display());
    }
    println!();
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
