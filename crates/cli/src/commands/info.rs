//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::PipelineConfig;
use driver::{PipelineDriver, PlanSummary};
use path_resolver::ExecutionEnv;
use serde::Serialize;
use stage_runner::ProcessRunner;
use tracing::info;

use super::load_config;
use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    config_source: String,
    environment: EnvironmentInfo,
    plan: PlanSummary,
    interpreters: Vec<InterpreterInfo>,
    config: PipelineConfig,
}

#[derive(Serialize)]
struct EnvironmentInfo {
    detected_path_style: String,
    windows_host: bool,
    wsl: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    msystem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ostype: Option<String>,
}

#[derive(Serialize)]
struct InterpreterInfo {
    stage: String,
    interpreter: String,
    available: bool,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!("Collecting pipeline info");

    let config = load_config(args.config.as_deref())?;
    let info = build_info(config, args)?;

    if args.json {
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_info(&info)?;
    }

    Ok(())
}

fn build_info(config: PipelineConfig, args: &InfoArgs) -> Result<ConfigInfo> {
    let driver = PipelineDriver::new(config, ProcessRunner::new());
    let plan = driver.plan().context("Failed to resolve corpus path")?;

    let interpreters = plan
        .stages()
        .into_iter()
        .filter_map(|inv| {
            inv.interpreter.as_ref().map(|interpreter| InterpreterInfo {
                stage: inv.label.clone(),
                interpreter: interpreter.clone(),
                available: ProcessRunner::interpreter_available(interpreter),
            })
        })
        .collect();

    Ok(ConfigInfo {
        config_source: args
            .config
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "built-in defaults".to_string()),
        environment: environment_info(driver.env()),
        plan: plan.summary(),
        interpreters,
        config: driver.config().clone(),
    })
}

fn environment_info(env: &ExecutionEnv) -> EnvironmentInfo {
    EnvironmentInfo {
        detected_path_style: env.path_style().to_string(),
        windows_host: env.windows_host,
        wsl: env.wsl,
        msystem: env.msystem.clone(),
        ostype: env.ostype.clone(),
    }
}

fn print_info(info: &ConfigInfo) -> Result<()> {
    println!("\n=== Pipeline Info ===\n");
    println!("Config: {}", info.config_source);

    let env = &info.environment;
    println!("\nEnvironment:");
    println!("  Detected path style: {}", env.detected_path_style);
    println!("  WSL: {}", env.wsl);
    if let Some(ref msystem) = env.msystem {
        println!("  MSYSTEM: {}", msystem);
    }
    if let Some(ref ostype) = env.ostype {
        println!("  OSTYPE: {}", ostype);
    }

    let plan = &info.plan;
    println!("\nCorpus:");
    println!("  Configured: {}", plan.corpus_dir);
    println!(
        "  Resolved ({}): {}",
        plan.path_style,
        plan.resolved_corpus_dir.display()
    );

    println!("\nStages:");
    for stage in &plan.stages {
        println!("  - {} ({})", stage.label, stage.stage);
        println!("    $ {}", stage.command);
        println!("    produces: {}", stage.produces.display());
    }

    if !info.interpreters.is_empty() {
        println!("\nInterpreters:");
        for interpreter in &info.interpreters {
            let mark = if interpreter.available { "✓" } else { "✗" };
            println!(
                "  {} {} ({})",
                mark, interpreter.interpreter, interpreter.stage
            );
        }
    }

    let toml = config_loader::ConfigLoader::to_toml(&info.config)
        .context("Failed to render configuration")?;
    println!("\nEffective configuration:\n");
    println!("{}", toml);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_for_defaults() {
        let args = InfoArgs {
            config: None,
            json: true,
        };
        let info = build_info(PipelineConfig::default(), &args).unwrap();

        assert_eq!(info.config_source, "built-in defaults");
        assert_eq!(info.plan.stages.len(), 2);
        assert_eq!(info.interpreters.len(), 2);
        assert!(info.plan.stages[1]
            .command
            .ends_with("> validation_results.txt"));

        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["config"]["builder"]["name"], "tokenizer");
    }

    #[test]
    fn test_info_without_interpreters() {
        let mut config = PipelineConfig::default();
        config.builder.interpreter = String::new();
        config.validator.interpreter = String::new();
        let args = InfoArgs {
            config: None,
            json: false,
        };

        let info = build_info(config, &args).unwrap();
        assert!(info.interpreters.is_empty());
        assert!(info.plan.stages[0].command.starts_with("tokens/tokenizer.py"));
    }
}
