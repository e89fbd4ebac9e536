//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::PathStyle;
use std::path::PathBuf;

/// tokpipe - tokenizer build / validate pipeline driver
#[derive(Parser, Debug)]
#[command(
    name = "tokpipe",
    author,
    version,
    about = "Tokenizer build / validate pipeline driver",
    long_about = "Runs the tokenizer builder over a corpus directory, checks that it \n\
                  produced its artifact, then runs the validator on that artifact and \n\
                  captures its report into a results file. Every failure is fatal."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "TOKPIPE_VERBOSE")]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (logs go to stderr)
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "TOKPIPE_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value = "0", global = true, env = "TOKPIPE_METRICS_PORT")]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline
    Run(RunArgs),

    /// Validate a configuration file without running
    Validate(ValidateArgs),

    /// Show resolved configuration, environment and stage commands
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone, Default)]
pub struct RunArgs {
    /// Configuration file (TOML or JSON); built-in defaults when omitted
    #[arg(short, long, env = "TOKPIPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the corpus directory
    #[arg(long, env = "TOKPIPE_CORPUS_DIR")]
    pub corpus_dir: Option<String>,

    /// Override the path notation: auto, native, wsl, msys, cygwin
    #[arg(long, env = "TOKPIPE_PATH_STYLE")]
    pub path_style: Option<PathStyle>,

    /// Per-stage timeout in seconds (0 = none)
    #[arg(long, env = "TOKPIPE_STAGE_TIMEOUT")]
    pub stage_timeout: Option<u64>,

    /// Delete outputs of a previous run before the builder starts
    #[arg(long)]
    pub clear_stale: bool,

    /// Resolve paths and check prerequisites, run nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Configuration file to validate
    #[arg(short, long, env = "TOKPIPE_CONFIG")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Configuration file; built-in defaults when omitted
    #[arg(short, long, env = "TOKPIPE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_run_without_arguments() {
        let cli = Cli::try_parse_from(["tokpipe", "run"]).unwrap();
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert!(!args.dry_run);
        assert!(!args.json);
        assert!(!args.clear_stale);
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "tokpipe",
            "-vv",
            "run",
            "--corpus-dir",
            r"D:\corpus",
            "--path-style",
            "gitbash",
            "--stage-timeout",
            "60",
            "--clear-stale",
            "--json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.corpus_dir.as_deref(), Some(r"D:\corpus"));
        assert_eq!(args.path_style, Some(PathStyle::Msys));
        assert_eq!(args.stage_timeout, Some(60));
        assert!(args.clear_stale);
        assert!(args.json);
    }

    #[test]
    fn test_unknown_path_style_rejected() {
        assert!(Cli::try_parse_from(["tokpipe", "run", "--path-style", "dos"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tokpipe", "-q", "-v", "info"]).is_err());
    }
}
