//! # Observability
//!
//! Tracing and Prometheus metrics for the pipeline driver.
//!
//! - Tracing initialisation (pretty / compact / JSON), always on stderr so
//!   the driver's stdout stays reserved for progress messages and summaries
//! - Optional Prometheus exporter
//! - Stage / artifact / pipeline counters (see [`metrics`])
//!
//! ```ignore
//! observability::init_with_config(ObservabilityConfig {
//!     log_format: LogFormat::Compact,
//!     ..Default::default()
//! })?;
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub use crate::metrics::{
    record_artifact_check, record_pipeline_outcome, record_stage_completed, record_stage_error,
    ArtifactCheck,
};

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Level used when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Use `default_log_level` even if `RUST_LOG` is set (`--quiet`)
    pub ignore_env_filter: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            metrics_port: None,
            default_log_level: "info".to_string(),
            ignore_env_filter: false,
        }
    }
}

impl ObservabilityConfig {
    /// Level for `-v` / `-q` style flags
    pub fn level_for(verbose: u8, quiet: bool) -> &'static str {
        if quiet {
            return "warn";
        }
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    fn env_filter(&self) -> EnvFilter {
        if self.ignore_env_filter {
            return EnvFilter::new(&self.default_log_level);
        }
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.default_log_level))
    }
}

/// Log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// JSON structured logs
    Json,
    /// Human readable, multi-line
    #[default]
    Pretty,
    /// Single line
    Compact,
}

/// Initialise tracing and, if a port is configured, the Prometheus exporter
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    let fmt_layer = match config.log_format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().pretty().with_writer(std::io::stderr).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_writer(std::io::stderr).boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::debug!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// Install only the Prometheus recorder (tracing already set up elsewhere)
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
