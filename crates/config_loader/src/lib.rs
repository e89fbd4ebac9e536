//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Generate `PipelineConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("tokpipe.toml")).unwrap();
//! println!("Corpus: {}", config.corpus.dir);
//! ```

mod parser;
mod validator;

pub use contracts::PipelineConfig;
pub use parser::ConfigFormat;

use contracts::PipelineError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<PipelineConfig, PipelineError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<PipelineConfig, PipelineError> {
        Self::parse_and_validate(content, format)
    }

    /// Load `path` when given, built-in defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<PipelineConfig, PipelineError> {
        match path {
            Some(path) => Self::load_from_path(path),
            None => Ok(PipelineConfig::default()),
        }
    }

    /// Validate a config assembled in code (defaults plus overrides)
    pub fn validate(config: &PipelineConfig) -> Result<(), PipelineError> {
        validator::validate(config)
    }

    /// Serialize PipelineConfig to TOML string
    pub fn to_toml(config: &PipelineConfig) -> Result<String, PipelineError> {
        toml::to_string_pretty(config)
            .map_err(|e| PipelineError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize PipelineConfig to JSON string
    pub fn to_json(config: &PipelineConfig) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| PipelineError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, PipelineError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            PipelineError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            PipelineError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, PipelineError> {
        Ok(std::fs::read_to_string(path)?)
    }

    /// Parse and validate configuration content
    fn parse_and_validate(
        content: &str,
        format: ConfigFormat,
    ) -> Result<PipelineConfig, PipelineError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }
}
