//! Config parsing
//!
//! TOML (primary) and JSON formats. Every table and key is optional; missing
//! ones fall back to the built-in defaults.

use contracts::{PipelineConfig, PipelineError};

/// Configuration file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML (recommended)
    Toml,
    /// JSON
    Json,
}

impl ConfigFormat {
    /// Infer the format from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse TOML configuration
pub fn parse_toml(content: &str) -> Result<PipelineConfig, PipelineError> {
    toml::from_str(content).map_err(|e| PipelineError::ConfigParse {
        message: format!("TOML parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse JSON configuration
pub fn parse_json(content: &str) -> Result<PipelineConfig, PipelineError> {
    serde_json::from_str(content).map_err(|e| PipelineError::ConfigParse {
        message: format!("JSON parse error: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Parse according to format
pub fn parse(content: &str, format: ConfigFormat) -> Result<PipelineConfig, PipelineError> {
    match format {
        ConfigFormat::Toml => parse_toml(content),
        ConfigFormat::Json => parse_json(content),
    }
}
