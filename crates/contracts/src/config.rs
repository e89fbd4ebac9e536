//! PipelineConfig - Config Loader output
//!
//! One immutable value describing a whole run: where the corpus lives, how to
//! invoke both stages and where their outputs land. `Default` describes the
//! standard project layout: Python stages under `tokens/`, outputs rewritten
//! in place on every run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::PathStyle;

/// Config schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub version: ConfigVersion,

    /// Execution environment (path notation of the stage programs)
    #[serde(default)]
    pub environment: EnvironmentConfig,

    /// Input corpus
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Stage 1: tokenizer builder
    #[serde(default)]
    pub builder: BuilderStageConfig,

    /// Stage 2: tokenizer validator
    #[serde(default)]
    pub validator: ValidatorStageConfig,

    /// Run behaviour
    #[serde(default)]
    pub run: RunConfig,
}

impl PipelineConfig {
    /// Declared path of the builder artifact
    pub fn artifact_path(&self) -> &PathBuf {
        &self.builder.output
    }

    /// Declared path of the validation results
    pub fn results_path(&self) -> &PathBuf {
        &self.validator.results
    }
}

/// Execution environment settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Path notation expected by the stage programs
    pub path_style: PathStyle,

    /// Where WSL mounts Windows drives
    pub wsl_mount_root: PathBuf,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            path_style: PathStyle::Auto,
            wsl_mount_root: PathBuf::from("/mnt"),
        }
    }
}

/// Input corpus settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Corpus directory as written by the user, possibly in Windows notation
    pub dir: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: r"C:\Users\ASUS\Desktop\LuminaLM\Data".to_string(),
        }
    }
}

/// Builder stage: reads the corpus, writes the tokenizer artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderStageConfig {
    /// Human readable name used in progress messages
    pub name: String,

    /// Interpreter used to run the program (empty = execute directly)
    pub interpreter: String,

    /// Stage program
    pub program: PathBuf,

    /// Flag that introduces the corpus directory
    pub input_flag: String,

    /// Flag that introduces the artifact path
    pub output_flag: String,

    /// Declared artifact path
    pub output: PathBuf,

    /// Extra arguments appended after the input/output pair
    pub extra_args: Vec<String>,
}

impl Default for BuilderStageConfig {
    fn default() -> Self {
        Self {
            name: "tokenizer".to_string(),
            interpreter: default_interpreter(),
            program: PathBuf::from("tokens/tokenizer.py"),
            input_flag: "--local_data_path".to_string(),
            output_flag: "--output_path".to_string(),
            output: PathBuf::from("tokens/tokenizer.json"),
            extra_args: Vec::new(),
        }
    }
}

/// Validator stage: reads the artifact, reports on stdout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorStageConfig {
    /// Human readable name used in progress messages
    pub name: String,

    /// Interpreter used to run the program (empty = execute directly)
    pub interpreter: String,

    /// Stage program
    pub program: PathBuf,

    /// Flag that introduces the artifact path
    pub input_flag: String,

    /// File receiving the stage's standard output
    pub results: PathBuf,

    /// Extra arguments appended after the input pair
    pub extra_args: Vec<String>,
}

impl Default for ValidatorStageConfig {
    fn default() -> Self {
        Self {
            name: "validation".to_string(),
            interpreter: default_interpreter(),
            program: PathBuf::from("tokens/validate_tokenizer.py"),
            input_flag: "--tokenizer_path".to_string(),
            results: PathBuf::from("validation_results.txt"),
            extra_args: Vec::new(),
        }
    }
}

/// Run behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Remove outputs left by a previous run before the builder starts
    ///
    /// Off by default: a failed run then leaves the previous outputs intact.
    pub clear_stale_outputs: bool,

    /// Per-stage timeout in seconds (0 = wait forever)
    pub stage_timeout_secs: u64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            clear_stale_outputs: false,
            stage_timeout_secs: 0,
        }
    }
}

impl RunConfig {
    pub fn stage_timeout(&self) -> Option<Duration> {
        if self.stage_timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.stage_timeout_secs))
        }
    }
}

fn default_interpreter() -> String {
    "python3".to_string()
}
