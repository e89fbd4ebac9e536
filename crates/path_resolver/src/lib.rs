//! # Path Resolver
//!
//! Translates the corpus directory from the notation it was written in
//! (typically a Windows drive path) to the notation understood by the
//! environment that executes the stage programs.
//!
//! Responsibilities:
//! - Detect the execution environment (`ExecutionEnv`)
//! - Turn `PathStyle::Auto` into a concrete style
//! - Apply the drive-path translation rule
//!
//! # Example
//!
//! ```
//! use contracts::PathStyle;
//! use path_resolver::{resolve, ExecutionEnv};
//! use std::path::Path;
//!
//! let resolved = resolve(
//!     r"C:\Users\ASUS\Data",
//!     PathStyle::Wsl,
//!     Path::new("/mnt"),
//!     &ExecutionEnv::default(),
//! )
//! .unwrap();
//! assert_eq!(resolved.resolved, Path::new("/mnt/c/Users/ASUS/Data"));
//! ```

mod env;
mod translate;

pub use contracts::PathStyle;
pub use env::ExecutionEnv;
pub use translate::{is_drive_path, translate};

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

/// Path resolution errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("path is empty")]
    Empty,

    #[error("WSL mount root must be absolute, got '{}'", .0.display())]
    MountRootNotAbsolute(PathBuf),
}

/// A path in both notations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    /// As written in the configuration
    pub original: String,
    /// As handed to the stage programs
    pub resolved: PathBuf,
    /// Style actually applied (never `Auto`)
    pub style: PathStyle,
}

impl ResolvedPath {
    /// Whether translation changed the path
    pub fn translated(&self) -> bool {
        Path::new(&self.original) != self.resolved
    }
}

/// Resolve `raw` for the given style, detecting the environment if needed
pub fn resolve(
    raw: &str,
    style: PathStyle,
    wsl_mount_root: &Path,
    env: &ExecutionEnv,
) -> Result<ResolvedPath, ResolveError> {
    if raw.trim().is_empty() {
        return Err(ResolveError::Empty);
    }

    let effective = match style {
        PathStyle::Auto => {
            let detected = env.path_style();
            debug!(detected = %detected, "Path style detected from environment");
            detected
        }
        explicit => explicit,
    };

    if effective == PathStyle::Wsl && !wsl_mount_root.has_root() {
        return Err(ResolveError::MountRootNotAbsolute(
            wsl_mount_root.to_path_buf(),
        ));
    }

    let resolved = translate(raw, effective, wsl_mount_root);
    let result = ResolvedPath {
        original: raw.to_string(),
        resolved,
        style: effective,
    };

    if result.translated() {
        info!(
            original = %result.original,
            resolved = %result.resolved.display(),
            style = %effective,
            "Translated corpus path"
        );
    }

    Ok(result)
}
