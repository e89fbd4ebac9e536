//! Path notation of the environment that executes the stages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How corpus paths must be written for the stage programs to find them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathStyle {
    /// Detect from the running environment
    #[default]
    Auto,
    /// Paths are used as written
    Native,
    /// Windows Subsystem for Linux (`/mnt/c/...`)
    Wsl,
    /// MSYS2 / Git Bash (`/c/...`)
    Msys,
    /// Cygwin (`/cygdrive/c/...`)
    Cygwin,
}

impl PathStyle {
    pub const ALL: [PathStyle; 5] = [
        PathStyle::Auto,
        PathStyle::Native,
        PathStyle::Wsl,
        PathStyle::Msys,
        PathStyle::Cygwin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PathStyle::Auto => "auto",
            PathStyle::Native => "native",
            PathStyle::Wsl => "wsl",
            PathStyle::Msys => "msys",
            PathStyle::Cygwin => "cygwin",
        }
    }
}

impl fmt::Display for PathStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(PathStyle::Auto),
            "native" => Ok(PathStyle::Native),
            "wsl" => Ok(PathStyle::Wsl),
            "msys" | "mingw" | "gitbash" => Ok(PathStyle::Msys),
            "cygwin" => Ok(PathStyle::Cygwin),
            other => Err(format!("unknown path style '{other}'")),
        }
    }
}
