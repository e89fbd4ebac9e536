//! Stage invocation types
//!
//! A `StageInvocation` is everything a runner needs to start one external
//! program; a `StageOutcome` is what comes back once it terminated.

use serde::Serialize;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Position of a stage in the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    /// Stage 1: builds the tokenizer artifact
    Builder,
    /// Stage 2: validates the artifact
    Validator,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Builder => "builder",
            StageKind::Validator => "validator",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a stage's standard output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StdoutTarget {
    /// Shared with the driver's own stdout
    Inherit,
    /// Truncated and replaced by the stage output (shell `>` redirection)
    File(PathBuf),
}

/// One external program to run
#[derive(Debug, Clone, PartialEq)]
pub struct StageInvocation {
    pub stage: StageKind,

    /// Human readable stage name ("tokenizer", "validation")
    pub label: String,

    /// Interpreter in front of the program, if any
    pub interpreter: Option<String>,

    pub program: PathBuf,

    pub args: Vec<OsString>,

    pub stdout: StdoutTarget,

    /// File the stage is expected to leave behind
    pub produces: PathBuf,

    /// None = wait until the child exits
    pub timeout: Option<Duration>,
}

impl StageInvocation {
    /// Executable and full argument vector, in spawn order
    pub fn argv(&self) -> (OsString, Vec<OsString>) {
        match &self.interpreter {
            Some(interpreter) => {
                let mut args = Vec::with_capacity(self.args.len() + 1);
                args.push(self.program.clone().into_os_string());
                args.extend(self.args.iter().cloned());
                (OsString::from(interpreter), args)
            }
            None => (self.program.clone().into_os_string(), self.args.clone()),
        }
    }

    /// Shell-like rendering for logs and `info` output
    pub fn command_line(&self) -> String {
        let (program, args) = self.argv();
        let mut line = quote(&program.to_string_lossy());
        for arg in &args {
            line.push(' ');
            line.push_str(&quote(&arg.to_string_lossy()));
        }
        if let StdoutTarget::File(path) = &self.stdout {
            line.push_str(" > ");
            line.push_str(&quote(&path.to_string_lossy()));
        }
        line
    }
}

fn quote(s: &str) -> String {
    if !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=@%+,".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

/// Result of a terminated stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: StageKind,

    /// Exit code, None when killed by a signal
    pub exit_code: Option<i32>,

    pub success: bool,

    #[serde(with = "duration_secs")]
    pub duration: Duration,
}

impl StageOutcome {
    pub fn succeeded(stage: StageKind, duration: Duration) -> Self {
        Self {
            stage,
            exit_code: Some(0),
            success: true,
            duration,
        }
    }

    pub fn failed(stage: StageKind, exit_code: Option<i32>, duration: Duration) -> Self {
        Self {
            stage,
            exit_code,
            success: false,
            duration,
        }
    }
}

pub(crate) mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_f64(d.as_secs_f64())
    }
}
