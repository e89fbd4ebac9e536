//! Child process runner

use std::ffi::OsStr;
use std::fs::File;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use contracts::{PipelineError, StageInvocation, StageOutcome, StageRunner, StdoutTarget};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Runs stages as real child processes
///
/// stdin and stderr are shared with the driver. stdout is either shared or
/// redirected into a file that is truncated first, like a shell `>`.
/// Children are killed if the run future is dropped (interrupt).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Check whether `interpreter --version` can be executed
    pub fn interpreter_available(interpreter: impl AsRef<OsStr>) -> bool {
        std::process::Command::new(interpreter)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn stdout_for(invocation: &StageInvocation) -> Result<Stdio, PipelineError> {
        match &invocation.stdout {
            StdoutTarget::Inherit => Ok(Stdio::inherit()),
            StdoutTarget::File(path) => {
                let file = File::create(path).map_err(|source| PipelineError::ResultsRedirect {
                    path: path.clone(),
                    source,
                })?;
                debug!(path = %path.display(), "Redirecting stage stdout");
                Ok(Stdio::from(file))
            }
        }
    }
}

impl StageRunner for ProcessRunner {
    fn name(&self) -> &str {
        "process"
    }

    #[instrument(
        name = "process_runner_run",
        skip(self, invocation),
        fields(stage = %invocation.stage, label = %invocation.label)
    )]
    async fn run(&self, invocation: &StageInvocation) -> Result<StageOutcome, PipelineError> {
        let stage = invocation.stage;
        let (program, args) = invocation.argv();
        let stdout = Self::stdout_for(invocation)?;

        let mut cmd = Command::new(&program);
        cmd.args(&args)
            .stdin(Stdio::inherit())
            .stdout(stdout)
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        info!(command = %invocation.command_line(), "Spawning stage");

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|source| PipelineError::StageSpawn {
            stage,
            program: PathBuf::from(&program),
            source,
        })?;
        // Release the parent's copy of the redirected stdout handle
        drop(cmd);

        debug!(pid = ?child.id(), "Stage started");

        let status = match invocation.timeout {
            Some(limit) => match tokio::time::timeout(limit, child.wait()).await {
                Ok(status) => status?,
                Err(_) => {
                    warn!(timeout_secs = limit.as_secs(), "Stage timed out, killing");
                    if let Err(e) = child.kill().await {
                        warn!(error = %e, "Failed to kill timed out stage");
                    }
                    return Err(PipelineError::StageTimedOut { stage, after: limit });
                }
            },
            None => child.wait().await?,
        };

        let duration = start.elapsed();
        let outcome = if status.success() {
            StageOutcome::succeeded(stage, duration)
        } else {
            StageOutcome::failed(stage, status.code(), duration)
        };

        info!(
            exit_code = ?outcome.exit_code,
            success = outcome.success,
            duration_secs = duration.as_secs_f64(),
            "Stage exited"
        );

        Ok(outcome)
    }
}
