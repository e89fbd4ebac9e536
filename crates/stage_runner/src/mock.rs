//! Mock stage runner
//!
//! Scripted stand-in for `ProcessRunner`, supports injecting every failure
//! the driver has to guard against. Declared outputs are written to the real
//! filesystem so the driver's existence checks see them.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use contracts::{
    PipelineError, StageInvocation, StageKind, StageOutcome, StageRunner, StdoutTarget,
};
use tracing::{debug, instrument};

/// Scripted behaviour of one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockStageBehavior {
    /// Exit code reported by the stage
    pub exit_code: i32,
    /// Write the declared artifact (stages whose stdout goes to the terminal)
    pub write_artifact: bool,
    /// Content of the declared artifact
    pub artifact_content: String,
    /// Text written into a redirected stdout file
    pub stdout: String,
    /// Create the redirected stdout file at all
    pub create_stdout_file: bool,
    /// Fail before the stage starts (program cannot be executed)
    pub fail_spawn: bool,
}

impl Default for MockStageBehavior {
    fn default() -> Self {
        Self {
            exit_code: 0,
            write_artifact: true,
            artifact_content: "{\"model\":{\"type\":\"BPE\"}}".to_string(),
            stdout: "OK\n".to_string(),
            create_stdout_file: true,
            fail_spawn: false,
        }
    }
}

impl MockStageBehavior {
    /// Exits 0 and produces everything it declares
    pub fn succeed() -> Self {
        Self::default()
    }

    /// Exits with `code`, outputs untouched
    pub fn exit(code: i32) -> Self {
        Self {
            exit_code: code,
            write_artifact: false,
            stdout: String::new(),
            ..Default::default()
        }
    }

    /// Exits 0 without writing its artifact
    pub fn without_artifact() -> Self {
        Self {
            write_artifact: false,
            ..Default::default()
        }
    }

    /// Exits 0 but the redirected stdout file never appears
    pub fn without_stdout_file() -> Self {
        Self {
            create_stdout_file: false,
            ..Default::default()
        }
    }

    pub fn spawn_failure() -> Self {
        Self {
            fail_spawn: true,
            ..Default::default()
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

/// Mock runner configuration
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    pub builder: MockStageBehavior,
    pub validator: MockStageBehavior,
}

impl MockConfig {
    fn behavior(&self, stage: StageKind) -> &MockStageBehavior {
        match stage {
            StageKind::Builder => &self.builder,
            StageKind::Validator => &self.validator,
        }
    }
}

/// Mock stage runner
pub struct MockStageRunner {
    config: MockConfig,
    /// Every invocation received, in order
    invocations: Mutex<Vec<StageInvocation>>,
}

impl MockStageRunner {
    /// Runner whose stages all succeed
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            invocations: Mutex::new(Vec::new()),
        }
    }

    /// Invocations received so far
    pub fn invocations(&self) -> Vec<StageInvocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Stages invoked so far, in order
    pub fn invoked_stages(&self) -> Vec<StageKind> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(|inv| inv.stage)
            .collect()
    }

    /// Number of invocations per stage
    pub fn invocation_counts(&self) -> HashMap<StageKind, usize> {
        let mut counts = HashMap::new();
        for stage in self.invoked_stages() {
            *counts.entry(stage).or_insert(0) += 1;
        }
        counts
    }

    fn simulate_outputs(
        invocation: &StageInvocation,
        behavior: &MockStageBehavior,
    ) -> Result<(), PipelineError> {
        if let StdoutTarget::File(path) = &invocation.stdout {
            if behavior.create_stdout_file {
                fs::write(path, &behavior.stdout).map_err(|source| {
                    PipelineError::ResultsRedirect {
                        path: path.clone(),
                        source,
                    }
                })?;
            }
        }

        let redirected_to_artifact =
            matches!(&invocation.stdout, StdoutTarget::File(path) if *path == invocation.produces);
        if behavior.write_artifact && !redirected_to_artifact {
            fs::write(&invocation.produces, &behavior.artifact_content)?;
        }

        Ok(())
    }
}

impl Default for MockStageRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl StageRunner for MockStageRunner {
    fn name(&self) -> &str {
        "mock"
    }

    #[instrument(name = "mock_runner_run", skip(self, invocation), fields(stage = %invocation.stage))]
    async fn run(&self, invocation: &StageInvocation) -> Result<StageOutcome, PipelineError> {
        self.invocations.lock().unwrap().push(invocation.clone());
        let behavior = self.config.behavior(invocation.stage);

        if behavior.fail_spawn {
            return Err(PipelineError::StageSpawn {
                stage: invocation.stage,
                program: invocation.program.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "mock spawn failure"),
            });
        }

        Self::simulate_outputs(invocation, behavior)?;
        debug!(exit_code = behavior.exit_code, "Mock stage finished");

        let duration = Duration::from_millis(1);
        Ok(if behavior.exit_code == 0 {
            StageOutcome::succeeded(invocation.stage, duration)
        } else {
            StageOutcome::failed(invocation.stage, Some(behavior.exit_code), duration)
        })
    }
}
