//! Pipeline driver implementation.

use std::ffi::OsString;
use std::time::Instant;

use contracts::{
    PipelineConfig, PipelineError, StageInvocation, StageKind, StageOutcome, StageRunner,
    StdoutTarget,
};
use observability::{record_pipeline_outcome, record_stage_completed, record_stage_error};
use path_resolver::{resolve, ExecutionEnv, ResolveError};
use tracing::{info, instrument, warn};

use crate::artifact::{clear_stale_outputs, require_output, require_program};
use crate::report::{PipelineReport, RunPlan};
use crate::state::{DriverState, Phase};

/// Two-stage pipeline driver
pub struct PipelineDriver<R> {
    /// Immutable for the driver's lifetime
    config: PipelineConfig,
    runner: R,
    /// Decides the corpus path notation when the style is `auto`
    env: ExecutionEnv,
    state: DriverState,
    /// Print "Running ... script..." lines on stdout
    progress: bool,
}

impl<R: StageRunner> PipelineDriver<R> {
    /// Create a driver for the current execution environment
    pub fn new(config: PipelineConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            env: ExecutionEnv::detect(),
            state: DriverState::Idle,
            progress: false,
        }
    }

    /// Replace the detected execution environment
    pub fn with_env(mut self, env: ExecutionEnv) -> Self {
        self.env = env;
        self
    }

    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn env(&self) -> &ExecutionEnv {
        &self.env
    }

    /// Current state; terminal once `run` returned
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Resolve the corpus path and build both invocations
    ///
    /// Pure: no filesystem access.
    pub fn plan(&self) -> Result<RunPlan, PipelineError> {
        let env_config = &self.config.environment;
        let corpus = resolve(
            &self.config.corpus.dir,
            env_config.path_style,
            &env_config.wsl_mount_root,
            &self.env,
        )
        .map_err(|e| {
            let field = match e {
                ResolveError::Empty => "corpus.dir",
                ResolveError::MountRootNotAbsolute(_) => "environment.wsl_mount_root",
            };
            PipelineError::config_validation(field, e.to_string())
        })?;

        let timeout = self.config.run.stage_timeout();

        let builder = &self.config.builder;
        let mut builder_args: Vec<OsString> = vec![
            builder.input_flag.clone().into(),
            corpus.resolved.clone().into_os_string(),
            builder.output_flag.clone().into(),
            builder.output.clone().into_os_string(),
        ];
        builder_args.extend(builder.extra_args.iter().map(OsString::from));

        let validator = &self.config.validator;
        let mut validator_args: Vec<OsString> = vec![
            validator.input_flag.clone().into(),
            builder.output.clone().into_os_string(),
        ];
        validator_args.extend(validator.extra_args.iter().map(OsString::from));

        Ok(RunPlan {
            builder: StageInvocation {
                stage: StageKind::Builder,
                label: builder.name.clone(),
                interpreter: interpreter(&builder.interpreter),
                program: builder.program.clone(),
                args: builder_args,
                stdout: StdoutTarget::Inherit,
                produces: builder.output.clone(),
                timeout,
            },
            validator: StageInvocation {
                stage: StageKind::Validator,
                label: validator.name.clone(),
                interpreter: interpreter(&validator.interpreter),
                program: validator.program.clone(),
                args: validator_args,
                stdout: StdoutTarget::File(validator.results.clone()),
                produces: validator.results.clone(),
                timeout,
            },
            corpus,
        })
    }

    /// Both stage programs must exist before anything runs
    pub fn check_prerequisites(&self) -> Result<(), PipelineError> {
        require_program(StageKind::Builder, &self.config.builder.program)?;
        require_program(StageKind::Validator, &self.config.validator.program)
    }

    /// Run the whole pipeline
    ///
    /// On return `state()` is `Success` or `Abort { at }`.
    #[instrument(
        name = "pipeline_run",
        skip(self),
        fields(runner = %self.runner.name())
    )]
    pub async fn run(&mut self) -> Result<PipelineReport, PipelineError> {
        let start = Instant::now();
        self.state.enter(Phase::Start);

        let result = self.execute(start).await;
        self.state.finish(result.is_ok());

        match &result {
            Ok(report) => {
                info!(
                    artifact = %report.artifact.display(),
                    results = %report.results.display(),
                    duration_secs = report.duration.as_secs_f64(),
                    "Pipeline succeeded"
                );
                record_pipeline_outcome("success", start.elapsed());
            }
            Err(e) => {
                warn!(state = %self.state, error = %e, "Pipeline aborted");
                record_pipeline_outcome(e.kind(), start.elapsed());
            }
        }

        result
    }

    async fn execute(&mut self, start: Instant) -> Result<PipelineReport, PipelineError> {
        let plan = self.plan()?;

        self.state.enter(Phase::CheckStage1Exists);
        require_program(StageKind::Builder, &plan.builder.program)?;

        self.state.enter(Phase::CheckStage2Exists);
        require_program(StageKind::Validator, &plan.validator.program)?;

        self.state.enter(Phase::RunStage1);
        let cleared = if self.config.run.clear_stale_outputs {
            clear_stale_outputs(&[
                plan.builder.produces.as_path(),
                plan.validator.produces.as_path(),
            ])?
        } else {
            Vec::new()
        };
        let builder = self.run_stage(&plan.builder).await?;

        self.state.enter(Phase::CheckArtifact1);
        require_output(StageKind::Builder, &plan.builder.produces)?;

        self.state.enter(Phase::RunStage2);
        let validator = self.run_stage(&plan.validator).await?;

        self.state.enter(Phase::CheckArtifact2);
        require_output(StageKind::Validator, &plan.validator.produces)?;

        Ok(PipelineReport {
            corpus_dir: plan.corpus.resolved,
            path_style: plan.corpus.style,
            builder_label: plan.builder.label,
            artifact: plan.builder.produces,
            validator_label: plan.validator.label,
            results: plan.validator.produces,
            stages: vec![builder, validator],
            cleared,
            duration: start.elapsed(),
        })
    }

    /// Run one stage; a non-zero exit becomes `StageFailed`
    async fn run_stage(&self, invocation: &StageInvocation) -> Result<StageOutcome, PipelineError> {
        if self.progress {
            println!("Running {} script...", invocation.label);
        }

        let outcome = self.runner.run(invocation).await.inspect_err(|e| {
            record_stage_error(invocation.stage, e.kind());
        })?;
        record_stage_completed(&outcome);

        if !outcome.success {
            return Err(PipelineError::StageFailed {
                stage: outcome.stage,
                code: outcome.exit_code,
            });
        }
        Ok(outcome)
    }
}

/// Empty interpreter: execute the program directly
fn interpreter(configured: &str) -> Option<String> {
    let trimmed = configured.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
