//! # Integration Tests
//!
//! End-to-end tests: real child processes (shell stub stages) driven through
//! `ProcessRunner` and `PipelineDriver`.

#[cfg(test)]
mod contract_tests {
    use contracts::{PipelineConfig, PipelineError};

    #[test]
    fn test_default_config_validates() {
        assert!(config_loader::ConfigLoader::validate(&PipelineConfig::default()).is_ok());
    }

    #[test]
    fn test_exit_code_contract() {
        assert_eq!(PipelineError::Interrupted.exit_code(), 130);
        assert_eq!(
            PipelineError::ResultsNotProduced {
                path: "validation_results.txt".into()
            }
            .exit_code(),
            1
        );
    }
}

#[cfg(all(test, unix))]
mod e2e_tests {
    use std::path::{Path, PathBuf};

    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{PathStyle, PipelineConfig, PipelineError, StageKind};
    use driver::{DriverState, Phase, PipelineDriver};
    use path_resolver::ExecutionEnv;
    use stage_runner::ProcessRunner;
    use tempfile::{tempdir, TempDir};

    /// Writes a fixed artifact to the path after `--output_path` and records
    /// the corpus argument next to it.
    const BUILDER_STUB: &str = r#"
corpus=""
out=""
while [ $# -gt 0 ]; do
  case "$1" in
    --local_data_path) corpus="$2"; shift 2 ;;
    --output_path) out="$2"; shift 2 ;;
    *) shift ;;
  esac
done
printf '%s' "$corpus" > "$out.corpus"
printf '{"model":{"type":"BPE"}}' > "$out"
"#;

    const VALIDATOR_STUB: &str = "echo OK\n";

    /// Exits 0 without writing anything
    const SILENT_STUB: &str = "exit 0\n";

    struct Workspace {
        dir: TempDir,
        config: PipelineConfig,
    }

    impl Workspace {
        fn new(builder: &str, validator: &str) -> Self {
            let dir = tempdir().unwrap();
            let root = dir.path();
            std::fs::create_dir(root.join("corpus")).unwrap();

            let mut config = PipelineConfig::default();
            config.environment.path_style = PathStyle::Native;
            config.corpus.dir = root.join("corpus").display().to_string();
            config.builder.interpreter = "sh".into();
            config.builder.program = write_stub(root, "build.sh", builder);
            config.builder.output = root.join("tokenizer.json");
            config.validator.interpreter = "sh".into();
            config.validator.program = write_stub(root, "validate.sh", validator);
            config.validator.results = root.join("validation_results.txt");

            Self { dir, config }
        }

        fn driver(&self) -> PipelineDriver<ProcessRunner> {
            PipelineDriver::new(self.config.clone(), ProcessRunner::new())
                .with_env(ExecutionEnv::default())
        }

        fn artifact(&self) -> &Path {
            &self.config.builder.output
        }

        fn results(&self) -> &Path {
            &self.config.validator.results
        }

        /// Sorted (file name, content) of the workspace root
        fn snapshot(&self) -> Vec<(String, String)> {
            let mut entries: Vec<_> = std::fs::read_dir(self.dir.path())
                .unwrap()
                .map(|e| e.unwrap().path())
                .filter(|p| p.is_file())
                .map(|p| {
                    let name = p.file_name().unwrap().to_string_lossy().into_owned();
                    (name, std::fs::read_to_string(&p).unwrap())
                })
                .collect();
            entries.sort();
            entries
        }
    }

    fn write_stub(root: &Path, name: &str, body: &str) -> PathBuf {
        let path = root.join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    /// Stub stages: builder writes a fixed file, validator prints OK
    #[tokio::test]
    async fn test_e2e_stub_pipeline() {
        let ws = Workspace::new(BUILDER_STUB, VALIDATOR_STUB);
        let mut driver = ws.driver();

        let report = driver.run().await.unwrap();

        assert_eq!(driver.state(), DriverState::Success);
        assert_eq!(std::fs::read_to_string(ws.results()).unwrap(), "OK\n");
        assert!(ws.artifact().is_file());

        let summary = report.summary_lines().join("\n");
        assert!(summary.contains(&ws.artifact().display().to_string()));
        assert!(summary.contains(&ws.results().display().to_string()));
        assert!(report.stages.iter().all(|s| s.exit_code == Some(0)));
    }

    #[tokio::test]
    async fn test_e2e_second_run_is_idempotent() {
        let ws = Workspace::new(BUILDER_STUB, VALIDATOR_STUB);

        ws.driver().run().await.unwrap();
        let after_one = ws.snapshot();
        ws.driver().run().await.unwrap();

        assert_eq!(ws.snapshot(), after_one);
    }

    #[tokio::test]
    async fn test_e2e_missing_program_creates_nothing() {
        let ws = Workspace::new(BUILDER_STUB, VALIDATOR_STUB);
        std::fs::remove_file(&ws.config.builder.program).unwrap();
        let mut driver = ws.driver();

        let err = driver.run().await.unwrap_err();

        assert!(matches!(err, PipelineError::MissingPrerequisite { .. }));
        assert_ne!(err.exit_code(), 0);
        assert!(err.to_string().contains("build.sh"));
        assert!(!ws.artifact().exists());
        assert!(!ws.results().exists());
    }

    #[tokio::test]
    async fn test_e2e_builder_without_artifact() {
        // Validator would leave a marker if it ever ran
        let marker = "touch \"$(dirname \"$0\")/validator-ran\"\necho OK\n";
        let ws = Workspace::new(SILENT_STUB, marker);
        let mut driver = ws.driver();

        let err = driver.run().await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::ArtifactNotProduced {
                stage: StageKind::Builder,
                ..
            }
        ));
        assert_eq!(err.exit_code(), 1);
        assert!(!ws.dir.path().join("validator-ran").exists());
        assert_eq!(
            driver.state(),
            DriverState::Abort {
                at: Phase::CheckArtifact1
            }
        );
    }

    #[tokio::test]
    async fn test_e2e_validator_exit_code_propagates() {
        let ws = Workspace::new(BUILDER_STUB, "exit 5\n");
        let mut driver = ws.driver();

        let err = driver.run().await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::StageFailed {
                stage: StageKind::Validator,
                code: Some(5)
            }
        ));
        assert_eq!(err.exit_code(), 5);
    }

    #[tokio::test]
    async fn test_e2e_blocked_redirection() {
        let mut ws = Workspace::new(BUILDER_STUB, VALIDATOR_STUB);
        ws.config.validator.results = ws.dir.path().join("missing").join("results.txt");
        let mut driver = ws.driver();

        let err = driver.run().await.unwrap_err();

        assert!(matches!(err, PipelineError::ResultsRedirect { .. }), "{err}");
        assert_eq!(err.exit_code(), 1);
        assert!(ws.artifact().is_file());
    }

    #[tokio::test]
    async fn test_e2e_windows_corpus_translated() {
        let cases = [
            (PathStyle::Wsl, "/mnt/c/Users/ASUS/Desktop/LuminaLM/Data"),
            (PathStyle::Msys, "/c/Users/ASUS/Desktop/LuminaLM/Data"),
            (PathStyle::Cygwin, "/cygdrive/c/Users/ASUS/Desktop/LuminaLM/Data"),
        ];

        for (style, expected) in cases {
            let mut ws = Workspace::new(BUILDER_STUB, VALIDATOR_STUB);
            ws.config.corpus.dir = r"C:\Users\ASUS\Desktop\LuminaLM\Data".into();
            ws.config.environment.path_style = style;

            let report = ws.driver().run().await.unwrap();

            let recorded = ws.artifact().with_extension("json.corpus");
            assert_eq!(std::fs::read_to_string(recorded).unwrap(), expected);
            assert_eq!(report.path_style, style);
        }
    }

    #[tokio::test]
    async fn test_e2e_auto_style_follows_environment() {
        let mut ws = Workspace::new(BUILDER_STUB, VALIDATOR_STUB);
        ws.config.corpus.dir = r"D:\corpora\medical".into();
        ws.config.environment.path_style = PathStyle::Auto;
        let env = ExecutionEnv {
            msystem: Some("MINGW64".into()),
            ..Default::default()
        };

        let mut driver =
            PipelineDriver::new(ws.config.clone(), ProcessRunner::new()).with_env(env);
        driver.run().await.unwrap();

        let recorded = ws.artifact().with_extension("json.corpus");
        assert_eq!(
            std::fs::read_to_string(recorded).unwrap(),
            "/d/corpora/medical"
        );
    }

    #[tokio::test]
    async fn test_e2e_config_file_drives_run() {
        let ws = Workspace::new(BUILDER_STUB, VALIDATOR_STUB);
        let toml = ConfigLoader::to_toml(&ws.config).unwrap();
        let path = ws.dir.path().join("tokpipe.toml");
        std::fs::write(&path, &toml).unwrap();

        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(
            config,
            ConfigLoader::load_from_str(&toml, ConfigFormat::Toml).unwrap()
        );

        let mut driver = PipelineDriver::new(config, ProcessRunner::new())
            .with_env(ExecutionEnv::default());
        driver.run().await.unwrap();
        assert_eq!(std::fs::read_to_string(ws.results()).unwrap(), "OK\n");
    }
}
