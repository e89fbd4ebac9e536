//! Run plan and run report

use std::path::PathBuf;
use std::time::Duration;

use contracts::{PathStyle, StageInvocation, StageKind, StageOutcome};
use path_resolver::ResolvedPath;
use serde::{Serialize, Serializer};

/// Everything a run will do, computed without touching the filesystem
#[derive(Debug, Clone, PartialEq)]
pub struct RunPlan {
    pub corpus: ResolvedPath,
    pub builder: StageInvocation,
    pub validator: StageInvocation,
}

impl RunPlan {
    pub fn stages(&self) -> [&StageInvocation; 2] {
        [&self.builder, &self.validator]
    }

    /// Printable / serializable view
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            corpus_dir: self.corpus.original.clone(),
            resolved_corpus_dir: self.corpus.resolved.clone(),
            path_style: self.corpus.style,
            stages: self
                .stages()
                .into_iter()
                .map(|inv| PlannedStage {
                    stage: inv.stage,
                    label: inv.label.clone(),
                    command: inv.command_line(),
                    produces: inv.produces.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanSummary {
    pub corpus_dir: String,
    pub resolved_corpus_dir: PathBuf,
    pub path_style: PathStyle,
    pub stages: Vec<PlannedStage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStage {
    pub stage: StageKind,
    pub label: String,
    pub command: String,
    pub produces: PathBuf,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    /// Corpus directory as handed to the builder
    pub corpus_dir: PathBuf,
    pub path_style: PathStyle,

    pub builder_label: String,
    pub artifact: PathBuf,

    pub validator_label: String,
    pub results: PathBuf,

    /// Outcomes in execution order
    pub stages: Vec<StageOutcome>,

    /// Outputs of a previous run deleted before the builder started
    pub cleared: Vec<PathBuf>,

    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,
}

impl PipelineReport {
    /// Human readable confirmation naming both outputs
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            "Pipeline completed successfully.".to_string(),
            format!(
                "  {} output: {}",
                self.builder_label,
                self.artifact.display()
            ),
            format!(
                "  {} results: {}",
                self.validator_label,
                self.results.display()
            ),
        ]
    }

    pub fn print_summary(&self) {
        for line in self.summary_lines() {
            println!("{line}");
        }
    }
}

fn serialize_secs<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}
