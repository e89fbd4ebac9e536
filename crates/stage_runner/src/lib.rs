//! # Stage Runner
//!
//! `StageRunner` implementations.
//!
//! Responsibilities:
//! - Spawn stage programs as child processes and wait for them
//! - Redirect a stage's stdout into its results file
//! - Enforce the optional per-stage timeout
//! - Provide a scripted runner for tests

pub mod mock;
pub mod process;

pub use contracts::{StageInvocation, StageOutcome, StageRunner};
pub use mock::{MockConfig, MockStageBehavior, MockStageRunner};
pub use process::ProcessRunner;
