//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the pipeline:
//! configuration schema, stage invocation types, the `StageRunner` seam and
//! the error taxonomy. Business crates depend on this crate only, never on
//! each other's internals.
//!
//! ## Run model
//! - Two stages, always in the same order: builder, then validator
//! - Every stage declares exactly one output file
//! - A stage is only considered done once that file exists on disk

mod config;
mod error;
mod path_style;
mod runner;
mod stage;

pub use config::*;
pub use error::*;
pub use path_style::PathStyle;
pub use runner::{LocalStageRunner, StageRunner};
pub use stage::*;
