//! HYSPLIT trajectory model invocation.
//!
//! Builds the positional CONTROL file for a single-source trajectory run,
//! executes the model binary (`hyts_std` by default) in an explicit working
//! directory, and returns the raw trajectory dump text for parsing with
//! `tdump-parser`.
//!
//! Invocation failures are reported as [`RunnerError`], never as parse
//! errors, and are never retried.

pub mod control;
pub mod error;
pub mod runner;

pub use control::{ControlFile, Direction, MetType, StartTime};
pub use error::{RunnerError, RunnerResult};
pub use runner::{HysplitRunner, ModelRun, RunnerConfig};
