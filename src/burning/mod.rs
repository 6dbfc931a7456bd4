//! Burning module - batch workflow and disc writing
//!
//! The workflow is blocking and sequential. External writers are waited on
//! synchronously and report through `BurnOutcome` rather than errors.

pub mod workflow;
pub mod writer;

pub use workflow::{
    AlwaysBurn, BatchSummary, BurnGate, GateDecision, JobOutcome, Pipeline, PreparedJob,
};
pub use writer::{BurnOutcome, burn_disc};
