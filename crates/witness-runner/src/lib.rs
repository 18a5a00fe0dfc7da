//! witness-runner: plan execution engine for Witness verification runs.
//!
//! This crate turns a verification plan into a run report. It walks the
//! plan's steps in order against a page driver, applies the plan's failure
//! policy, and collects screenshot evidence along the way.
//!
//! # Core Concepts
//!
//! - **Plan**: A named, ordered checklist of steps against one base URL
//! - **PageDriver**: The browser operations a step performs, as a trait so
//!   the step loop is testable without Chromium
//! - **FailurePolicy**: Abort on the first failure or keep going and record
//!   every failure
//! - **RunReport**: One record per step, plus the diagnostic screenshot
//!   captured after the first failure
//!
//! # Modules
//!
//! - [`driver`]: Page driver trait and its browser-backed implementation
//! - [`runner`]: The step loop, policy handling, and report assembly
//! - [`suites`]: The built-in verification suites

pub mod driver;
pub mod runner;
pub mod suites;

// Re-export commonly used types from witness-core
pub use witness_core::{
    FailurePolicy, Plan, Result, RunReport, RunnerConfig, Step, StepRecord, StepStatus,
    WitnessError,
};

pub use driver::PageDriver;
pub use runner::Runner;
pub use suites::{builtin_suites, find_suite};
