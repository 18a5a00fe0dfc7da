//! # witness-core
//!
//! Core types for the Witness verification runner.
//!
//! Witness drives a headless browser against a locally running web front end
//! and captures screenshots as evidence that specific page states were
//! reached. This crate carries the shared vocabulary:
//!
//! - Plans: named checklists of navigate/wait/click/fill/screenshot steps
//! - Selectors: text, CSS, and role locators compiled for the browser layer
//! - Policies: explicit failure handling and bounded readiness retries
//! - Reports: structured per-step outcomes for a finished run

mod config;
mod error;
mod plan;
mod types;

pub use config::{BrowserSettings, RetryPolicy, RunnerConfig};
pub use error::{Result, WitnessError};
pub use plan::Plan;
pub use types::*;
