//! Browser automation error types - re-exports the unified WitnessError
//!
//! All browser errors use the unified WitnessError type:
//! - Launch(String) / Browser(String) - launch, CDP, and session failures
//! - Navigation { url, message } - navigation failures with the target URL
//! - ElementNotFound { selector } - bounded waits that expired
//! - Screenshot(String) - capture and storage failures
//! - ServerUnreachable { url, attempts } - exhausted readiness probes
//!
//! Error messages should be descriptive and include context about the
//! operation that failed.

pub use witness_core::{Result, WitnessError};

/// Alias used within the browser layer
pub type BrowserError = WitnessError;
