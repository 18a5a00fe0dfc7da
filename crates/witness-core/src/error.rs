//! Unified error types for Witness

use thiserror::Error;

/// Unified error type for all Witness operations
#[derive(Error, Debug)]
pub enum WitnessError {
    // Browser errors
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Screenshot capture failed: {0}")]
    Screenshot(String),

    // Readiness probe errors
    #[error("Server at {url} not reachable after {attempts} attempts")]
    ServerUnreachable { url: String, attempts: u32 },

    // Plan errors
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    #[error("Unknown suite: {0}")]
    UnknownSuite(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(String),
}

/// Result type alias using WitnessError
pub type Result<T> = std::result::Result<T, WitnessError>;
