//! Core type definitions for Witness verification runs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Locates an element on the rendered page
///
/// Three forms, matching how the checklists address the page: visible text
/// (optionally confined to one element tag), a raw CSS selector, or an
/// accessibility role with its accessible name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Selector {
    /// Accessibility role plus accessible name (e.g. a button labeled "Sports")
    Role {
        /// Role, matched both as an implicit element tag and as a `role` attribute
        role: String,
        /// Accessible name, compared against the element's normalized text
        name: String,
    },
    /// Visible text content
    Text {
        /// Text the element must contain
        text: String,
        /// Element tag to confine the match to (any element when absent)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<String>,
    },
    /// Raw CSS selector, passed to the browser untouched
    Css {
        /// The CSS expression
        css: String,
    },
}

impl Selector {
    /// Match any element containing the given visible text
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            tag: None,
        }
    }

    /// Match elements of one tag containing the given visible text
    pub fn text_in(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            tag: Some(tag.into()),
        }
    }

    /// Match by raw CSS selector
    pub fn css(css: impl Into<String>) -> Self {
        Self::Css { css: css.into() }
    }

    /// Match by accessibility role and accessible name
    pub fn role(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Role {
            role: role.into(),
            name: name.into(),
        }
    }

    /// Compile to the form the browser layer dispatches on
    ///
    /// CSS selectors pass through; text and role selectors compile to XPath
    /// so one wait primitive covers all three forms.
    pub fn to_locator(&self) -> Locator {
        match self {
            Self::Css { css } => Locator::Css(css.clone()),
            Self::Text { text, tag } => {
                let tag = tag.as_deref().unwrap_or("*");
                Locator::Xpath(format!(
                    "//{}[text()[contains(., {})]]",
                    tag,
                    xpath_literal(text)
                ))
            }
            Self::Role { role, name } => {
                let lit = xpath_literal(name);
                Locator::Xpath(format!(
                    "//{role}[normalize-space(.)={lit}] | //*[@role={role_lit}][normalize-space(.)={lit}]",
                    role = role,
                    role_lit = xpath_literal(role),
                    lit = lit
                ))
            }
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css { css } => write!(f, "{}", css),
            Self::Text { text, tag: None } => write!(f, "text \"{}\"", text),
            Self::Text {
                text,
                tag: Some(tag),
            } => write!(f, "{} with text \"{}\"", tag, text),
            Self::Role { role, name } => write!(f, "{} \"{}\"", role, name),
        }
    }
}

/// A compiled locator, ready for the browser layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector for `querySelector`-style lookup
    Css(String),
    /// XPath expression
    Xpath(String),
}

/// Quote a string as an XPath 1.0 literal
///
/// XPath literals have no escape syntax, so strings containing both quote
/// kinds must be assembled with `concat()`.
fn xpath_literal(s: &str) -> String {
    if !s.contains('\'') {
        return format!("'{}'", s);
    }
    if !s.contains('"') {
        return format!("\"{}\"", s);
    }
    let mut parts: Vec<String> = Vec::new();
    for (i, chunk) in s.split('\'').enumerate() {
        if i > 0 {
            parts.push("\"'\"".to_string());
        }
        if !chunk.is_empty() {
            parts.push(format!("'{}'", chunk));
        }
    }
    if parts.len() == 1 {
        return parts.remove(0);
    }
    format!("concat({})", parts.join(", "))
}

/// One checklist entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Navigate to a path under the plan's base URL
    Goto {
        /// Path to open, joined onto the base URL
        path: String,
    },
    /// Wait until the selector matches, within a bounded timeout
    WaitFor {
        selector: Selector,
        /// Override for the configured default wait bound
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_secs: Option<u64>,
    },
    /// Click the first element the selector matches
    Click { selector: Selector },
    /// Focus the first match and type a value into it
    Fill { selector: Selector, value: String },
    /// Capture a full-page screenshot under the given artifact name
    Screenshot { name: String },
    /// Sleep for a fixed number of seconds
    Pause { secs: u64 },
    /// Reload the current page
    Reload,
}

impl Step {
    /// Artifact name if this step writes a screenshot
    pub fn screenshot_name(&self) -> Option<&str> {
        match self {
            Self::Screenshot { name } => Some(name),
            _ => None,
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Goto { path } => write!(f, "goto {}", path),
            Self::WaitFor { selector, .. } => write!(f, "wait for {}", selector),
            Self::Click { selector } => write!(f, "click {}", selector),
            Self::Fill { selector, .. } => write!(f, "fill {}", selector),
            Self::Screenshot { name } => write!(f, "screenshot {}", name),
            Self::Pause { secs } => write!(f, "pause {}s", secs),
            Self::Reload => write!(f, "reload"),
        }
    }
}

/// What the runner does after a step fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort at the first failure, marking the remaining steps skipped
    #[default]
    FailFast,
    /// Keep executing later steps, recording every failure
    ContinueOnError,
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FailFast => write!(f, "fail_fast"),
            Self::ContinueOnError => write!(f, "continue_on_error"),
        }
    }
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fail_fast" | "fail-fast" | "failfast" => Ok(Self::FailFast),
            "continue_on_error" | "continue-on-error" | "continue" => Ok(Self::ContinueOnError),
            _ => Err(format!("Invalid failure policy: {}", s)),
        }
    }
}

/// Outcome of one executed (or skipped) step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    /// The step completed
    Passed,
    /// The step failed with the recorded message
    Failed { message: String },
    /// The step never ran because an earlier failure aborted the run
    Skipped,
}

impl StepStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Per-step entry in a run report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    /// Zero-based position in the plan
    pub index: usize,
    /// Human-readable step label
    pub step: String,
    #[serde(flatten)]
    pub status: StepStatus,
    /// Wall-clock duration of the step in milliseconds
    pub duration_ms: u64,
    /// Screenshot written by this step, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

/// Artifact name reserved for the diagnostic capture after a failure
pub const ERROR_ARTIFACT: &str = "error";

/// Aggregated outcome of one verification run
///
/// Contains exactly one record per plan step, in plan order. A run passes
/// only when no record failed; skipped records appear only after a failure
/// under the fail-fast policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Plan name
    pub plan: String,
    /// Base URL the run targeted
    pub base_url: String,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Total wall-clock duration in milliseconds
    pub duration_ms: u64,
    /// Per-step outcomes, in plan order
    pub steps: Vec<StepRecord>,
    /// URL the page ended on, when the driver could report it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    /// Diagnostic screenshot captured after the first failure, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_screenshot: Option<PathBuf>,
}

impl RunReport {
    pub fn new(plan: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            plan: plan.into(),
            base_url: base_url.into(),
            started_at: Utc::now(),
            duration_ms: 0,
            steps: Vec::new(),
            final_url: None,
            error_screenshot: None,
        }
    }

    /// Whether every executed step passed
    pub fn passed(&self) -> bool {
        !self.steps.iter().any(|r| r.status.is_failure())
    }

    pub fn passed_steps(&self) -> usize {
        self.steps.iter().filter(|r| r.status.is_passed()).count()
    }

    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|r| r.status.is_failure()).count()
    }

    pub fn skipped_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|r| r.status == StepStatus::Skipped)
            .count()
    }

    /// First failed record, if the run failed
    pub fn first_failure(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|r| r.status.is_failure())
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{}: {} passed, {} failed, {} skipped in {}ms",
            self.plan,
            self.passed_steps(),
            self.failed_steps(),
            self.skipped_steps(),
            self.duration_ms
        )
    }
}
