//! Verification plans
//!
//! A plan is a named, ordered checklist of steps executed against one base
//! URL. Plans are loaded from TOML files or constructed in code (the built-in
//! suites); either way they are validated before a run starts.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{FailurePolicy, Result, Step, WitnessError, ERROR_ARTIFACT};

/// A named checklist of verification steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Suite name, used for lookup and logging
    pub name: String,

    /// One-line description shown by `witness list`
    #[serde(default)]
    pub description: String,

    /// Absolute base URL of the server under test
    pub base_url: String,

    /// What to do when a step fails
    #[serde(default)]
    pub policy: FailurePolicy,

    /// Probe the server for reachability before the run starts
    #[serde(default)]
    pub wait_for_server: bool,

    /// Checklist entries, executed in order
    pub steps: Vec<Step>,
}

impl Plan {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            base_url: base_url.into(),
            policy: FailurePolicy::default(),
            wait_for_server: false,
            steps: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_wait_for_server(mut self, wait: bool) -> Self {
        self.wait_for_server = wait;
        self
    }

    pub fn with_steps(mut self, steps: Vec<Step>) -> Self {
        self.steps = steps;
        self
    }

    /// Load a plan from a TOML file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let plan: Self = toml::from_str(&content).map_err(|e| {
            WitnessError::InvalidPlan(format!("{}: {}", path.display(), e))
        })?;
        plan.validate()?;
        Ok(plan)
    }

    /// Render the plan as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| WitnessError::InvalidPlan(format!("plan '{}': {}", self.name, e)))
    }

    /// Check the structural invariants
    ///
    /// A valid plan has a name, at least one step, an absolute http(s) base
    /// URL, positive wait timeouts, and unique filesystem-safe screenshot
    /// names. The name `error` is reserved for the diagnostic capture the
    /// runner writes after a failure.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(WitnessError::InvalidPlan("plan has no name".to_string()));
        }
        if self.steps.is_empty() {
            return Err(self.invalid("plan has no steps"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(self.invalid(&format!(
                "base URL must be absolute http(s), got '{}'",
                self.base_url
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for step in &self.steps {
            if let Step::WaitFor {
                timeout_secs: Some(0),
                ..
            } = step
            {
                return Err(self.invalid(&format!("step '{}' has a zero timeout", step)));
            }
            if let Some(name) = step.screenshot_name() {
                if name.is_empty() || !name.chars().all(is_artifact_char) {
                    return Err(self.invalid(&format!(
                        "screenshot name '{}' is not filesystem-safe",
                        name
                    )));
                }
                if name == ERROR_ARTIFACT {
                    return Err(self.invalid(&format!(
                        "screenshot name '{}' is reserved for the diagnostic capture",
                        name
                    )));
                }
                if !seen.insert(name) {
                    return Err(self.invalid(&format!("duplicate screenshot name '{}'", name)));
                }
            }
        }
        Ok(())
    }

    /// Resolve a step path against the base URL
    ///
    /// Absolute http(s) paths pass through untouched.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() || path == "/" {
            return format!("{}/", base);
        }
        format!("{}/{}", base, path.trim_start_matches('/'))
    }

    fn invalid(&self, message: &str) -> WitnessError {
        WitnessError::InvalidPlan(format!("plan '{}': {}", self.name, message))
    }
}

/// Characters allowed in screenshot artifact names
fn is_artifact_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Selector;
    use std::io::Write;

    fn sample_plan() -> Plan {
        Plan::new("sample", "http://localhost:5173").with_steps(vec![
            Step::Goto {
                path: "/".to_string(),
            },
            Step::WaitFor {
                selector: Selector::text("Bounty Board"),
                timeout_secs: Some(30),
            },
            Step::Screenshot {
                name: "landing".to_string(),
            },
        ])
    }

    #[test]
    fn test_valid_plan_passes_validation() {
        assert!(sample_plan().validate().is_ok());
    }

    #[test]
    fn test_empty_steps_rejected() {
        let plan = Plan::new("empty", "http://localhost:5173");
        assert!(matches!(
            plan.validate(),
            Err(WitnessError::InvalidPlan(_))
        ));
    }

    #[test]
    fn test_relative_base_url_rejected() {
        let plan = sample_plan();
        let plan = Plan {
            base_url: "localhost:5173".to_string(),
            ..plan
        };
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_duplicate_screenshot_names_rejected() {
        let mut plan = sample_plan();
        plan.steps.push(Step::Screenshot {
            name: "landing".to_string(),
        });
        let err = plan.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate screenshot name"));
    }

    #[test]
    fn test_unsafe_screenshot_name_rejected() {
        let mut plan = sample_plan();
        plan.steps.push(Step::Screenshot {
            name: "../escape".to_string(),
        });
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_reserved_screenshot_name_rejected() {
        let mut plan = sample_plan();
        plan.steps.push(Step::Screenshot {
            name: "error".to_string(),
        });
        let err = plan.validate().unwrap_err();
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut plan = sample_plan();
        plan.steps.push(Step::WaitFor {
            selector: Selector::text("anything"),
            timeout_secs: Some(0),
        });
        assert!(plan.validate().is_err());
    }

    #[test]
    fn test_url_joining() {
        let plan = sample_plan();
        assert_eq!(plan.url_for("/"), "http://localhost:5173/");
        assert_eq!(plan.url_for("/markets"), "http://localhost:5173/markets");
        assert_eq!(plan.url_for("markets"), "http://localhost:5173/markets");
        assert_eq!(
            plan.url_for("http://localhost:3000/admin"),
            "http://localhost:3000/admin"
        );

        let trailing = Plan {
            base_url: "http://localhost:5173/".to_string(),
            ..sample_plan()
        };
        assert_eq!(trailing.url_for("/admin"), "http://localhost:5173/admin");
    }

    #[test]
    fn test_toml_round_trip() {
        let plan = sample_plan()
            .with_description("round trip")
            .with_policy(FailurePolicy::ContinueOnError)
            .with_wait_for_server(true);
        let toml_text = plan.to_toml().unwrap();
        let parsed: Plan = toml::from_str(&toml_text).unwrap();
        assert_eq!(parsed.name, plan.name);
        assert_eq!(parsed.policy, FailurePolicy::ContinueOnError);
        assert!(parsed.wait_for_server);
        assert_eq!(parsed.steps, plan.steps);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name = "from_file"
base_url = "http://localhost:3000"
policy = "continue_on_error"

[[steps]]
type = "goto"
path = "/"

[[steps]]
type = "wait_for"
timeout_secs = 30

[steps.selector]
text = "TruthMarket"
tag = "h1"

[[steps]]
type = "fill"
value = "Test Claim"

[steps.selector]
css = "textarea"

[[steps]]
type = "screenshot"
name = "landing"
"#
        )
        .unwrap();

        let plan = Plan::load(file.path()).unwrap();
        assert_eq!(plan.name, "from_file");
        assert_eq!(plan.policy, FailurePolicy::ContinueOnError);
        assert_eq!(plan.steps.len(), 4);
        assert_eq!(
            plan.steps[1],
            Step::WaitFor {
                selector: Selector::text_in("h1", "TruthMarket"),
                timeout_secs: Some(30),
            }
        );
        assert_eq!(
            plan.steps[2],
            Step::Fill {
                selector: Selector::css("textarea"),
                value: "Test Claim".to_string(),
            }
        );
    }

    #[test]
    fn test_load_rejects_invalid_plan_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
name = "broken"
base_url = "http://localhost:3000"
steps = []
"#
        )
        .unwrap();
        assert!(matches!(
            Plan::load(file.path()),
            Err(WitnessError::InvalidPlan(_))
        ));
    }
}
