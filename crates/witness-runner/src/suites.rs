//! Built-in verification suites
//!
//! The checklists Witness ships with, one per front end it verifies: the
//! Community Lens landing flow, the Bounty Board interaction flow, and the
//! TruthMarket page sweep. Each is an ordinary [`Plan`], so a TOML plan file
//! can express anything these do.

use witness_core::{FailurePolicy, Plan, Result, Selector, Step, WitnessError};

/// All built-in suites
pub fn builtin_suites() -> Vec<Plan> {
    vec![lens(), board(), market()]
}

/// Look up a built-in suite by name
pub fn find_suite(name: &str) -> Result<Plan> {
    builtin_suites()
        .into_iter()
        .find(|plan| plan.name == name)
        .ok_or_else(|| WitnessError::UnknownSuite(name.to_string()))
}

/// Community Lens landing page and agent status panel
///
/// Aborts on the first failure and leaves a diagnostic screenshot, since
/// every later check depends on the landing page having rendered.
pub fn lens() -> Plan {
    Plan::new("lens", "http://localhost:5173")
        .with_description("Community Lens landing page and agent status panel")
        .with_policy(FailurePolicy::FailFast)
        .with_steps(vec![
            Step::Goto {
                path: "/".to_string(),
            },
            Step::WaitFor {
                selector: Selector::text("Community Lens Protocol"),
                timeout_secs: None,
            },
            Step::WaitFor {
                selector: Selector::text("Curious? Here are some sample topics:"),
                timeout_secs: None,
            },
            Step::Screenshot {
                name: "verifier_view".to_string(),
            },
            Step::Click {
                selector: Selector::text("Agent Guard"),
            },
            Step::WaitFor {
                selector: Selector::text("Agent Status: ONLINE"),
                timeout_secs: None,
            },
            Step::Screenshot {
                name: "agent_view".to_string(),
            },
        ])
}

/// Bounty Board create modal, verification terminal, and agent chat
///
/// Probes the dev server first; its start is slow enough that the first
/// navigation would otherwise race it.
pub fn board() -> Plan {
    Plan::new("board", "http://localhost:5173")
        .with_description("Bounty board create modal, verification terminal, and agent chat")
        .with_policy(FailurePolicy::FailFast)
        .with_wait_for_server(true)
        .with_steps(vec![
            Step::Goto {
                path: "/".to_string(),
            },
            Step::WaitFor {
                selector: Selector::text("Bounty Board"),
                timeout_secs: None,
            },
            Step::Click {
                selector: Selector::text("Request Verification"),
            },
            Step::WaitFor {
                selector: Selector::text("Create New Bounty"),
                timeout_secs: None,
            },
            Step::Fill {
                selector: Selector::css("textarea"),
                value: "Test Claim".to_string(),
            },
            Step::Screenshot {
                name: "step1_modal".to_string(),
            },
            // Reload resets state and closes the modal
            Step::Reload,
            Step::WaitFor {
                selector: Selector::text("Bounty Board"),
                timeout_secs: None,
            },
            Step::Click {
                selector: Selector::text("Verification Terminal"),
            },
            Step::WaitFor {
                selector: Selector::text("Grokipedia Source"),
                timeout_secs: None,
            },
            Step::Screenshot {
                name: "step2_verifier".to_string(),
            },
            Step::Click {
                selector: Selector::text("Agent Guard"),
            },
            Step::WaitFor {
                selector: Selector::text("Ask me anything"),
                timeout_secs: None,
            },
            Step::Fill {
                selector: Selector::css("input[type=text]"),
                value: "Hello".to_string(),
            },
            Step::Click {
                selector: Selector::css("button[type=submit]"),
            },
            Step::WaitFor {
                selector: Selector::text("Hello"),
                timeout_secs: None,
            },
            Step::Screenshot {
                name: "step3_agent".to_string(),
            },
        ])
}

/// TruthMarket landing, markets list, sports filter, and admin dashboard
///
/// Each page is checked independently, so one broken page still leaves
/// evidence for the others.
pub fn market() -> Plan {
    Plan::new("market", "http://localhost:3000")
        .with_description("TruthMarket landing, markets list, sports filter, and admin dashboard")
        .with_policy(FailurePolicy::ContinueOnError)
        .with_steps(vec![
            Step::Goto {
                path: "/".to_string(),
            },
            Step::WaitFor {
                selector: Selector::text_in("h1", "TruthMarket"),
                timeout_secs: Some(30),
            },
            Step::Screenshot {
                name: "landing".to_string(),
            },
            Step::Goto {
                path: "/markets".to_string(),
            },
            Step::WaitFor {
                selector: Selector::text_in("h1", "Active Markets"),
                timeout_secs: Some(30),
            },
            Step::Screenshot {
                name: "markets".to_string(),
            },
            Step::Click {
                selector: Selector::role("button", "Sports"),
            },
            // The filter re-renders without a navigation to wait on
            Step::Pause { secs: 2 },
            Step::Screenshot {
                name: "sports".to_string(),
            },
            Step::Goto {
                path: "/admin".to_string(),
            },
            Step::WaitFor {
                selector: Selector::text_in("h1", "Admin Dashboard"),
                timeout_secs: Some(30),
            },
            Step::Screenshot {
                name: "admin".to_string(),
            },
        ])
}
