//! Verification run execution
//!
//! The runner walks a plan's steps in order against a page driver, applies
//! the plan's failure policy, captures screenshot evidence, and assembles
//! the run report.

use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

use crate::driver::PageDriver;
use witness_browser::{wait_for_server, ScreenshotStore};
use witness_core::{
    FailurePolicy, Plan, Result, RunReport, RunnerConfig, Step, StepRecord, StepStatus,
    ERROR_ARTIFACT,
};

/// Executes verification plans against a page driver
pub struct Runner {
    config: RunnerConfig,
    store: ScreenshotStore,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Self {
        let store = ScreenshotStore::new(config.output_dir.clone());
        Self { config, store }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Execute every step of the plan and assemble the report
    ///
    /// Step failures are handled per the plan's policy and land in the
    /// report rather than the return value; `Err` is reserved for failures
    /// outside the checklist itself (invalid plan, server never reachable).
    /// Whatever the policy, a run with any failed step is a failed run.
    pub async fn run<D: PageDriver>(&self, plan: &Plan, driver: &D) -> Result<RunReport> {
        plan.validate()?;

        if plan.wait_for_server {
            info!(
                "Waiting for server at {} (up to {} attempts)",
                plan.base_url, self.config.readiness.attempts
            );
            wait_for_server(&plan.base_url, &self.config.readiness).await?;
        }

        info!(
            "Running plan '{}' against {} ({} steps, policy: {})",
            plan.name,
            plan.base_url,
            plan.steps.len(),
            plan.policy
        );

        let run_start = Instant::now();
        let mut report = RunReport::new(&plan.name, &plan.base_url);
        let mut aborted = false;

        for (index, step) in plan.steps.iter().enumerate() {
            if aborted {
                report.steps.push(StepRecord {
                    index,
                    step: step.to_string(),
                    status: StepStatus::Skipped,
                    duration_ms: 0,
                    screenshot: None,
                });
                continue;
            }

            let step_start = Instant::now();
            let outcome = self.execute_step(plan, step, driver).await;
            let duration_ms = step_start.elapsed().as_millis() as u64;

            match outcome {
                Ok(screenshot) => {
                    info!("Step {}/{} passed: {}", index + 1, plan.steps.len(), step);
                    report.steps.push(StepRecord {
                        index,
                        step: step.to_string(),
                        status: StepStatus::Passed,
                        duration_ms,
                        screenshot,
                    });
                }
                Err(e) => {
                    error!(
                        "Step {}/{} failed: {}: {}",
                        index + 1,
                        plan.steps.len(),
                        step,
                        e
                    );
                    report.steps.push(StepRecord {
                        index,
                        step: step.to_string(),
                        status: StepStatus::Failed {
                            message: e.to_string(),
                        },
                        duration_ms,
                        screenshot: None,
                    });

                    if report.error_screenshot.is_none() {
                        report.error_screenshot = self.capture_error(driver).await;
                    }

                    if plan.policy == FailurePolicy::FailFast {
                        warn!("Aborting remaining steps (policy: {})", plan.policy);
                        aborted = true;
                    }
                }
            }
        }

        report.final_url = driver.current_url().await.ok();
        report.duration_ms = run_start.elapsed().as_millis() as u64;
        info!("{}", report.summary());
        Ok(report)
    }

    /// Execute a single step, returning the screenshot path if it wrote one
    async fn execute_step<D: PageDriver>(
        &self,
        plan: &Plan,
        step: &Step,
        driver: &D,
    ) -> Result<Option<PathBuf>> {
        match step {
            Step::Goto { path } => {
                driver.goto(&plan.url_for(path)).await?;
                Ok(None)
            }
            Step::WaitFor {
                selector,
                timeout_secs,
            } => {
                let timeout = timeout_secs
                    .map(Duration::from_secs)
                    .unwrap_or_else(|| self.config.wait_timeout());
                driver.wait_for(selector, timeout).await?;
                Ok(None)
            }
            Step::Click { selector } => {
                driver.click(selector, self.config.wait_timeout()).await?;
                Ok(None)
            }
            Step::Fill { selector, value } => {
                driver
                    .fill(selector, value, self.config.wait_timeout())
                    .await?;
                Ok(None)
            }
            Step::Screenshot { name } => {
                let data = driver.capture().await?;
                let shot = self.store.save(name, &data).await?;
                Ok(Some(shot.path))
            }
            Step::Pause { secs } => {
                driver.pause(Duration::from_secs(*secs)).await?;
                Ok(None)
            }
            Step::Reload => {
                driver.reload().await?;
                Ok(None)
            }
        }
    }

    /// Best-effort diagnostic capture after the first failure
    ///
    /// Saved under the reserved [`ERROR_ARTIFACT`] name, which `validate()`
    /// keeps plans from claiming. Failure here is logged and swallowed so it
    /// never masks the step failure that triggered it.
    async fn capture_error<D: PageDriver>(&self, driver: &D) -> Option<PathBuf> {
        match driver.capture().await {
            Ok(data) => match self.store.save(ERROR_ARTIFACT, &data).await {
                Ok(shot) => Some(shot.path),
                Err(e) => {
                    warn!("Could not store error screenshot: {}", e);
                    None
                }
            },
            Err(e) => {
                warn!("Could not capture error screenshot: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ScriptedDriver;
    use tempfile::TempDir;
    use witness_core::{RetryPolicy, Selector, WitnessError};

    fn test_runner(dir: &TempDir) -> Runner {
        Runner::new(RunnerConfig {
            output_dir: dir.path().join("shots"),
            ..RunnerConfig::default()
        })
    }

    fn three_step_plan(policy: FailurePolicy) -> Plan {
        Plan::new("sample", "http://localhost:5173")
            .with_policy(policy)
            .with_steps(vec![
                Step::Goto {
                    path: "/".to_string(),
                },
                Step::WaitFor {
                    selector: Selector::text("Missing"),
                    timeout_secs: Some(1),
                },
                Step::Screenshot {
                    name: "final".to_string(),
                },
            ])
    }

    #[tokio::test]
    async fn test_all_passing_run() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let driver = ScriptedDriver::new();

        let report = runner
            .run(&three_step_plan(FailurePolicy::FailFast), &driver)
            .await
            .unwrap();

        assert!(report.passed());
        assert_eq!(report.passed_steps(), 3);
        assert_eq!(report.skipped_steps(), 0);
        assert!(report.error_screenshot.is_none());

        // The screenshot step wrote its artifact
        let shot = report.steps[2].screenshot.as_ref().unwrap();
        assert_eq!(shot, &dir.path().join("shots").join("final.png"));
        assert!(shot.exists());

        assert_eq!(
            report.final_url.as_deref(),
            Some("http://localhost:5173/")
        );
        assert_eq!(
            driver.calls(),
            vec![
                "goto http://localhost:5173/",
                "wait_for text \"Missing\"",
                "capture",
                "current_url",
            ]
        );
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_and_captures_error_screenshot() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let driver = ScriptedDriver::new().fail_on("wait_for text \"Missing\"");

        let report = runner
            .run(&three_step_plan(FailurePolicy::FailFast), &driver)
            .await
            .unwrap();

        assert!(!report.passed());
        assert_eq!(report.passed_steps(), 1);
        assert_eq!(report.failed_steps(), 1);
        assert_eq!(report.skipped_steps(), 1);
        assert_eq!(report.first_failure().unwrap().index, 1);

        // Error screenshot captured, final screenshot step never ran
        let error_shot = report.error_screenshot.as_ref().unwrap();
        assert_eq!(error_shot, &dir.path().join("shots").join("error.png"));
        assert!(error_shot.exists());
        assert_eq!(report.steps[2].status, StepStatus::Skipped);

        // The only capture call was the diagnostic one
        assert_eq!(
            driver.calls(),
            vec![
                "goto http://localhost:5173/",
                "wait_for text \"Missing\"",
                "capture",
                "current_url",
            ]
        );
    }

    #[tokio::test]
    async fn test_plan_claiming_the_error_artifact_is_rejected() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let driver = ScriptedDriver::new();

        // A plan that names its own screenshot "error" would overwrite the
        // diagnostic capture written after a later failure.
        let plan = Plan::new("claims_error", "http://localhost:5173")
            .with_policy(FailurePolicy::FailFast)
            .with_steps(vec![
                Step::Screenshot {
                    name: "error".to_string(),
                },
                Step::Click {
                    selector: Selector::text("Missing"),
                },
            ]);

        let err = runner.run(&plan, &driver).await.unwrap_err();
        assert!(err.to_string().contains("reserved"));
        assert!(matches!(err, WitnessError::InvalidPlan(_)));
        assert!(driver.calls().is_empty());
        assert!(!dir.path().join("shots").join("error.png").exists());
    }

    #[tokio::test]
    async fn test_continue_on_error_runs_every_step() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let driver = ScriptedDriver::new().fail_on("wait_for text \"Missing\"");

        let report = runner
            .run(&three_step_plan(FailurePolicy::ContinueOnError), &driver)
            .await
            .unwrap();

        // Still a failed run, but the later screenshot was taken
        assert!(!report.passed());
        assert_eq!(report.failed_steps(), 1);
        assert_eq!(report.skipped_steps(), 0);
        assert!(report.steps[2].status.is_passed());
        assert!(report.error_screenshot.is_some());
        assert!(dir.path().join("shots").join("final.png").exists());
    }

    #[tokio::test]
    async fn test_error_screenshot_failure_never_masks_the_step_failure() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let driver = ScriptedDriver::new()
            .fail_on("wait_for text \"Missing\"")
            .fail_on("capture");

        let report = runner
            .run(&three_step_plan(FailurePolicy::FailFast), &driver)
            .await
            .unwrap();

        assert!(!report.passed());
        assert!(report.error_screenshot.is_none());
        assert_eq!(report.failed_steps(), 1);
    }

    #[tokio::test]
    async fn test_invalid_plan_is_rejected_before_any_step() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let driver = ScriptedDriver::new();

        let empty = Plan::new("empty", "http://localhost:5173");
        let err = runner.run(&empty, &driver).await.unwrap_err();

        assert!(matches!(err, WitnessError::InvalidPlan(_)));
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_server_aborts_before_any_step() {
        let dir = TempDir::new().unwrap();
        let runner = Runner::new(RunnerConfig {
            output_dir: dir.path().join("shots"),
            readiness: RetryPolicy {
                attempts: 2,
                interval_ms: 10,
                attempt_timeout_ms: 100,
            },
            ..RunnerConfig::default()
        });
        let driver = ScriptedDriver::new();

        let plan = Plan::new("probed", "http://127.0.0.1:9")
            .with_wait_for_server(true)
            .with_steps(vec![Step::Goto {
                path: "/".to_string(),
            }]);

        let err = runner.run(&plan, &driver).await.unwrap_err();
        assert!(matches!(err, WitnessError::ServerUnreachable { .. }));
        assert!(driver.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pause_and_reload_flow_through_the_driver() {
        let dir = TempDir::new().unwrap();
        let runner = test_runner(&dir);
        let driver = ScriptedDriver::new();

        let plan = Plan::new("motions", "http://localhost:3000").with_steps(vec![
            Step::Pause { secs: 2 },
            Step::Reload,
            Step::Fill {
                selector: Selector::css("textarea"),
                value: "Test Claim".to_string(),
            },
            Step::Click {
                selector: Selector::role("button", "Sports"),
            },
        ]);

        let report = runner.run(&plan, &driver).await.unwrap();
        assert!(report.passed());
        assert_eq!(
            driver.calls(),
            vec![
                "pause",
                "reload",
                "fill textarea = Test Claim",
                "click button \"Sports\"",
                "current_url",
            ]
        );
    }
}
