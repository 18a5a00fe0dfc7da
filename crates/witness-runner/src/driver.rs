//! Page driver abstraction
//!
//! This module provides an abstraction over the browser operations a
//! checklist step performs, allowing both real CDP-backed execution and
//! scripted execution for testing the step loop without Chromium.

use async_trait::async_trait;
use std::time::Duration;
use witness_browser::BrowserSession;
use witness_core::{Result, Selector};

#[cfg(test)]
use std::collections::HashSet;
#[cfg(test)]
use std::sync::Mutex;

/// Trait for the page operations verification steps perform
///
/// The production implementation is [`BrowserSession`]; tests drive the
/// runner with a scripted implementation instead.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Open a URL and wait for the navigation to settle
    async fn goto(&self, url: &str) -> Result<()>;

    /// Reload the current page
    async fn reload(&self) -> Result<()>;

    /// Wait until the selector matches, within the timeout
    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Click the first element the selector matches
    async fn click(&self, selector: &Selector, timeout: Duration) -> Result<()>;

    /// Focus the first match and type a value into it
    async fn fill(&self, selector: &Selector, value: &str, timeout: Duration) -> Result<()>;

    /// Capture the current page as PNG bytes
    async fn capture(&self) -> Result<Vec<u8>>;

    /// URL of the page the driver is currently on
    async fn current_url(&self) -> Result<String>;

    /// Sleep for a fixed duration
    async fn pause(&self, duration: Duration) -> Result<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for BrowserSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.navigate(url).await
    }

    async fn reload(&self) -> Result<()> {
        BrowserSession::reload(self).await
    }

    async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        BrowserSession::wait_for(self, selector, timeout).await
    }

    async fn click(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        BrowserSession::click(self, selector, timeout).await
    }

    async fn fill(&self, selector: &Selector, value: &str, timeout: Duration) -> Result<()> {
        BrowserSession::fill(self, selector, value, timeout).await
    }

    async fn capture(&self) -> Result<Vec<u8>> {
        self.capture_page().await
    }

    async fn current_url(&self) -> Result<String> {
        BrowserSession::current_url(self).await
    }
}

/// Scripted driver for testing
///
/// Records every call and fails the operations whose labels are
/// pre-configured to fail, allowing deterministic step-loop tests without a
/// browser.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedDriver {
    /// Call labels that fail when executed
    failures: Mutex<HashSet<String>>,
    /// Labels of every call made, in order
    calls: Mutex<Vec<String>>,
    /// URL of the most recent successful `goto`
    location: Mutex<String>,
}

#[cfg(test)]
impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure one call label to fail
    pub fn fail_on(self, label: &str) -> Self {
        self.failures.lock().unwrap().insert(label.to_string());
        self
    }

    /// Labels of every call made so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, label: String) -> Result<()> {
        self.calls.lock().unwrap().push(label.clone());
        if self.failures.lock().unwrap().contains(&label) {
            return Err(witness_core::WitnessError::Other(format!(
                "scripted failure: {}",
                label
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[async_trait]
impl PageDriver for ScriptedDriver {
    async fn goto(&self, url: &str) -> Result<()> {
        self.record(format!("goto {}", url))?;
        *self.location.lock().unwrap() = url.to_string();
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        self.record("reload".to_string())
    }

    async fn wait_for(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
        self.record(format!("wait_for {}", selector))
    }

    async fn click(&self, selector: &Selector, _timeout: Duration) -> Result<()> {
        self.record(format!("click {}", selector))
    }

    async fn fill(&self, selector: &Selector, value: &str, _timeout: Duration) -> Result<()> {
        self.record(format!("fill {} = {}", selector, value))
    }

    async fn capture(&self) -> Result<Vec<u8>> {
        self.record("capture".to_string())?;
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    async fn current_url(&self) -> Result<String> {
        self.record("current_url".to_string())?;
        Ok(self.location.lock().unwrap().clone())
    }

    async fn pause(&self, _duration: Duration) -> Result<()> {
        self.record("pause".to_string())
    }
}
