//! Browser lifecycle management using Chrome DevTools Protocol

use crate::error::Result;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use witness_core::{BrowserSettings, Locator, Selector, WitnessError};

/// Active browser session with Chrome DevTools Protocol
pub struct BrowserSession {
    /// Underlying browser instance (kept alive for tab lifetime)
    #[allow(dead_code)]
    browser: Browser,
    /// Current active tab
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new headless browser instance
    ///
    /// # Example
    /// ```no_run
    /// use witness_browser::BrowserSession;
    /// use witness_core::BrowserSettings;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let session = BrowserSession::launch(&BrowserSettings::default()).await.unwrap();
    ///     session.navigate("http://localhost:5173/").await.unwrap();
    /// }
    /// ```
    pub async fn launch(settings: &BrowserSettings) -> Result<Self> {
        info!(
            "Launching browser (headless: {}, size: {}x{})",
            settings.headless, settings.window_width, settings.window_height
        );

        let mut launch_options = LaunchOptions::default_builder()
            .headless(settings.headless)
            .window_size(Some((settings.window_width, settings.window_height)))
            .build()
            .map_err(|e| WitnessError::Launch(format!("Failed to build launch options: {}", e)))?;

        // Add user agent if specified
        let user_agent_arg: Option<String> = settings
            .user_agent
            .as_ref()
            .map(|ua| format!("--user-agent={}", ua));
        if let Some(ref ua_arg) = user_agent_arg {
            launch_options.args.push(OsStr::new(ua_arg));
        }

        let browser = Browser::new(launch_options)
            .map_err(|e| WitnessError::Launch(format!("Failed to launch browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| WitnessError::Launch(format!("Failed to create tab: {}", e)))?;

        info!("Browser launched successfully");

        Ok(Self { browser, tab })
    }

    /// Connect to an already running browser instance
    ///
    /// # Arguments
    /// * `port` - Chrome DevTools Protocol port (typically 9222)
    pub async fn connect(port: u16) -> Result<Self> {
        info!("Connecting to existing browser on port {}", port);

        let browser = Browser::connect(format!("http://127.0.0.1:{}", port))
            .map_err(|e| WitnessError::Launch(format!("Failed to connect to browser: {}", e)))?;

        let tab = browser
            .new_tab()
            .map_err(|e| WitnessError::Launch(format!("Failed to create tab: {}", e)))?;

        info!("Connected to browser successfully");

        Ok(Self { browser, tab })
    }

    /// Navigate to a URL and wait for the navigation to complete
    pub async fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);

        self.tab
            .navigate_to(url)
            .map_err(|e| WitnessError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| WitnessError::Navigation {
                url: url.to_string(),
                message: format!("navigation did not settle: {}", e),
            })?;

        debug!("Navigated to {}", url);
        Ok(())
    }

    /// Reload the current page and wait for it to settle
    pub async fn reload(&self) -> Result<()> {
        debug!("Reloading page");

        self.tab
            .reload(false, None)
            .map_err(|e| WitnessError::Browser(format!("Failed to reload page: {}", e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| WitnessError::Browser(format!("Reload did not settle: {}", e)))?;

        Ok(())
    }

    /// Wait for a selector to match, within the timeout
    pub async fn wait_for(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        debug!("Waiting for {} (timeout: {:?})", selector, timeout);
        self.locate(selector, timeout)?;
        debug!("Found {}", selector);
        Ok(())
    }

    /// Click the first element the selector matches
    pub async fn click(&self, selector: &Selector, timeout: Duration) -> Result<()> {
        debug!("Clicking {}", selector);

        let element = self.locate(selector, timeout)?;
        element
            .click()
            .map_err(|e| WitnessError::Browser(format!("Failed to click {}: {}", selector, e)))?;

        Ok(())
    }

    /// Focus the first match and type a value into it
    pub async fn fill(&self, selector: &Selector, value: &str, timeout: Duration) -> Result<()> {
        debug!("Filling {}", selector);

        let element = self.locate(selector, timeout)?;
        element
            .type_into(value)
            .map_err(|e| WitnessError::Browser(format!("Failed to fill {}: {}", selector, e)))?;

        Ok(())
    }

    /// Capture a full-page PNG screenshot
    pub async fn capture_page(&self) -> Result<Vec<u8>> {
        let data = self
            .tab
            .capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| WitnessError::Screenshot(format!("CDP capture failed: {}", e)))?;

        Ok(data)
    }

    /// Execute JavaScript in the page context
    ///
    /// # Returns
    /// JSON result from JavaScript execution
    pub async fn evaluate_script(&self, script: &str) -> Result<serde_json::Value> {
        debug!("Evaluating JavaScript: {}", script);

        let result = self
            .tab
            .evaluate(script, false)
            .map_err(|e| WitnessError::Browser(format!("JavaScript evaluation failed: {}", e)))?;

        Ok(result.value.unwrap_or(serde_json::Value::Null))
    }

    /// Get the current page title
    pub async fn title(&self) -> Result<String> {
        let result = self.evaluate_script("document.title").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Get the current URL
    pub async fn current_url(&self) -> Result<String> {
        let result = self.evaluate_script("window.location.href").await?;
        Ok(result.as_str().unwrap_or("").to_string())
    }

    /// Resolve a selector to an element, bounded by the timeout
    fn locate(&self, selector: &Selector, timeout: Duration) -> Result<Element<'_>> {
        let found = match selector.to_locator() {
            Locator::Css(css) => self.tab.wait_for_element_with_custom_timeout(&css, timeout),
            Locator::Xpath(xpath) => self.tab.wait_for_xpath_with_custom_timeout(&xpath, timeout),
        };

        found.map_err(|_e| WitnessError::ElementNotFound {
            selector: selector.to_string(),
        })
    }

    /// Close the browser session
    pub async fn close(self) -> Result<()> {
        info!("Closing browser session");
        // Browser will be dropped and cleaned up automatically
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        debug!("BrowserSession dropped, browser will be cleaned up");
    }
}
