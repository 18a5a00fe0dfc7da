//! Browser automation and screenshot capture for Witness verification runs
//!
//! This crate wraps the Chrome DevTools Protocol (CDP) surface a verification
//! run needs: launching a headless browser, navigating, waiting for selectors,
//! clicking, filling form fields, and capturing PNG evidence.
//!
//! # Features
//!
//! - **Browser Management**: Launch headless Chrome/Chromium or attach to a
//!   running instance over its DevTools port
//! - **Selector Waits**: Bounded waits for text, CSS, and role selectors
//! - **Screenshot Capture**: Full-page PNGs stored under one output directory
//! - **Readiness Probe**: Bounded HTTP polling for servers that are still
//!   starting up
//!
//! # Example
//!
//! ```no_run
//! use witness_browser::{BrowserSession, ScreenshotStore};
//! use witness_core::{BrowserSettings, Selector};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Launch browser
//!     let session = BrowserSession::launch(&BrowserSettings::default()).await?;
//!
//!     // Navigate and wait for the page to show its heading
//!     session.navigate("http://localhost:5173/").await?;
//!     session
//!         .wait_for(&Selector::text("Bounty Board"), Duration::from_secs(30))
//!         .await?;
//!
//!     // Capture evidence
//!     let store = ScreenshotStore::new("verification");
//!     let shot = store.save("landing", &session.capture_page().await?).await?;
//!     println!("Screenshot saved: {}", shot.path.display());
//!
//!     // Clean up
//!     session.close().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Requirements
//!
//! - Chrome or Chromium browser installed
//! - For headless operation, no additional setup required
//! - For attaching to an existing browser: `chrome --remote-debugging-port=9222`
//!
//! # Architecture
//!
//! The crate is organized into modules:
//!
//! - [`browser`]: Browser lifecycle and session management
//! - [`screenshot`]: Screenshot capture and artifact storage
//! - [`readiness`]: Bounded wait-for-server polling
//! - [`error`]: Error types for browser operations

pub mod browser;
pub mod error;
pub mod readiness;
pub mod screenshot;

// Re-export commonly used types
pub use browser::BrowserSession;
pub use error::{BrowserError, Result};
pub use readiness::wait_for_server;
pub use screenshot::{Screenshot, ScreenshotStore};
