//! Screenshot storage
//!
//! Screenshots are the evidence a verification run produces: one PNG per
//! `screenshot` step, written under the configured output directory, plus a
//! best-effort diagnostic capture when a step fails.

use crate::error::{BrowserError, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Metadata for a stored screenshot artifact
#[derive(Debug, Clone)]
pub struct Screenshot {
    /// Artifact name (file stem)
    pub name: String,
    /// Where the PNG was written
    pub path: PathBuf,
    /// Size in bytes
    pub size_bytes: u64,
    /// When created
    pub created_at: DateTime<Utc>,
}

/// Writes screenshot artifacts into one output directory
pub struct ScreenshotStore {
    dir: PathBuf,
}

impl ScreenshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Output directory the store writes into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write PNG data under the given artifact name
    ///
    /// Creates the output directory on first use. The file lands at
    /// `<dir>/<name>.png`.
    pub async fn save(&self, name: &str, data: &[u8]) -> Result<Screenshot> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            BrowserError::Screenshot(format!(
                "Failed to create output directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self.dir.join(format!("{}.png", name));
        fs::write(&path, data).await.map_err(|e| {
            BrowserError::Screenshot(format!("Failed to write {}: {}", path.display(), e))
        })?;

        info!("Screenshot stored: {} ({} bytes)", path.display(), data.len());

        Ok(Screenshot {
            name: name.to_string(),
            path,
            size_bytes: data.len() as u64,
            created_at: Utc::now(),
        })
    }
}
