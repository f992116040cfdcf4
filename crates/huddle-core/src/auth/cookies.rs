//! Session cookies persisted between CLI invocations.
//!
//! Stored at `${HUDDLE_HOME}/cookies.json` as a map from identity endpoint to
//! the `Cookie` header that endpoint expects. The file is written with 0600
//! permissions on unix.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieCache {
    #[serde(flatten)]
    endpoints: BTreeMap<String, String>,
}

impl CookieCache {
    pub fn cache_path() -> PathBuf {
        paths::cookies_path()
    }

    /// Loads the cache from the default path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::cache_path())
    }

    /// Loads the cache from `path`. A missing file yields an empty cache.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read cookies from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cookies from {}", path.display()))
    }

    /// Saves the cache to the default path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::cache_path())
    }

    /// Saves the cache to `path`, removing the file once the cache is empty.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written or removed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if self.endpoints.is_empty() {
            if path.exists() {
                fs::remove_file(path)
                    .with_context(|| format!("Failed to remove {}", path.display()))?;
            }
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("Failed to serialize cookies")?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(path)
            .with_context(|| format!("Failed to open {} for writing", path.display()))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))
    }

    pub fn get(&self, endpoint: &str) -> Option<&str> {
        self.endpoints.get(endpoint).map(String::as_str)
    }

    pub fn set(&mut self, endpoint: &str, cookie: String) {
        self.endpoints.insert(endpoint.to_string(), cookie);
    }

    pub fn remove(&mut self, endpoint: &str) -> Option<String> {
        self.endpoints.remove(endpoint)
    }
}
