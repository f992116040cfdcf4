//! Configuration management for Huddle.
//!
//! Loads configuration from ${HUDDLE_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable that overrides `identity_url`.
pub const IDENTITY_URL_ENV: &str = "HUDDLE_IDENTITY_URL";

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

/// Recursively merges items from source table into target table.
fn merge_items(target: &mut toml_edit::Table, source: &toml_edit::Table) {
    use toml_edit::Item;

    for (key, value) in source.iter() {
        match value {
            Item::Value(v) => {
                target[key] = Item::Value(v.clone());
            }
            Item::Table(src_table) => {
                if let Some(Item::Table(target_table)) = target.get_mut(key) {
                    merge_items(target_table, src_table);
                } else {
                    target[key] = Item::Table(src_table.clone());
                }
            }
            Item::ArrayOfTables(src_arr) => {
                target[key] = Item::ArrayOfTables(src_arr.clone());
            }
            Item::None => {}
        }
    }
}

pub mod paths {
    //! Path resolution for Huddle configuration and data directories.
    //!
    //! HUDDLE_HOME resolution order:
    //! 1. HUDDLE_HOME environment variable (if set)
    //! 2. ~/.config/huddle (default)
    //! 3. ./.huddle when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the Huddle home directory.
    pub fn huddle_home() -> PathBuf {
        if let Ok(home) = std::env::var("HUDDLE_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".huddle"),
            |h| h.join(".config").join("huddle"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        huddle_home().join("config.toml")
    }

    /// Returns the path to the persisted session cookies.
    pub fn cookies_path() -> PathBuf {
        huddle_home().join("cookies.json")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        huddle_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GraphQL endpoint of the identity service.
    pub identity_url: String,

    /// Timeout for identity requests in seconds (0 disables).
    pub request_timeout_secs: u64,

    /// Log filter directive used when HUDDLE_LOG is unset.
    pub log_level: String,

    /// Sidebar links shown to signed-in users.
    pub chatrooms: Vec<String>,
}

impl Config {
    const DEFAULT_IDENTITY_URL: &str = "http://localhost:4000/graphql";
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
    const DEFAULT_LOG_LEVEL: &str = "info";

    /// Loads configuration from the default config path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to `path`.
    ///
    /// # Errors
    /// Fails if the file already exists (no silent overwrite) or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Generates a fresh config TOML from Rust defaults.
    ///
    /// Used by `xtask update-default-config` to keep `default_config.toml`
    /// in sync with `Config::default()`. Comments come from the embedded
    /// template, values from the defaults.
    ///
    /// # Errors
    /// Returns an error if serialization or template parsing fails.
    pub fn generate() -> Result<String> {
        use toml_edit::DocumentMut;

        let generated_toml = toml::to_string(&Config::default())
            .context("Failed to serialize default config to TOML")?;

        let mut doc: DocumentMut = default_config_template()
            .parse()
            .context("Failed to parse default config template")?;
        let generated_doc: DocumentMut = generated_toml
            .parse()
            .context("Failed to parse generated config")?;

        merge_items(doc.as_table_mut(), generated_doc.as_table());
        Ok(doc.to_string())
    }

    /// Returns the identity URL, honoring the HUDDLE_IDENTITY_URL override.
    pub fn effective_identity_url(&self) -> String {
        self.identity_url_with_override(std::env::var(IDENTITY_URL_ENV).ok().as_deref())
    }

    fn identity_url_with_override(&self, env_value: Option<&str>) -> String {
        match env_value.map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self.identity_url.clone(),
        }
    }

    /// Parses the effective identity URL.
    ///
    /// # Errors
    /// Returns an error if the URL is malformed.
    pub fn identity_endpoint(&self) -> Result<Url> {
        let raw = self.effective_identity_url();
        Url::parse(&raw).with_context(|| format!("Invalid identity_url: {raw}"))
    }

    /// Returns the request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            identity_url: Self::DEFAULT_IDENTITY_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            chatrooms: vec!["Chatrooms".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.identity_url, "http://localhost:4000/graphql");
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "identity_url = \"https://chat.example.com/graphql\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.identity_url, "https://chat.example.com/graphql");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.chatrooms, vec!["Chatrooms".to_string()]);
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "identity_url = [").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_init_creates_config_with_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("identity_url"));
        assert!(contents.contains("# Timeout for identity requests"));
        assert_eq!(Config::load_from(&config_path).unwrap(), Config::default());
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        assert!(Config::init(&config_path).is_err());
    }

    #[test]
    fn test_generate_matches_defaults() {
        let generated = Config::generate().unwrap();
        let parsed: Config = toml::from_str(&generated).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(generated.contains("# Sidebar links"));
    }

    #[test]
    fn test_timeout_zero_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.request_timeout(), None);
        assert_eq!(
            Config::default().request_timeout(),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_identity_url_override() {
        let config = Config::default();
        assert_eq!(
            config.identity_url_with_override(Some("http://mock:1/graphql")),
            "http://mock:1/graphql"
        );
        assert_eq!(
            config.identity_url_with_override(Some("  ")),
            config.identity_url
        );
        assert_eq!(config.identity_url_with_override(None), config.identity_url);
    }

    #[test]
    fn test_invalid_identity_url_is_rejected() {
        let config = Config {
            identity_url: "not a url".to_string(),
            ..Default::default()
        };
        // Only meaningful when the override is unset in the test environment.
        if std::env::var(IDENTITY_URL_ENV).is_err() {
            assert!(config.identity_endpoint().is_err());
        }
    }
}
