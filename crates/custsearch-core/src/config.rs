//! Configuration types for custsearch.
//!
//! [`Config::load`] reads `~/.config/custsearch/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[search]
results_limit  = 10
min_characters = 2

[server]
bind = "127.0.0.1:5175"

[client]
base_url       = "http://127.0.0.1:5175/api"
debounce_ms    = 300
timeout_ms     = 30000
retry_count    = 2
retry_delay_ms = 1000

[ui]
placeholder   = "Search customers..."
blur_grace_ms = 150
theme         = "default"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/custsearch/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[search]` section, shared by the server (ceiling) and the client
/// (request size, minimum query length).
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_results_limit")]
    pub results_limit: usize,
    #[serde(default = "default_min_characters")]
    pub min_characters: usize,
}

fn default_results_limit() -> usize { 10 }
fn default_min_characters() -> usize { 2 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            results_limit: default_results_limit(),
            min_characters: default_min_characters(),
        }
    }
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:5175".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

/// `[client]` section: transport and request-shaping knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_base_url() -> String { "http://127.0.0.1:5175/api".to_string() }
fn default_debounce_ms() -> u64 { 300 }
fn default_timeout_ms() -> u64 { 30_000 }
fn default_retry_count() -> u32 { 2 }
fn default_retry_delay_ms() -> u64 { 1_000 }

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            debounce_ms: default_debounce_ms(),
            timeout_ms: default_timeout_ms(),
            retry_count: default_retry_count(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl ClientConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// `[ui]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_blur_grace_ms")]
    pub blur_grace_ms: u64,
    /// Built-in theme name: `default` or `gruvbox_dark`.
    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_placeholder() -> String { "Search customers...".to_string() }
fn default_blur_grace_ms() -> u64 { 150 }
fn default_theme() -> String { "default".to_string() }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            blur_grace_ms: default_blur_grace_ms(),
            theme: default_theme(),
        }
    }
}

impl UiConfig {
    pub fn blur_grace(&self) -> Duration {
        Duration::from_millis(self.blur_grace_ms)
    }
}

/// A configuration value outside its allowed range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("search.results_limit must be at least 1")]
    ZeroResultsLimit,
    #[error("search.min_characters must be at least 1")]
    ZeroMinCharacters,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/custsearch/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Same as [`Config::load`] but against an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, DEFAULT_CONFIG.trim_start())?;
            tracing::info!(path = %path.display(), "wrote default config");
        }

        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.results_limit == 0 {
            return Err(ConfigError::ZeroResultsLimit);
        }
        if self.search.min_characters == 0 {
            return Err(ConfigError::ZeroMinCharacters);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("custsearch")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.search.results_limit, 10);
        assert_eq!(cfg.search.min_characters, 2);
        assert_eq!(cfg.client.debounce(), Duration::from_millis(300));
        assert_eq!(cfg.client.timeout(), Duration::from_secs(30));
        assert_eq!(cfg.client.retry_count, 2);
        assert_eq!(cfg.client.retry_delay(), Duration::from_secs(1));
        assert_eq!(cfg.ui.blur_grace(), Duration::from_millis(150));
        assert_eq!(cfg.ui.theme, "default");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_from_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(cfg.search.results_limit, 10);
    }

    #[test]
    fn user_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nresults_limit = 25\n\n[client]\ndebounce_ms = 50\n")
            .unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.search.results_limit, 25);
        assert_eq!(cfg.search.min_characters, 2);
        assert_eq!(cfg.client.debounce_ms, 50);
        assert_eq!(cfg.client.retry_count, 2);
    }

    #[test]
    fn ui_theme_is_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\ntheme = \"gruvbox_dark\"\n").unwrap();

        let cfg = Config::load_from(&path).unwrap();

        assert_eq!(cfg.ui.theme, "gruvbox_dark");
        assert_eq!(cfg.ui.blur_grace_ms, 150);
    }

    #[test]
    fn zero_limit_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\nresults_limit = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ConfigError>(),
            Some(&ConfigError::ZeroResultsLimit)
        );
    }
}
