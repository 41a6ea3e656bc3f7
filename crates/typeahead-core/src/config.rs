//! Configuration types for typeahead.
//!
//! [`Config::load`] reads `~/.config/typeahead/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[lookup]
endpoint    = "http://127.0.0.1:4000/sick"
max_results = 7
debounce_ms = 200

[cache]
history_ttl_secs  = 259200
response_ttl_secs = 60
history_prefix    = "search:history:"
response_prefix   = "search:response:"
quota_bytes       = 5242880

[ui]
placeholder = "검색어를 입력해주세요."
show_recent = true
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/typeahead/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// `[lookup]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupConfig {
    /// Suggestion endpoint; the query is appended as `?q=`.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_endpoint() -> String { "http://127.0.0.1:4000/sick".to_string() }
fn default_max_results() -> usize { 7 }
fn default_debounce_ms() -> u64 { 200 }

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            max_results: default_max_results(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[cache]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_history_ttl_secs")]
    pub history_ttl_secs: i64,
    #[serde(default = "default_response_ttl_secs")]
    pub response_ttl_secs: i64,
    #[serde(default = "default_history_prefix")]
    pub history_prefix: String,
    #[serde(default = "default_response_prefix")]
    pub response_prefix: String,
    /// Store file; defaults to `$XDG_DATA_HOME/typeahead/store.json`.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: usize,
}

fn default_history_ttl_secs() -> i64 { 3 * 24 * 60 * 60 }
fn default_response_ttl_secs() -> i64 { 60 }
fn default_history_prefix() -> String { "search:history:".to_string() }
fn default_response_prefix() -> String { "search:response:".to_string() }
fn default_quota_bytes() -> usize { 5 * 1024 * 1024 }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            history_ttl_secs: default_history_ttl_secs(),
            response_ttl_secs: default_response_ttl_secs(),
            history_prefix: default_history_prefix(),
            response_prefix: default_response_prefix(),
            store_path: None,
            quota_bytes: default_quota_bytes(),
        }
    }
}

impl CacheConfig {
    pub fn history_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.history_ttl_secs)
    }

    pub fn response_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.response_ttl_secs)
    }

    /// Configured store path, or the per-user default.
    pub fn resolved_store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(default_store_path)
    }
}

/// `[ui]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    #[serde(default = "default_show_recent")]
    pub show_recent: bool,
}

fn default_placeholder() -> String { "검색어를 입력해주세요.".to_string() }
fn default_show_recent() -> bool { true }

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            show_recent: default_show_recent(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/typeahead/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
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

    /// Parse a TOML document layered over the defaults.
    pub fn from_toml(src: &str) -> anyhow::Result<Self> {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from_str(src, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn home() -> PathBuf {
    PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
}

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home().join(".config"))
        .join("typeahead")
        .join("config.toml")
}

fn default_store_path() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home().join(".local").join("share"))
        .join("typeahead")
        .join("store.json")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
