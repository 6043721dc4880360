//! Configuration for the runtime and the sample machines.
//!
//! Every field has a default, so an empty file (or no file at all) is a valid
//! configuration. The file is TOML:
//!
//! ```toml
//! [runtime]
//! stream_capacity = 64
//! history_limit = 64
//!
//! [counter]
//! enable_delay_ms = 1000
//!
//! [search]
//! min_query_len = 3
//! debounce_ms = 300
//!
//! [news]
//! base_url = "https://newsapi.org/v2/everything"
//! lookback_days = 10
//! sort_by = "popularity"
//! ```

use crate::core::DEFAULT_HISTORY_LIMIT;
use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "REFLOW_CONFIG";

/// Environment variable overriding `news.api_key`.
pub const NEWS_API_KEY_ENV: &str = "NEWS_API_KEY";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReflowConfig {
    pub runtime: RuntimeConfig,
    pub counter: CounterConfig,
    pub search: SearchConfig,
    pub news: NewsConfig,
}

/// Per-machine runtime limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Publications a subscriber may fall behind before it skips ahead
    pub stream_capacity: usize,
    /// Transitions retained in each machine's history
    pub history_limit: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stream_capacity: 64,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Delay before an `Enable` action re-enables the counter
    pub enable_delay_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            enable_delay_ms: 1000,
        }
    }
}

impl CounterConfig {
    pub fn enable_delay(&self) -> Duration {
        Duration::from_millis(self.enable_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Shortest query (in characters) that triggers a search
    pub min_query_len: usize,
    /// Quiet period before raw text input is dispatched
    pub debounce_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            debounce_ms: 300,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    /// How far back the `from` date reaches
    pub lookback_days: u32,
    pub sort_by: String,
    pub timeout_secs: u64,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://newsapi.org/v2/everything".to_string(),
            api_key: None,
            lookback_days: 10,
            sort_by: "popularity".to_string(),
            timeout_secs: 30,
        }
    }
}

impl NewsConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ReflowConfig {
    /// Load configuration from `$REFLOW_CONFIG`, falling back to defaults
    /// when the variable is unset. Environment overrides are applied last.
    pub fn load() -> Result<Self> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_path(PathBuf::from(path))?,
            None => Self::default(),
        };
        config.with_env_overrides().validated()
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validated()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(NEWS_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.news.api_key = Some(key);
            }
        }
        self
    }

    fn validated(self) -> Result<Self> {
        if self.runtime.stream_capacity == 0 {
            return Err(ConfigError::Invalid("runtime.stream_capacity must be at least 1".into()).into());
        }
        if self.search.min_query_len == 0 {
            return Err(ConfigError::Invalid("search.min_query_len must be at least 1".into()).into());
        }
        if self.news.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("news.base_url must not be empty".into()).into());
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ReflowConfig::from_toml("").unwrap();
        assert_eq!(config, ReflowConfig::default());
        assert_eq!(config.counter.enable_delay(), Duration::from_secs(1));
        assert_eq!(config.search.min_query_len, 3);
        assert_eq!(config.news.lookback_days, 10);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = ReflowConfig::from_toml(
            r#"
            [counter]
            enable_delay_ms = 250

            [news]
            api_key = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.counter.enable_delay(), Duration::from_millis(250));
        assert_eq!(config.news.api_key.as_deref(), Some("secret"));
        assert_eq!(config.news.sort_by, "popularity");
        assert_eq!(config.runtime, RuntimeConfig::default());
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = ReflowConfig::from_toml("[runtime]\nstream_capacity = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ReflowConfig::from_toml("[runtime\n").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ReflowConfig::load_from_path("/nonexistent/reflow.toml").unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::Read { .. })));
    }
}
