//! Centralized bot configuration.
//!
//! Loaded via the `config` crate from an optional YAML file, overridden by
//! environment variables prefixed with `CLASSMATE` (nested keys separated by
//! `__`, e.g. `CLASSMATE__TELEGRAM__TOKEN`).

use classmate_ai::LlmBackendConfig;
use classmate_ai::backend::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use classmate_timetable::{LessonParser, Locale};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "CLASSMATE";

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Telegram connection.
    pub telegram: TelegramConfig,

    /// Default log filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Language of prompts and day names.
    #[serde(default)]
    pub locale: Locale,

    /// Schedule entry behavior.
    #[serde(default)]
    pub entry: EntryConfig,

    /// Language model used by `/ask`.
    #[serde(default)]
    pub llm: LlmConfig,

    /// Auth redirect listener.
    #[serde(default)]
    pub redirect: RedirectConfig,
}

/// Telegram connection settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token.
    pub token: String,
}

/// Schedule entry settings.
#[derive(Debug, Clone, Deserialize)]
pub struct EntryConfig {
    /// Reject lessons that do not end after they start.
    #[serde(default)]
    pub strict_lesson_times: bool,

    /// Drop entry sessions idle for this long. Unset keeps them forever.
    #[serde(default)]
    pub idle_timeout_minutes: Option<u64>,

    /// Interval between idle-session sweeps, in seconds.
    #[serde(default = "default_cleanup_interval_seconds")]
    pub cleanup_interval_seconds: u64,
}

/// Language model settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Base URL of an OpenAI-compatible API.
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,

    /// Chat model.
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API key. `/ask` is disabled without one.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Replaces the built-in system prompt.
    #[serde(default)]
    pub system_prompt: Option<String>,
}

/// Auth redirect listener settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RedirectConfig {
    /// Address to listen on. The listener is off when unset.
    #[serde(default)]
    pub addr: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_cleanup_interval_seconds() -> u64 {
    300
}

fn default_llm_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_llm_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for EntryConfig {
    fn default() -> Self {
        Self {
            strict_lesson_times: false,
            idle_timeout_minutes: None,
            cleanup_interval_seconds: default_cleanup_interval_seconds(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            system_prompt: None,
        }
    }
}

impl EntryConfig {
    /// Lesson parser matching `strict_lesson_times`.
    #[must_use]
    pub fn parser(&self) -> LessonParser {
        if self.strict_lesson_times {
            LessonParser::strict()
        } else {
            LessonParser::permissive()
        }
    }

    /// Idle timeout, if eviction is enabled.
    #[must_use]
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.idle_timeout_minutes
            .map(|minutes| Duration::from_secs(minutes.saturating_mul(60)))
    }

    /// Interval between idle-session sweeps, never zero.
    #[must_use]
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds.max(1))
    }
}

impl LlmConfig {
    /// Backend configuration, or `None` when no API key is set.
    #[must_use]
    pub fn backend(&self) -> Option<LlmBackendConfig> {
        let api_key = self.api_key.as_ref().filter(|key| !key.is_empty())?;
        Some(LlmBackendConfig {
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            api_key: Some(api_key.clone()),
            ..LlmBackendConfig::default()
        })
    }
}

impl BotConfig {
    /// Loads configuration from `path` (if it exists) and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is malformed or required configuration
    /// is missing or invalid.
    pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, config::Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with_env(
        path: &Path,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(environment.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}
