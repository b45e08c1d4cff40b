//! # dictbot Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, validates and exposes the settings dictbot needs at
//! process start: the Telegram bot token, the two upstream endpoints and the
//! limits that bound each formatted reply.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags and environment variables (`DICTBOT_TOKEN`, handled by clap)
//! 2. The file named by `--config` / `DICTBOT_CONFIG`, or else the user file
//!    `~/.config/dictbot/config.toml` (platform equivalent via `directories`)
//! 3. Default values defined in the code
//!
//! Every section and field is optional. Unknown fields are rejected so typos
//! surface at startup instead of being silently ignored.
//!
//! ## Examples
//!
//! ```toml
//! [telegram]
//! token = "123456:ABC-DEF"
//!
//! [dictionary]
//! timeout_secs = 10
//!
//! [format]
//! max_meaning_groups = 3
//! max_examples = 1
//! ```
//!
//! ```rust
//! let cfg = config::load_config(cli.config.as_deref())?.with_token(args.token);
//! let token = cfg.require_token()?;
//! ```
//!
use crate::core::error::{DictbotError, Result};
use crate::core::formatting::FormatLimits;
use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info, warn};

/// Public dictionary service, English entries.
pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
pub const DEFAULT_TELEGRAM_URL: &str = "https://api.telegram.org";

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub format: FormatConfig,
}

/// Chat-platform settings used by `dictbot run`.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather. Only required by `run`.
    #[serde(default)]
    pub token: Option<String>,
    /// Base URL of the Bot API.
    #[serde(default = "default_telegram_url")]
    pub api_url: String,
    /// How long one `getUpdates` long poll may wait for new messages.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,
}

/// Settings for the dictionary lookup client.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct DictionaryConfig {
    /// Base endpoint; the case-folded word is appended as the last path segment.
    #[serde(default = "default_dictionary_url")]
    pub api_url: String,
    /// Total (connect + read) timeout of one lookup.
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

/// Bounds applied to every formatted reply.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FormatConfig {
    /// Meaning groups shown, and definitions shown per group.
    #[serde(default = "default_max_meaning_groups")]
    pub max_meaning_groups: usize,
    /// Definitions (by position within their group) that may show an example.
    #[serde(default = "default_max_examples")]
    pub max_examples: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_telegram_url(),
            poll_timeout_secs: default_poll_timeout_secs(),
        }
    }
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            api_url: default_dictionary_url(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            max_meaning_groups: default_max_meaning_groups(),
            max_examples: default_max_examples(),
        }
    }
}

fn default_telegram_url() -> String {
    DEFAULT_TELEGRAM_URL.to_string()
}
fn default_poll_timeout_secs() -> u64 {
    30
}
fn default_dictionary_url() -> String {
    DEFAULT_DICTIONARY_URL.to_string()
}
fn default_lookup_timeout_secs() -> u64 {
    10
}
fn default_max_meaning_groups() -> usize {
    3
}
fn default_max_examples() -> usize {
    1
}

impl Config {
    /// Overrides the file token with one supplied on the command line or
    /// through `DICTBOT_TOKEN`. `None` keeps the file value.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        if let Some(token) = token {
            self.telegram.token = Some(token);
        }
        self
    }

    /// Overrides the dictionary endpoint, e.g. from `define --api-url`.
    pub fn with_dictionary_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.dictionary.api_url = url;
        }
        self
    }

    /// Returns the configured token, or `DictbotError::MissingToken` if it is
    /// absent or blank.
    pub fn require_token(&self) -> Result<&str> {
        match self.telegram.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(DictbotError::MissingToken.into()),
        }
    }

    pub fn format_limits(&self) -> FormatLimits {
        FormatLimits {
            max_meaning_groups: self.format.max_meaning_groups,
            max_examples: self.format.max_examples,
        }
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.dictionary.timeout_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.telegram.poll_timeout_secs)
    }
}

/// # Load Configuration (`load_config`)
///
/// Reads the configuration from `explicit_path` if given, otherwise from the
/// user configuration file if one exists, otherwise uses defaults. The result
/// is validated before it is returned.
///
/// ## Arguments
///
/// * `explicit_path`: Optional path from `--config` / `DICTBOT_CONFIG`. `~` is expanded.
///
/// ## Errors
///
/// Returns an error if an explicitly named file is missing, if any file cannot
/// be read or parsed, or if validation fails.
pub fn load_config(explicit_path: Option<&str>) -> Result<Config> {
    let config = match explicit_path {
        Some(raw) => {
            let path = expand_path(raw)?;
            if !path.is_file() {
                return Err(DictbotError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                ))
                .into());
            }
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(&path)?
        }
        None => load_user_config()?.unwrap_or_default(),
    };

    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", redacted(&config));
    Ok(config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "DictBot", "dictbot") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| DictbotError::Config(format!("Failed to expand path '{}': {}", raw, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// # Validate Configuration (`validate_config`)
///
/// Checks value ranges and endpoint syntax. The token is not checked here
/// because only `run` needs it (see `Config::require_token`).
pub fn validate_config(config: &Config) -> Result<()> {
    if config.format.max_meaning_groups == 0 {
        return Err(DictbotError::Config(
            "format.max_meaning_groups must be at least 1".to_string(),
        )
        .into());
    }
    if config.format.max_examples == 0 {
        return Err(
            DictbotError::Config("format.max_examples must be at least 1".to_string()).into(),
        );
    }
    if config.dictionary.timeout_secs == 0 {
        return Err(
            DictbotError::Config("dictionary.timeout_secs must be at least 1".to_string()).into(),
        );
    }
    if config.telegram.poll_timeout_secs == 0 {
        return Err(DictbotError::Config(
            "telegram.poll_timeout_secs must be at least 1".to_string(),
        )
        .into());
    }
    validate_endpoint(&config.dictionary.api_url)?;
    validate_endpoint(&config.telegram.api_url)?;
    Ok(())
}

/// Parses `raw` as an absolute http(s) URL.
pub fn validate_endpoint(raw: &str) -> Result<reqwest::Url> {
    let url = reqwest::Url::parse(raw).map_err(|e| DictbotError::InvalidEndpoint {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DictbotError::InvalidEndpoint {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}', expected http or https", other),
        }
        .into()),
    }
}

/// Copy of the config safe to log: the token is masked.
fn redacted(config: &Config) -> Config {
    let mut copy = config.clone();
    if copy.telegram.token.is_some() {
        copy.telegram.token = Some("***".to_string());
    }
    copy
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp config file");
        file.write_all(content.as_bytes())
            .expect("Failed to write temp config file");
        file
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.dictionary.api_url, DEFAULT_DICTIONARY_URL);
        assert_eq!(cfg.lookup_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.telegram.api_url, DEFAULT_TELEGRAM_URL);
        assert_eq!(cfg.poll_timeout(), Duration::from_secs(30));
        assert_eq!(
            cfg.format_limits(),
            FormatLimits {
                max_meaning_groups: 3,
                max_examples: 1
            }
        );
        assert!(cfg.telegram.token.is_none());
        validate_config(&cfg).expect("Defaults should validate");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() -> Result<()> {
        let file = write_config("[format]\nmax_examples = 2\n");
        let cfg = load_config(file.path().to_str())?;

        assert_eq!(cfg.format.max_examples, 2);
        assert_eq!(cfg.format.max_meaning_groups, 3);
        assert_eq!(cfg.dictionary.api_url, DEFAULT_DICTIONARY_URL);
        Ok(())
    }

    #[test]
    fn test_load_full_file() -> Result<()> {
        let file = write_config(
            r#"
            [telegram]
            token = "123:abc"
            api_url = "http://127.0.0.1:9999"
            poll_timeout_secs = 5

            [dictionary]
            api_url = "http://127.0.0.1:9998/entries/en"
            timeout_secs = 2

            [format]
            max_meaning_groups = 4
            max_examples = 2
            "#,
        );
        let cfg = load_config(file.path().to_str())?;

        assert_eq!(cfg.require_token()?, "123:abc");
        assert_eq!(cfg.telegram.api_url, "http://127.0.0.1:9999");
        assert_eq!(cfg.poll_timeout(), Duration::from_secs(5));
        assert_eq!(cfg.dictionary.api_url, "http://127.0.0.1:9998/entries/en");
        assert_eq!(cfg.lookup_timeout(), Duration::from_secs(2));
        assert_eq!(cfg.format_limits().max_meaning_groups, 4);
        Ok(())
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let file = write_config("[format]\nmax_definitions = 3\n");
        assert!(load_config(file.path().to_str()).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = load_config(Some("/definitely/not/here/dictbot.toml"))
            .expect_err("Missing explicit config should fail");
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_zero_limits_fail_validation() {
        let mut cfg = Config::default();
        cfg.format.max_meaning_groups = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.format.max_examples = 0;
        assert!(validate_config(&cfg).is_err());

        let mut cfg = Config::default();
        cfg.dictionary.timeout_secs = 0;
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_endpoint_validation() {
        assert!(validate_endpoint("https://api.dictionaryapi.dev/api/v2/entries/en").is_ok());
        assert!(validate_endpoint("http://127.0.0.1:8080").is_ok());
        assert!(validate_endpoint("not a url").is_err());

        let err = validate_endpoint("ftp://example.com").expect_err("ftp should be rejected");
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_token_override_and_requirement() {
        let cfg = Config::default();
        assert!(cfg.require_token().is_err());

        let cfg = Config::default().with_token(Some("  ".to_string()));
        assert!(cfg.require_token().is_err());

        let cfg = Config::default().with_token(Some("42:xyz".to_string()));
        assert_eq!(cfg.require_token().expect("token should be set"), "42:xyz");

        let cfg = cfg.with_token(None);
        assert_eq!(cfg.require_token().expect("token should be kept"), "42:xyz");
    }

    #[test]
    fn test_redacted_masks_token() {
        let cfg = Config::default().with_token(Some("secret".to_string()));
        let shown = format!("{:?}", redacted(&cfg));
        assert!(!shown.contains("secret"));
        assert!(shown.contains("***"));
    }
}
