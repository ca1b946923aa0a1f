//! # Bot Configuration Module
//!
//! This module defines the process-wide configuration of the order bot:
//! Telegram credentials, the promotional channel, the administrator that
//! receives orders, and retry settings for order notifications.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::ConfigError;

// Constants for bot configuration
pub const DEFAULT_PROMO_MESSAGE_ID: i32 = 2;
pub const DEFAULT_LANGUAGE: &str = "uz";

/// Retry configuration for administrator notifications
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryConfig {
    /// Maximum number of retry attempts after the first failure
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_retry_delay_ms: 500,  // 0.5 seconds
            max_retry_delay_ms: 5000, // 5 seconds
        }
    }
}

/// Configuration structure for the order bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot token
    pub bot_token: String,
    /// Channel holding the promotional post forwarded on /start
    pub channel_id: i64,
    /// Message id of the promotional post inside the channel
    pub promo_message_id: i32,
    /// Chat that receives new order notifications
    pub admin_id: i64,
    /// Language used when the user's language is unknown or unsupported
    pub default_language: String,
    /// Optional directory with `<lang>/main.ftl` files overriding the built-in texts
    pub locales_dir: Option<PathBuf>,
    /// Notification retry settings
    pub delivery: DeliveryConfig,
}

impl BotConfig {
    /// Build the configuration from the process environment.
    ///
    /// Call `dotenv::dotenv()` beforehand to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Build the configuration from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let defaults = DeliveryConfig::default();

        Ok(Self {
            bot_token: required(vars, "TELEGRAM_BOT_TOKEN")?,
            channel_id: parse_required(vars, "CHANNEL_ID")?,
            promo_message_id: parse_or(vars, "PROMO_MESSAGE_ID", DEFAULT_PROMO_MESSAGE_ID)?,
            admin_id: parse_required(vars, "ADMIN_ID")?,
            default_language: vars
                .get("DEFAULT_LANGUAGE")
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            locales_dir: vars
                .get("LOCALES_DIR")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            delivery: DeliveryConfig {
                max_retries: parse_or(vars, "NOTIFY_MAX_RETRIES", defaults.max_retries)?,
                base_retry_delay_ms: parse_or(
                    vars,
                    "NOTIFY_BASE_RETRY_DELAY_MS",
                    defaults.base_retry_delay_ms,
                )?,
                max_retry_delay_ms: parse_or(
                    vars,
                    "NOTIFY_MAX_RETRY_DELAY_MS",
                    defaults.max_retry_delay_ms,
                )?,
            },
        })
    }
}

fn required(vars: &HashMap<String, String>, key: &str) -> Result<String, ConfigError> {
    match vars.get(key).map(|v| v.trim()) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_required<T: FromStr>(vars: &HashMap<String, String>, key: &str) -> Result<T, ConfigError> {
    let value = required(vars, key)?;
    parse_value(key, &value)
}

fn parse_or<T: FromStr>(
    vars: &HashMap<String, String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match vars.get(key) {
        Some(value) if !value.trim().is_empty() => parse_value(key, value),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        [
            ("TELEGRAM_BOT_TOKEN", "123:abc"),
            ("CHANNEL_ID", "-1001234567890"),
            ("ADMIN_ID", "42"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config = BotConfig::from_vars(&base_vars()).unwrap();

        assert_eq!(config.channel_id, -1001234567890);
        assert_eq!(config.admin_id, 42);
        assert_eq!(config.promo_message_id, DEFAULT_PROMO_MESSAGE_ID);
        assert_eq!(config.default_language, "uz");
        assert!(config.locales_dir.is_none());
        assert_eq!(config.delivery, DeliveryConfig::default());
    }

    #[test]
    fn test_missing_token() {
        let mut vars = base_vars();
        vars.remove("TELEGRAM_BOT_TOKEN");

        let err = BotConfig::from_vars(&vars).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TELEGRAM_BOT_TOKEN".to_string()));
    }

    #[test]
    fn test_invalid_admin_id() {
        let mut vars = base_vars();
        vars.insert("ADMIN_ID".to_string(), "admin".to_string());

        let err = BotConfig::from_vars(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "ADMIN_ID"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = base_vars();
        vars.insert("PROMO_MESSAGE_ID".to_string(), "7".to_string());
        vars.insert("DEFAULT_LANGUAGE".to_string(), " EN ".to_string());
        vars.insert("NOTIFY_MAX_RETRIES".to_string(), "0".to_string());

        let config = BotConfig::from_vars(&vars).unwrap();
        assert_eq!(config.promo_message_id, 7);
        assert_eq!(config.default_language, "en");
        assert_eq!(config.delivery.max_retries, 0);
    }
}
