//! # Error Types Module
//!
//! This module defines the error types shared by the order dialogue, the
//! Telegram transport and the configuration loader.

/// Errors raised while loading the bot configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A required environment variable is absent
    Missing(String),
    /// An environment variable is present but cannot be parsed
    Invalid { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing configuration: {key} must be set"),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid configuration: {key}={value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors returned by outbound transport operations
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The Telegram API rejected the request
    Api(String),
    /// The request never reached the Telegram API
    Network(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Api(msg) => write!(f, "Telegram API error: {msg}"),
            TransportError::Network(msg) => write!(f, "Network error: {msg}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<teloxide::RequestError> for TransportError {
    fn from(err: teloxide::RequestError) -> Self {
        match err {
            teloxide::RequestError::Network(e) => TransportError::Network(e.to_string()),
            other => TransportError::Api(other.to_string()),
        }
    }
}

/// Reasons a customer name is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameError {
    TooLong,
    ContainsDigit,
}

impl std::fmt::Display for NameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameError::TooLong => write!(f, "name is too long"),
            NameError::ContainsDigit => write!(f, "name contains a digit"),
        }
    }
}

impl std::error::Error for NameError {}
