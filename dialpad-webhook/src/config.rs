//! Configuration module for environment variable parsing.
//!
//! All settings come from the environment; the webhook secret is never
//! compiled into the binary.

use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::warn;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Secret shared with Dialpad when the webhook was registered
    pub webhook_secret: Option<String>,

    /// Whether token signatures are checked against `webhook_secret`
    pub verify_signature: bool,

    /// Optional key callers must present (`x-functions-key` header or `code` query)
    pub function_key: Option<String>,
}

/// Configuration that cannot be used to start the server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DIALPAD_WEBHOOK_SECRET must be set when signature verification is enabled")]
    MissingSecret,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: parse_or("PORT", 8080),

            webhook_secret: non_blank("DIALPAD_WEBHOOK_SECRET"),

            verify_signature: parse_bool("DIALPAD_VERIFY_SIGNATURE", true),

            function_key: non_blank("DIALPAD_FUNCTION_KEY"),
        }
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verify_signature && self.webhook_secret.is_none() {
            return Err(ConfigError::MissingSecret);
        }
        Ok(())
    }

    /// Secret used for token verification, empty when unset.
    pub fn secret(&self) -> &str {
        self.webhook_secret.as_deref().unwrap_or_default()
    }
}

/// Parse a value with `FromStr`, warning and using the default when it is invalid.
fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid value, using default");
            default
        }
    }
}

/// Parse a boolean flag such as "true", "0" or "off".
fn parse_bool(name: &str, default: bool) -> bool {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            warn!(env_var = name, value = %raw, "Invalid boolean value, using default");
            default
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_blank(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
