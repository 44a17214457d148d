//! Configuration module for environment variable parsing.
//!
//! Reads all configuration from environment variables, optionally seeded from a
//! `.env` file in the working directory. Missing required values are fatal.

use std::env;
use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// Default port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;

/// Default cap on inbound webhook bodies (10 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while loading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid boolean value for {name}: {value:?}")]
    InvalidBool { name: &'static str, value: String },

    #[error("invalid value for {name}: {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid URL for {name}: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Shared secret used to verify `X-Miniflux-Signature`
    pub webhook_secret: String,

    /// Base URL of the Hoarder API, without a trailing slash
    pub hoarder_api_url: String,

    /// Bearer token for the Hoarder API
    pub hoarder_api_token: String,

    /// Whether `new_entries` events create bookmarks
    pub save_new_entries: bool,

    /// Port for the web server to listen on
    pub port: u16,

    /// Largest webhook body accepted, in bytes
    pub max_body_bytes: usize,
}

impl fmt::Debug for Config {
    // Secret and token never reach logs or panics
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("webhook_secret", &"[redacted]")
            .field("hoarder_api_url", &self.hoarder_api_url)
            .field("hoarder_api_token", &"[redacted]")
            .field("save_new_entries", &self.save_new_entries)
            .field("port", &self.port)
            .field("max_body_bytes", &self.max_body_bytes)
            .finish()
    }
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file is read first if present; variables already set in the
    /// environment take precedence over it.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "dotenv_loaded"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "dotenv_load_failed"),
        }

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let webhook_secret = required("WEBHOOK_SECRET")?;
        let hoarder_api_url = parse_base_url("HOARDER_API_URL", &required("HOARDER_API_URL")?)?;
        let hoarder_api_token = required("HOARDER_API_TOKEN")?;

        let save_new_entries = match lookup("SAVE_NEW_ENTRIES") {
            Some(raw) if !raw.trim().is_empty() => parse_bool("SAVE_NEW_ENTRIES", &raw)?,
            _ => false,
        };

        let port = match lookup("PORT") {
            Some(raw) if !raw.trim().is_empty() => parse_port(&raw)?,
            _ => DEFAULT_PORT,
        };

        let max_body_bytes = match lookup("MAX_BODY_BYTES") {
            Some(raw) if !raw.trim().is_empty() => {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidNumber {
                        name: "MAX_BODY_BYTES",
                        value: raw.clone(),
                    })?
            }
            _ => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Config {
            webhook_secret,
            hoarder_api_url,
            hoarder_api_token,
            save_new_entries,
            port,
            max_body_bytes,
        })
    }
}

/// Parse a boolean flag the way the feed-reader's own tooling spells them.
fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "f" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            name,
            value: raw.to_string(),
        }),
    }
}

/// Parse a port given either as `8080` or `:8080`.
fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(':')
        .unwrap_or(trimmed)
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name: "PORT",
            value: raw.to_string(),
        })
}

/// Validate an absolute http(s) URL and drop any trailing slash.
fn parse_base_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    let parsed = Url::parse(raw).map_err(|e| ConfigError::InvalidUrl {
        name,
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            name,
            reason: format!("unsupported scheme {:?}", parsed.scheme()),
        });
    }

    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("WEBHOOK_SECRET", "s3cret"),
        ("HOARDER_API_URL", "https://hoarder.example.com/"),
        ("HOARDER_API_TOKEN", "tok"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();
        assert_eq!(config.webhook_secret, "s3cret");
        assert_eq!(config.hoarder_api_url, "https://hoarder.example.com");
        assert_eq!(config.hoarder_api_token, "tok");
        assert!(!config.save_new_entries);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
    }

    #[test]
    fn test_missing_required() {
        for missing in ["WEBHOOK_SECRET", "HOARDER_API_URL", "HOARDER_API_TOKEN"] {
            let pairs: Vec<_> = REQUIRED
                .iter()
                .copied()
                .filter(|(k, _)| *k != missing)
                .collect();
            match Config::from_lookup(lookup_from(&pairs)) {
                Err(ConfigError::Missing(name)) => assert_eq!(name, missing),
                other => panic!("expected Missing({missing}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_blank_secret_is_missing() {
        let mut pairs = REQUIRED.to_vec();
        pairs[0] = ("WEBHOOK_SECRET", "   ");
        assert!(matches!(
            Config::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::Missing("WEBHOOK_SECRET"))
        ));
    }

    #[test]
    fn test_optional_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SAVE_NEW_ENTRIES", "TRUE"));
        pairs.push(("PORT", ":9090"));
        pairs.push(("MAX_BODY_BYTES", "2048"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert!(config.save_new_entries);
        assert_eq!(config.port, 9090);
        assert_eq!(config.max_body_bytes, 2048);
    }

    #[test]
    fn test_invalid_bool() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("SAVE_NEW_ENTRIES", "maybe"));
        assert!(matches!(
            Config::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::InvalidBool { name: "SAVE_NEW_ENTRIES", .. })
        ));
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        assert!(matches!(
            Config::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::InvalidNumber { name: "PORT", .. })
        ));
    }

    #[test]
    fn test_invalid_url() {
        let mut pairs = REQUIRED.to_vec();
        pairs[1] = ("HOARDER_API_URL", "hoarder.local");
        assert!(matches!(
            Config::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::InvalidUrl { .. })
        ));

        pairs[1] = ("HOARDER_API_URL", "ftp://hoarder.local");
        assert!(matches!(
            Config::from_lookup(lookup_from(&pairs)),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let config = Config::from_lookup(lookup_from(REQUIRED)).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("s3cret"));
        assert!(!debug.contains("\"tok\""));
        assert!(debug.contains("[redacted]"));
        assert!(debug.contains("https://hoarder.example.com"));
    }

    #[test]
    fn test_parse_bool_spellings() {
        for raw in ["1", "t", "True", "yes", "ON"] {
            assert!(parse_bool("X", raw).unwrap(), "{raw}");
        }
        for raw in ["0", "f", "FALSE", "no", "off"] {
            assert!(!parse_bool("X", raw).unwrap(), "{raw}");
        }
    }
}
