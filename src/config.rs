// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the console. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CONSOLE_API_BASE_URL` | Base URL of the community REST API | `http://localhost:4000/api/` |
//! | `CONSOLE_HTTP_TIMEOUT_SECS` | Per-request timeout | `15` |
//! | `CONSOLE_DELETE_COUNTDOWN_SECS` | Cool-down before a delete can be confirmed | `5` |
//! | `CONSOLE_SESSION_FILE` | File holding the persisted session | unset (in-memory) |
//! | `CONSOLE_EMAIL` / `CONSOLE_PASSWORD` | Credentials used by the binary when no session is persisted | unset |
//! | `CONSOLE_GROUP_ID` | Group the binary loads and summarizes | unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,comcell_console=debug` |

use std::{env, path::PathBuf, time::Duration};

use url::Url;

use crate::logging::LogFormat;

/// Environment variable name for the REST API base URL.
pub const API_BASE_URL_ENV: &str = "CONSOLE_API_BASE_URL";

/// Environment variable name for the HTTP request timeout, in seconds.
pub const HTTP_TIMEOUT_ENV: &str = "CONSOLE_HTTP_TIMEOUT_SECS";

/// Environment variable name for the delete confirmation countdown, in seconds.
pub const DELETE_COUNTDOWN_ENV: &str = "CONSOLE_DELETE_COUNTDOWN_SECS";

/// Environment variable name for the persisted session file.
///
/// When unset the session only lives as long as the process.
pub const SESSION_FILE_ENV: &str = "CONSOLE_SESSION_FILE";

/// Environment variable names for the binary's sign-in credentials.
pub const EMAIL_ENV: &str = "CONSOLE_EMAIL";
pub const PASSWORD_ENV: &str = "CONSOLE_PASSWORD";

/// Environment variable name for the group the binary inspects.
pub const GROUP_ID_ENV: &str = "CONSOLE_GROUP_ID";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default API base URL (local backend).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:4000/api/";

/// Default request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Default delete confirmation countdown.
pub const DEFAULT_DELETE_COUNTDOWN: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {reason}")]
    InvalidUrl { var: &'static str, reason: String },

    #[error("{var} must be a whole number of seconds, got {value:?}")]
    InvalidSeconds { var: &'static str, value: String },
}

/// Console configuration resolved from the environment.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Base URL every endpoint path is joined onto. Always ends with `/`.
    pub api_base_url: Url,
    pub http_timeout: Duration,
    pub delete_countdown: Duration,
    pub session_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default API base URL is valid"),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            delete_countdown: DEFAULT_DELETE_COUNTDOWN,
            session_file: None,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = match lookup(API_BASE_URL_ENV) {
            Some(raw) => parse_base_url(&raw)?,
            None => defaults.api_base_url,
        };

        let http_timeout = match lookup(HTTP_TIMEOUT_ENV) {
            Some(raw) => parse_seconds(HTTP_TIMEOUT_ENV, &raw)?,
            None => defaults.http_timeout,
        };

        let delete_countdown = match lookup(DELETE_COUNTDOWN_ENV) {
            Some(raw) => parse_seconds(DELETE_COUNTDOWN_ENV, &raw)?,
            None => defaults.delete_countdown,
        };

        let session_file = lookup(SESSION_FILE_ENV)
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);

        let log_format = lookup(LOG_FORMAT_ENV)
            .map(|raw| LogFormat::parse(&raw))
            .unwrap_or_default();

        Ok(Self {
            api_base_url,
            http_timeout,
            delete_countdown,
            session_file,
            log_format,
        })
    }
}

/// Parse a base URL, forcing a trailing slash so relative joins keep the path prefix.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidUrl {
        var: API_BASE_URL_ENV,
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl {
            var: API_BASE_URL_ENV,
            reason: "URL cannot be used as a base".to_string(),
        });
    }

    Ok(url)
}

fn parse_seconds(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| ConfigError::InvalidSeconds {
            var,
            value: raw.to_string(),
        })
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

    #[test]
    fn defaults_apply_when_environment_is_empty() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.api_base_url.as_str(), DEFAULT_API_BASE_URL);
        assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
        assert_eq!(config.delete_countdown, Duration::from_secs(5));
        assert!(config.session_file.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[(
            API_BASE_URL_ENV,
            "https://church.example.org/api",
        )]))
        .unwrap();
        assert_eq!(config.api_base_url.as_str(), "https://church.example.org/api/");
        assert_eq!(
            config.api_base_url.join("auth/login").unwrap().as_str(),
            "https://church.example.org/api/auth/login"
        );
    }

    #[test]
    fn rejects_invalid_values() {
        let bad_url = ConsoleConfig::from_lookup(lookup_from(&[(API_BASE_URL_ENV, "not a url")]));
        assert!(matches!(bad_url, Err(ConfigError::InvalidUrl { .. })));

        let bad_secs =
            ConsoleConfig::from_lookup(lookup_from(&[(DELETE_COUNTDOWN_ENV, "five")]));
        assert!(matches!(bad_secs, Err(ConfigError::InvalidSeconds { .. })));
    }

    #[test]
    fn reads_overrides() {
        let config = ConsoleConfig::from_lookup(lookup_from(&[
            (HTTP_TIMEOUT_ENV, "30"),
            (DELETE_COUNTDOWN_ENV, "0"),
            (SESSION_FILE_ENV, "/tmp/console-session.json"),
            (LOG_FORMAT_ENV, "json"),
        ]))
        .unwrap();
        assert_eq!(config.http_timeout, Duration::from_secs(30));
        assert_eq!(config.delete_countdown, Duration::ZERO);
        assert_eq!(
            config.session_file,
            Some(PathBuf::from("/tmp/console-session.json"))
        );
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
