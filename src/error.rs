// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Data-access errors.
//!
//! A `success: false` envelope, a non-2xx status and a transport failure
//! are all surfaced the same way: the server's message verbatim when it sent
//! one, a fallback otherwise.

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(String),

    #[error("server rejected request{}: {}", status_suffix(.status), message_or_default(.message))]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },

    #[error("response could not be decoded: {0}")]
    Decode(String),

    #[error("request was cancelled")]
    Cancelled,

    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn message_or_default(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no message")
}

impl ApiError {
    pub fn server(status: Option<u16>, message: Option<String>) -> Self {
        // Blank messages carry nothing for the user.
        let message = message.filter(|m| !m.trim().is_empty());
        ApiError::Server { status, message }
    }

    /// The server's own message, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Server { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the user: the server's message verbatim, else `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

impl From<url::ParseError> for ApiError {
    fn from(e: url::ParseError) -> Self {
        ApiError::InvalidUrl(e.to_string())
    }
}

/// Result type for data-access calls.
pub type ApiResult<T> = Result<T, ApiError>;
