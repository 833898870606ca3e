// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.

use super::gate::MutationAction;

/// Authorization error type.
///
/// Raised before any network call is made; the message is meant to be
/// shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No session user, or the session user has no id
    NotAuthenticated { action: MutationAction },
    /// The gate denied the action for the current user
    PermissionDenied { action: MutationAction },
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::NotAuthenticated { .. } => "not_authenticated",
            AuthError::PermissionDenied { .. } => "permission_denied",
        }
    }

    /// The action that was refused.
    pub fn action(&self) -> MutationAction {
        match self {
            AuthError::NotAuthenticated { action } | AuthError::PermissionDenied { action } => {
                *action
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::NotAuthenticated { action } => write!(
                f,
                "You do not have permission to {}. Please sign in first.",
                action.describe()
            ),
            AuthError::PermissionDenied { action } => {
                write!(f, "You do not have permission to {}.", action.describe())
            }
        }
    }
}

impl std::error::Error for AuthError {}
