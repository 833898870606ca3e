// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Mutation Dispatch
//!
//! Every mutating request goes through [`MutationDispatcher::dispatch`],
//! which asks the authorization gate again immediately before sending,
//! whatever state the triggering control was in. A disabled button can be
//! stale (role changed mid-session, another tab changed ownership); the
//! dispatcher is the last check.
//!
//! ## Outcomes
//!
//! - Denied: no request is sent, a permission notice is pushed
//! - Sent and failed: the server's message (or a fallback) is pushed
//! - Sent and succeeded: a success notice is pushed
//!
//! There are no retries; the user re-triggers a failed action.

use std::future::Future;

use tracing::{debug, info, warn};

use crate::auth::{AuthError, AuthorizationGate, MutationAction, OwnershipRecord};
use crate::error::{ApiError, ApiResult};
use crate::notify::Notifier;
use crate::session::IdentityProvider;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Blocked before any request was sent.
    #[error(transparent)]
    Denied(#[from] AuthError),

    /// The request was sent and failed. `message` is what the user saw.
    #[error("{message}")]
    Failed {
        action: MutationAction,
        message: String,
        #[source]
        source: ApiError,
    },

    /// The owning screen went away before the response arrived.
    #[error("request was cancelled")]
    Cancelled,
}

impl DispatchError {
    /// User-facing text for this error.
    pub fn user_message(&self) -> String {
        match self {
            DispatchError::Denied(e) => e.to_string(),
            DispatchError::Failed { message, .. } => message.clone(),
            DispatchError::Cancelled => "The request was cancelled.".to_string(),
        }
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, DispatchError::Denied(_))
    }
}

/// Gate-checked executor for mutating API calls.
#[derive(Debug, Clone)]
pub struct MutationDispatcher<P> {
    gate: AuthorizationGate<P>,
    notifier: Notifier,
}

impl<P: IdentityProvider> MutationDispatcher<P> {
    pub fn new(identity: P, notifier: Notifier) -> Self {
        Self {
            gate: AuthorizationGate::new(identity),
            notifier,
        }
    }

    pub fn gate(&self) -> &AuthorizationGate<P> {
        &self.gate
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Re-check the gate, then run `call` exactly once if allowed.
    ///
    /// `ownership` is the resource's current ownership record; pass `None`
    /// for actions that only superusers may perform (e.g. role changes).
    pub async fn dispatch<T, F, Fut>(
        &self,
        action: MutationAction,
        ownership: Option<&OwnershipRecord>,
        call: F,
    ) -> Result<T, DispatchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ApiResult<T>>,
    {
        let user = match self.gate.authorize(action, ownership) {
            Ok(user) => user,
            Err(denied) => {
                warn!(
                    action = ?action,
                    code = denied.error_code(),
                    "Mutation blocked by authorization gate"
                );
                self.notifier.error(denied.to_string());
                return Err(DispatchError::Denied(denied));
            }
        };

        debug!(action = ?action, user_id = ?user.id, "Dispatching mutation");

        match call().await {
            Ok(value) => {
                info!(action = ?action, user_id = ?user.id, "Mutation succeeded");
                self.notifier.success(action.success_message());
                Ok(value)
            }
            Err(ApiError::Cancelled) => {
                debug!(action = ?action, "Mutation cancelled");
                Err(DispatchError::Cancelled)
            }
            Err(source) => {
                let message = source.user_message(action.failure_message());
                warn!(
                    action = ?action,
                    user_id = ?user.id,
                    error = %source,
                    "Mutation failed"
                );
                self.notifier.error(message.clone());
                Err(DispatchError::Failed {
                    action,
                    message,
                    source,
                })
            }
        }
    }
}
