// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session store and identity providers.
//!
//! The store is an ordinary value handed to whoever needs the identity
//! (gate, dispatcher, screens); there is no process-wide singleton. Changes
//! are published on a `watch` channel so open screens can recompute access.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::token::{is_expired, MemoryTokenStore, Session, SessionError, TokenStore};
use super::SessionUser;
use crate::auth::Role;

/// Source of "who is signed in right now".
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<SessionUser>;
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for Arc<T> {
    fn current_user(&self) -> Option<SessionUser> {
        (**self).current_user()
    }
}

impl<T: IdentityProvider + ?Sized> IdentityProvider for &T {
    fn current_user(&self) -> Option<SessionUser> {
        (**self).current_user()
    }
}

/// Source of the bearer token attached to API requests.
pub trait TokenSource: Send + Sync {
    fn bearer_token(&self) -> Option<String>;
}

/// Fixed identity, swappable by hand. Used by tests and tools that act as a
/// known user without going through login.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Arc<RwLock<Option<SessionUser>>>,
}

impl StaticIdentity {
    pub fn new(user: Option<SessionUser>) -> Self {
        Self {
            user: Arc::new(RwLock::new(user)),
        }
    }

    pub fn set(&self, user: Option<SessionUser>) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = user;
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<SessionUser> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Holds the signed-in session for the life of the console.
pub struct SessionStore {
    state: watch::Sender<Option<Session>>,
    persistence: Box<dyn TokenStore>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("user", &self.current_user())
            .finish_non_exhaustive()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl SessionStore {
    pub fn new(persistence: impl TokenStore + 'static) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            state,
            persistence: Box::new(persistence),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryTokenStore::new())
    }

    /// Load a persisted session, discarding it if its token has expired.
    pub fn restore(&self) -> Result<Option<SessionUser>, SessionError> {
        let Some(session) = self.persistence.load()? else {
            debug!("No persisted session");
            return Ok(None);
        };

        if is_expired(&session.token, Utc::now()) {
            info!("Persisted session token has expired; discarding");
            self.persistence.clear()?;
            return Ok(None);
        }

        info!(
            user_id = ?session.user.id,
            role = %session.user.role_name,
            "Restored persisted session"
        );
        let user = session.user.clone();
        self.state.send_replace(Some(session));
        Ok(Some(user))
    }

    /// Record a successful login.
    pub fn sign_in(&self, token: String, user: SessionUser) -> Result<(), SessionError> {
        let session = Session { token, user };
        self.persistence.save(&session)?;
        info!(
            user_id = ?session.user.id,
            role = %session.user.role_name,
            "Signed in"
        );
        self.state.send_replace(Some(session));
        Ok(())
    }

    /// Clear the session. The in-memory session is always dropped, even if
    /// clearing the persisted copy fails.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        self.state.send_replace(None);
        info!("Signed out");
        self.persistence.clear().inspect_err(|e| {
            warn!(error = %e, "Failed to clear persisted session");
        })
    }

    /// Apply a role change to the signed-in user (e.g. after an admin edit).
    pub fn set_role(&self, role: Role) -> Result<(), SessionError> {
        let mut updated = None;
        self.state.send_if_modified(|current| match current {
            Some(session) if session.user.role_name != role => {
                session.user.role_name = role;
                updated = Some(session.clone());
                true
            }
            _ => false,
        });

        match updated {
            Some(session) => {
                info!(user_id = ?session.user.id, role = %role, "Session role changed");
                self.persistence.save(&session)
            }
            None => Ok(()),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Watch for sign-in, sign-out and role changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.state.subscribe()
    }
}

impl IdentityProvider for SessionStore {
    fn current_user(&self) -> Option<SessionUser> {
        self.state.borrow().as_ref().map(|s| s.user.clone())
    }
}

impl TokenSource for SessionStore {
    fn bearer_token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|s| s.token.clone())
    }
}
