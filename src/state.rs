// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared console state: configuration, API client, session and notices.
//!
//! Screens are created from a [`Console`] so that they all share one session
//! store as their identity source and one notification queue. Their
//! cancellation tokens are children of the console's shutdown token.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::auth::{MutationAction, Role};
use crate::config::{ConfigError, ConsoleConfig};
use crate::dispatch::{DispatchError, MutationDispatcher};
use crate::error::ApiError;
use crate::models::{ResourceId, UpdateUserRoleRequest, UserId};
use crate::notify::Notifier;
use crate::screen::{AttendanceBoard, GroupDetailScreen, ResourceDetailScreen, TeamDetailScreen};
use crate::session::{FileTokenStore, IdentityProvider, SessionError, SessionStore, SessionUser};

/// Identity source used by every screen the console creates.
pub type SharedSession = Arc<SessionStore>;

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct Console {
    config: Arc<ConsoleConfig>,
    api: Arc<ApiClient>,
    session: SharedSession,
    notifier: Notifier,
    shutdown: CancellationToken,
}

impl Console {
    /// Build the console from configuration. The session is persisted to
    /// `session_file` when one is configured and kept in memory otherwise.
    pub fn new(config: ConsoleConfig) -> Result<Self, ConsoleError> {
        let session = Arc::new(match &config.session_file {
            Some(path) => SessionStore::new(FileTokenStore::new(path)),
            None => SessionStore::in_memory(),
        });
        let api = ApiClient::from_config(&config)?;
        Ok(Self::with_parts(config, api, session, Notifier::new()))
    }

    /// Assemble from prebuilt parts; the client gets the session as its
    /// bearer token source.
    pub fn with_parts(
        config: ConsoleConfig,
        api: ApiClient,
        session: SharedSession,
        notifier: Notifier,
    ) -> Self {
        let api = api.with_token_source(session.clone());
        Self {
            config: Arc::new(config),
            api: Arc::new(api),
            session,
            notifier,
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Cancelling this cancels every screen the console has created.
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.session.current_user()
    }

    pub fn dispatcher(&self) -> MutationDispatcher<SharedSession> {
        MutationDispatcher::new(self.session.clone(), self.notifier.clone())
    }

    /// Reload a persisted, unexpired session.
    pub fn restore(&self) -> Result<Option<SessionUser>, SessionError> {
        self.session.restore()
    }

    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> Result<SessionUser, ConsoleError> {
        let response = match self.api.login(email, password, cancel).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "Login failed");
                if !err.is_cancelled() {
                    self.notifier
                        .error(err.user_message("Could not sign in. Please check your credentials."));
                }
                return Err(err.into());
            }
        };

        let user = response.user.clone();
        self.session.sign_in(response.token, response.user)?;
        self.notifier.success(format!("Signed in as {}.", user.name));
        Ok(user)
    }

    pub fn logout(&self) -> Result<(), SessionError> {
        self.session.sign_out()
    }

    /// Change a user's global role. Superusers only.
    ///
    /// When the target is the signed-in user, the session picks up the new
    /// role immediately so the gate re-evaluates with it.
    pub async fn change_role(
        &self,
        user_id: UserId,
        role: Role,
        cancel: &CancellationToken,
    ) -> Result<(), DispatchError> {
        let request = UpdateUserRoleRequest {
            user_id,
            role_name: role,
        };
        self.dispatcher()
            .dispatch(MutationAction::EditRole, None, || {
                self.api.update_user_role(&request, cancel)
            })
            .await?;

        let is_self = self
            .current_user()
            .and_then(|u| u.id)
            .is_some_and(|id| id == request.user_id);
        if is_self {
            if let Err(err) = self.session.set_role(role) {
                warn!(error = %err, "Failed to persist role change");
            }
        }
        info!(user_id = %request.user_id, role = %role, "Role changed");
        Ok(())
    }

    pub fn group_screen(&self, id: ResourceId) -> GroupDetailScreen<SharedSession> {
        ResourceDetailScreen::new(
            id,
            self.api.clone(),
            self.dispatcher(),
            self.config.delete_countdown,
        )
        .with_parent(&self.shutdown)
    }

    pub fn team_screen(&self, id: ResourceId) -> TeamDetailScreen<SharedSession> {
        ResourceDetailScreen::new(
            id,
            self.api.clone(),
            self.dispatcher(),
            self.config.delete_countdown,
        )
        .with_parent(&self.shutdown)
    }

    pub fn attendance_board(&self, group_id: ResourceId) -> AttendanceBoard<SharedSession> {
        AttendanceBoard::new(group_id, self.api.clone(), self.dispatcher())
            .with_parent(&self.shutdown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screen::{Phase, ScreenError};
    use crate::testing::{envelope_err, envelope_ok, MockBackend};
    use axum::{
        http::HeaderMap,
        routing::{get, post},
        Router,
    };
    use serde_json::{json, Value};

    fn routes() -> Router {
        Router::new()
            .route(
                "/auth/login",
                post(|| async {
                    envelope_ok(json!({
                        "token": "opaque-token",
                        "user": { "_id": "u-1", "name": "Ruth", "roleName": "admin" }
                    }))
                }),
            )
            .route(
                "/comcell/getComcellGroupDetail/{id}",
                get(|headers: HeaderMap| async move {
                    if headers.get("authorization").and_then(|v| v.to_str().ok())
                        != Some("Bearer opaque-token")
                    {
                        return envelope_err("Unauthorized");
                    }
                    envelope_ok(json!({ "id": "g-1", "name": "Eastside", "leader_id": "u-7" }))
                }),
            )
            .route(
                "/comcell/getComcellGroupMembers/{id}",
                get(|| async { envelope_ok(json!([])) }),
            )
            .route(
                "/user/updateUserRole",
                post(|| async { envelope_ok(Value::Null) }),
            )
    }

    fn console_for(backend: &MockBackend) -> Console {
        Console::with_parts(
            ConsoleConfig::default(),
            backend.client(),
            Arc::new(SessionStore::in_memory()),
            Notifier::new(),
        )
    }

    #[tokio::test]
    async fn login_authenticates_later_requests() {
        let backend = MockBackend::start(routes()).await;
        let console = console_for(&backend);
        let cancel = CancellationToken::new();

        let user = console.login("ruth@example.org", "pw", &cancel).await.unwrap();
        assert_eq!(user.role_name, Role::Admin);
        assert!(console.session().is_signed_in());

        let mut screen = console.group_screen("g-1".into());
        screen.load().await.unwrap();
        assert_eq!(screen.phase(), Phase::Loaded);
        assert!(screen.controls().can_edit);
    }

    #[tokio::test]
    async fn logout_makes_screens_read_only() {
        let backend = MockBackend::start(routes()).await;
        let console = console_for(&backend);
        let cancel = CancellationToken::new();
        console.login("ruth@example.org", "pw", &cancel).await.unwrap();

        let mut screen = console.group_screen("g-1".into());
        screen.load().await.unwrap();
        console.logout().unwrap();

        let controls = screen.controls();
        assert!(!controls.can_edit);
        assert_eq!(
            controls.banner.unwrap().reason,
            crate::auth::ReadOnlyReason::SignedOut
        );
    }

    #[tokio::test]
    async fn own_role_change_updates_the_session() {
        let backend = MockBackend::start(routes()).await;
        let console = console_for(&backend);
        let cancel = CancellationToken::new();
        console.login("ruth@example.org", "pw", &cancel).await.unwrap();

        console
            .change_role("u-1".into(), Role::Servant, &cancel)
            .await
            .unwrap();
        assert_eq!(console.current_user().unwrap().role_name, Role::Servant);

        // No longer a superuser, so a second change is refused locally.
        let before = backend.hits();
        let err = console
            .change_role("u-1".into(), Role::Admin, &cancel)
            .await
            .unwrap_err();
        assert!(err.is_denied());
        assert_eq!(backend.hits(), before);
    }

    #[tokio::test]
    async fn failed_login_leaves_session_empty() {
        let backend = MockBackend::start(
            Router::new().route("/auth/login", post(|| async { envelope_err("Invalid credentials") })),
        )
        .await;
        let console = console_for(&backend);

        let err = console
            .login("ruth@example.org", "wrong", &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::Api(_)));
        assert!(!console.session().is_signed_in());
        assert_eq!(console.notifier().drain()[0].message, "Invalid credentials");
    }

    #[tokio::test]
    async fn shutdown_cancels_open_screens() {
        let backend = MockBackend::start(routes()).await;
        let console = console_for(&backend);
        let mut screen = console.group_screen("g-1".into());
        let board = console.attendance_board("g-1".into());

        console.shutdown_token().cancel();
        assert!(matches!(screen.load().await, Err(ScreenError::Cancelled)));
        assert!(screen.cancellation().is_cancelled());
        assert_eq!(backend.hits(), 0);
        drop(board);

        // Dropping a screen does not cancel its siblings.
        let console = console_for(&backend);
        let first = console.group_screen("g-1".into());
        let second = console.team_screen("t-1".into());
        drop(first);
        assert!(!second.cancellation().is_cancelled());
        assert!(!console.shutdown_token().is_cancelled());
    }
}
