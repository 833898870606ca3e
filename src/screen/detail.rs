// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Resource Detail Screen
//!
//! One screen per group or team, driving the lifecycle
//!
//! ```text
//! Loading -> Loaded | Unavailable
//! Loaded  -> Editing -> Saving -> Loaded (refetched) | Editing (error kept)
//! Loaded  -> Deleting -> Deleted | Deleting (error) | Loaded (cancelled)
//! ```
//!
//! Control state is derived from the authorization gate on every call to
//! [`ResourceDetailScreen::controls`]; the dispatcher re-checks it before
//! each request. Every successful mutation is followed by a refetch of the
//! resource and its members, so ownership follows server-side leader
//! changes. Dropping the screen cancels its in-flight requests.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::countdown::DeleteCountdown;
use super::kind::{ComcellGroups, ResourceKind, Teams};
use super::state::{DetailState, Phase, ScreenError};
use crate::api::ApiClient;
use crate::auth::{AccessDecision, MutationAction, OwnershipRecord, PermissionLevel, ReadOnlyBanner};
use crate::dispatch::{DispatchError, MutationDispatcher};
use crate::error::{ApiError, ApiResult};
use crate::models::{MemberRole, MembershipChange, ResourceId, TeamMemberDetail, TeamMemberKey, UserId};
use crate::session::IdentityProvider;

pub type GroupDetailScreen<P> = ResourceDetailScreen<ComcellGroups, P>;
pub type TeamDetailScreen<P> = ResourceDetailScreen<Teams, P>;

/// Render state for the screen's mutating controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Controls {
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_manage_members: bool,
    /// Only meaningful while deleting.
    pub confirm_delete_enabled: bool,
    pub confirm_delete_label: Option<String>,
    /// Tooltip for disabled controls.
    pub tooltip: Option<String>,
    pub banner: Option<ReadOnlyBanner>,
    pub level: PermissionLevel,
}

pub struct ResourceDetailScreen<K: ResourceKind, P> {
    id: ResourceId,
    api: Arc<ApiClient>,
    dispatcher: MutationDispatcher<P>,
    delete_countdown: Duration,
    state: DetailState<K::Resource, K::Draft>,
    members: Vec<K::Member>,
    ownership: Option<OwnershipRecord>,
    phase: watch::Sender<Phase>,
    cancel: CancellationToken,
}

impl<K: ResourceKind, P: IdentityProvider> ResourceDetailScreen<K, P> {
    pub fn new(
        id: ResourceId,
        api: Arc<ApiClient>,
        dispatcher: MutationDispatcher<P>,
        delete_countdown: Duration,
    ) -> Self {
        Self {
            id,
            api,
            dispatcher,
            delete_countdown,
            state: DetailState::Loading,
            members: Vec::new(),
            ownership: None,
            phase: watch::Sender::new(Phase::Loading),
            cancel: CancellationToken::new(),
        }
    }

    /// Tie the screen's requests to `parent`, so cancelling it (on shutdown)
    /// also cancels this screen.
    pub fn with_parent(mut self, parent: &CancellationToken) -> Self {
        self.cancel = parent.child_token();
        self
    }

    pub fn id(&self) -> &ResourceId {
        &self.id
    }

    pub fn state(&self) -> &DetailState<K::Resource, K::Draft> {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Observe phase transitions, including the transient `Saving` phase.
    pub fn watch_phase(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub fn resource(&self) -> Option<&K::Resource> {
        self.state.resource()
    }

    pub fn members(&self) -> &[K::Member] {
        &self.members
    }

    /// `None` until the first successful load, and again after a failed one.
    pub fn ownership(&self) -> Option<&OwnershipRecord> {
        self.ownership.as_ref()
    }

    pub fn countdown(&self) -> Option<&DeleteCountdown> {
        match &self.state {
            DetailState::Deleting { countdown, .. } => Some(countdown),
            _ => None,
        }
    }

    /// Token cancelled when the screen is dropped.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn access(&self) -> AccessDecision {
        self.dispatcher.gate().evaluate(self.ownership.as_ref())
    }

    pub fn controls(&self) -> Controls {
        let access = self.access();
        let idle = self.phase() == Phase::Loaded;
        let countdown = self.countdown();

        Controls {
            can_edit: access.can_modify && idle,
            can_delete: access.can_modify && idle,
            can_manage_members: access.can_modify && idle,
            confirm_delete_enabled: access.can_modify && countdown.is_some_and(|c| c.is_ready()),
            confirm_delete_label: countdown.map(|c| c.confirm_label("Delete")),
            tooltip: access.disabled_reason().map(str::to_string),
            level: access.level,
            banner: access.banner,
        }
    }

    /// Leaders named by the member list when more than one is listed.
    pub fn leader_conflict(&self) -> Option<Vec<UserId>> {
        let leaders = K::listed_leaders(&self.members);
        (leaders.len() > 1).then_some(leaders)
    }

    fn set_state(&mut self, state: DetailState<K::Resource, K::Draft>) {
        let next = state.phase();
        self.state = state;
        self.phase.send_if_modified(|current| {
            let changed = *current != next;
            *current = next;
            changed
        });
    }

    fn invalid(&self, action: &'static str) -> ScreenError {
        ScreenError::InvalidTransition {
            action,
            phase: self.phase(),
        }
    }

    fn authorize(&self, action: MutationAction) -> Result<(), ScreenError> {
        self.dispatcher
            .gate()
            .authorize(action, self.ownership.as_ref())
            .map(|_| ())
            .map_err(|denied| {
                self.dispatcher.notifier().error(denied.to_string());
                ScreenError::Denied(denied)
            })
    }

    async fn fetch_all(&self) -> ApiResult<(K::Resource, Vec<K::Member>)> {
        tokio::try_join!(
            K::fetch(&self.api, &self.id, &self.cancel),
            K::fetch_members(&self.api, &self.id, &self.cancel),
        )
    }

    /// Fetch the resource and its members concurrently.
    ///
    /// Allowed while loading, loaded or unavailable. A failure leaves the
    /// screen unavailable with no ownership, so every control is disabled.
    pub async fn load(&mut self) -> Result<(), ScreenError> {
        if !matches!(
            self.phase(),
            Phase::Loading | Phase::Loaded | Phase::Unavailable
        ) {
            return Err(self.invalid("load"));
        }

        match self.fetch_all().await {
            Ok((resource, members)) => {
                self.apply(resource, members);
                Ok(())
            }
            Err(ApiError::Cancelled) => Err(ScreenError::Cancelled),
            Err(source) => {
                let message = source.user_message(&format!("Could not load this {}.", K::NOUN));
                warn!(id = %self.id, kind = K::NOUN, error = %source, "Load failed");
                self.ownership = None;
                self.members.clear();
                self.dispatcher.notifier().error(message.clone());
                self.set_state(DetailState::Unavailable {
                    message: message.clone(),
                });
                Err(ScreenError::Load { message, source })
            }
        }
    }

    fn apply(&mut self, resource: K::Resource, members: Vec<K::Member>) {
        self.ownership = Some(K::ownership(&resource, &members));
        self.members = members;
        if let Some(leaders) = self.leader_conflict() {
            warn!(
                id = %self.id,
                kind = K::NOUN,
                leaders = ?leaders,
                "Member list names more than one leader"
            );
        }
        debug!(id = %self.id, kind = K::NOUN, members = self.members.len(), "Loaded");
        self.set_state(DetailState::Loaded(resource));
    }

    /// Reconcile with the server after a successful mutation.
    ///
    /// On failure the last fetched data stays on screen and a notice says it
    /// may be out of date.
    async fn refetch(&mut self) {
        match self.fetch_all().await {
            Ok((resource, members)) => self.apply(resource, members),
            Err(ApiError::Cancelled) => {}
            Err(err) => {
                warn!(id = %self.id, kind = K::NOUN, error = %err, "Refetch after change failed");
                self.dispatcher
                    .notifier()
                    .error(err.user_message(&format!("Could not refresh this {}.", K::NOUN)));
            }
        }
    }

    /// Drop the current data and fetch again.
    pub async fn reload(&mut self) -> Result<(), ScreenError> {
        if matches!(self.phase(), Phase::Saving | Phase::Deleted) {
            return Err(self.invalid("reload"));
        }
        self.ownership = None;
        self.set_state(DetailState::Loading);
        self.load().await
    }

    pub fn begin_edit(&mut self) -> Result<(), ScreenError> {
        if self.phase() != Phase::Loaded {
            return Err(self.invalid("edit"));
        }
        self.authorize(MutationAction::EditSettings)?;

        if let DetailState::Loaded(resource) = std::mem::replace(&mut self.state, DetailState::Loading) {
            let draft = K::draft(&resource);
            self.set_state(DetailState::Editing {
                resource,
                draft,
                error: None,
            });
        }
        Ok(())
    }

    pub fn draft_mut(&mut self) -> Option<&mut K::Draft> {
        match &mut self.state {
            DetailState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Discard the draft.
    pub fn cancel_edit(&mut self) -> Result<(), ScreenError> {
        if self.phase() != Phase::Editing {
            return Err(self.invalid("cancel editing"));
        }
        if let DetailState::Editing { resource, .. } =
            std::mem::replace(&mut self.state, DetailState::Loading)
        {
            self.set_state(DetailState::Loaded(resource));
        }
        Ok(())
    }

    /// Validate and submit the draft.
    ///
    /// A validation failure sends nothing. A failed request returns to
    /// editing with the draft intact and the message shown inline. Success
    /// refetches the resource.
    pub async fn save(&mut self) -> Result<(), ScreenError> {
        let (resource, draft) = match std::mem::replace(&mut self.state, DetailState::Loading) {
            DetailState::Editing {
                resource, draft, ..
            } => (resource, draft),
            other => {
                self.state = other;
                return Err(self.invalid("save"));
            }
        };

        if let Err(invalid) = K::validate(&draft) {
            self.set_state(DetailState::Editing {
                resource,
                draft,
                error: Some(invalid.to_string()),
            });
            return Err(ScreenError::Validation(invalid));
        }

        self.set_state(DetailState::Saving {
            resource: resource.clone(),
            draft: draft.clone(),
        });

        let result = self
            .dispatcher
            .dispatch(MutationAction::EditSettings, self.ownership.as_ref(), || {
                K::update(&self.api, &self.id, &draft, &self.cancel)
            })
            .await;

        match result {
            Ok(()) => {
                info!(id = %self.id, kind = K::NOUN, "Settings saved");
                self.set_state(DetailState::Loaded(resource));
                self.refetch().await;
                Ok(())
            }
            Err(err) => {
                let error = match &err {
                    DispatchError::Cancelled => None,
                    other => Some(other.user_message()),
                };
                self.set_state(DetailState::Editing {
                    resource,
                    draft,
                    error,
                });
                Err(err.into())
            }
        }
    }

    /// Open the delete confirmation and start its countdown.
    pub fn request_delete(&mut self) -> Result<&DeleteCountdown, ScreenError> {
        if self.phase() != Phase::Loaded {
            return Err(self.invalid("delete"));
        }
        self.authorize(K::DELETE_ACTION)?;

        if let DetailState::Loaded(resource) = std::mem::replace(&mut self.state, DetailState::Loading) {
            self.set_state(DetailState::Deleting {
                resource,
                countdown: DeleteCountdown::start(self.delete_countdown),
            });
        }
        self.countdown().ok_or(ScreenError::InvalidTransition {
            action: "delete",
            phase: Phase::Loading,
        })
    }

    pub fn cancel_delete(&mut self) -> Result<(), ScreenError> {
        if self.phase() != Phase::Deleting {
            return Err(self.invalid("cancel deleting"));
        }
        if let DetailState::Deleting { resource, .. } =
            std::mem::replace(&mut self.state, DetailState::Loading)
        {
            self.set_state(DetailState::Loaded(resource));
        }
        Ok(())
    }

    /// Send the delete once the countdown has reached zero.
    ///
    /// Refused without a request while the countdown is running. A failed
    /// delete stays in the confirmation so the user can try again.
    pub async fn confirm_delete(&mut self) -> Result<(), ScreenError> {
        let Some(countdown) = self.countdown().copied() else {
            return Err(self.invalid("confirm delete"));
        };
        if !countdown.is_ready() {
            return Err(ScreenError::CountdownPending {
                remaining_secs: countdown.remaining_secs(),
            });
        }

        self.dispatcher
            .dispatch(K::DELETE_ACTION, self.ownership.as_ref(), || {
                K::delete(&self.api, &self.id, &self.cancel)
            })
            .await?;

        info!(id = %self.id, kind = K::NOUN, "Deleted");
        self.ownership = None;
        self.members.clear();
        self.set_state(DetailState::Deleted);
        Ok(())
    }

    fn require_loaded(&self, action: &'static str) -> Result<(), ScreenError> {
        if self.phase() == Phase::Loaded {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }
}

impl<P: IdentityProvider> ResourceDetailScreen<ComcellGroups, P> {
    pub async fn add_member(
        &mut self,
        user_id: UserId,
        role: Option<MemberRole>,
    ) -> Result<(), ScreenError> {
        self.membership_change(MutationAction::AddMember, user_id, role)
            .await
    }

    pub async fn remove_member(&mut self, user_id: UserId) -> Result<(), ScreenError> {
        self.membership_change(MutationAction::RemoveMember, user_id, None)
            .await
    }

    async fn membership_change(
        &mut self,
        action: MutationAction,
        user_id: UserId,
        role: Option<MemberRole>,
    ) -> Result<(), ScreenError> {
        self.require_loaded("change members")?;
        let change = MembershipChange {
            group_id: self.id.clone(),
            user_id,
            role,
        };
        let (api, cancel, change) = (&self.api, &self.cancel, &change);

        self.dispatcher
            .dispatch(action, self.ownership.as_ref(), move || async move {
                match action {
                    MutationAction::RemoveMember => api.remove_group_member(change, cancel).await,
                    _ => api.add_group_member(change, cancel).await,
                }
            })
            .await?;

        self.refetch().await;
        Ok(())
    }
}

impl<P: IdentityProvider> ResourceDetailScreen<Teams, P> {
    /// Read one member's team-specific details.
    pub async fn member_detail(&self, user_id: &UserId) -> Result<TeamMemberDetail, ScreenError> {
        let key = TeamMemberKey {
            team_id: self.id.clone(),
            user_id: user_id.clone(),
        };
        match self.api.get_team_member_detail(&key, &self.cancel).await {
            Ok(detail) => Ok(detail),
            Err(ApiError::Cancelled) => Err(ScreenError::Cancelled),
            Err(source) => {
                let message = source.user_message("Could not load the member's details.");
                self.dispatcher.notifier().error(message.clone());
                Err(ScreenError::Load { message, source })
            }
        }
    }

    /// Write one member's details. The detail must name this team.
    pub async fn save_member_detail(&mut self, detail: &TeamMemberDetail) -> Result<(), ScreenError> {
        self.require_loaded("edit member details")?;
        if detail.team_id != self.id {
            warn!(id = %self.id, team_id = %detail.team_id, "Member detail names another team");
            return Err(ScreenError::ForeignResource {
                noun: "team",
                id: detail.team_id.clone(),
            });
        }
        self.dispatcher
            .dispatch(MutationAction::EditMemberDetail, self.ownership.as_ref(), || {
                self.api.set_team_member_detail(detail, &self.cancel)
            })
            .await?;
        self.refetch().await;
        Ok(())
    }
}

impl<K: ResourceKind, P> Drop for ResourceDetailScreen<K, P> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
