// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization gate.
//!
//! Decides whether the current user may mutate a resource. The decision is
//! a pure function of the session user and the resource's ownership record
//! and is recomputed on every call; nothing is cached.
//!
//! ## Decision rule (first match wins)
//!
//! 1. No user, or a user without an id: deny
//! 2. `master` or `admin`: allow
//! 3. User is the resource's leader or co-leader: allow
//! 4. Otherwise: deny
//!
//! Missing ownership data (still loading, failed fetch) denies.

use std::fmt;

use serde::Serialize;

use super::{AuthError, OwnershipRecord, Role};
use crate::session::{IdentityProvider, SessionUser};

/// Whether `user` may modify the resource described by `ownership`.
pub fn can_modify(user: Option<&SessionUser>, ownership: Option<&OwnershipRecord>) -> bool {
    let Some(user) = user else {
        return false;
    };
    let Some(user_id) = user.id.as_ref() else {
        return false;
    };

    if user.role_name.is_superuser() {
        return true;
    }

    match ownership {
        Some(record) => record.is_leader(user_id) || record.is_co_leader(user_id),
        None => false,
    }
}

/// Display-only access label. Never use it to gate a call; use [`can_modify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionLevel {
    Master,
    Admin,
    Leader,
    CoLeader,
    Member,
    None,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Master => "master",
            PermissionLevel::Admin => "admin",
            PermissionLevel::Leader => "leader",
            PermissionLevel::CoLeader => "co-leader",
            PermissionLevel::Member => "member",
            PermissionLevel::None => "none",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Access label for `user` on the resource described by `ownership`.
pub fn permission_level(
    user: Option<&SessionUser>,
    ownership: Option<&OwnershipRecord>,
) -> PermissionLevel {
    let Some(user) = user else {
        return PermissionLevel::None;
    };
    let Some(user_id) = user.id.as_ref() else {
        return PermissionLevel::None;
    };

    match user.role_name {
        Role::Master => return PermissionLevel::Master,
        Role::Admin => return PermissionLevel::Admin,
        Role::User | Role::Servant => {}
    }

    match ownership {
        Some(record) if record.is_leader(user_id) => PermissionLevel::Leader,
        Some(record) if record.is_co_leader(user_id) => PermissionLevel::CoLeader,
        Some(record) if record.is_member(user_id) => PermissionLevel::Member,
        _ => PermissionLevel::None,
    }
}

/// Mutations that pass through the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    AddMember,
    RemoveMember,
    EditSettings,
    DeleteGroup,
    DeleteTeam,
    EditMemberDetail,
    SaveAttendance,
    EditEvent,
    EditRole,
}

impl MutationAction {
    /// Phrase completing "You do not have permission to …".
    pub fn describe(&self) -> &'static str {
        match self {
            MutationAction::AddMember => "add members to this group",
            MutationAction::RemoveMember => "remove members from this group",
            MutationAction::EditSettings => "edit these settings",
            MutationAction::DeleteGroup => "delete this group",
            MutationAction::DeleteTeam => "delete this team",
            MutationAction::EditMemberDetail => "edit this member's details",
            MutationAction::SaveAttendance => "edit attendance for this group",
            MutationAction::EditEvent => "edit events for this group",
            MutationAction::EditRole => "change user roles",
        }
    }

    /// Fallback shown when a permitted call fails without a server message.
    pub fn failure_message(&self) -> &'static str {
        match self {
            MutationAction::AddMember => "Could not add the member. Please try again.",
            MutationAction::RemoveMember => "Could not remove the member. Please try again.",
            MutationAction::EditSettings => "Could not save the settings. Please try again.",
            MutationAction::DeleteGroup => "Could not delete the group. Please try again.",
            MutationAction::DeleteTeam => "Could not delete the team. Please try again.",
            MutationAction::EditMemberDetail => {
                "Could not save the member's details. Please try again."
            }
            MutationAction::SaveAttendance => "Could not save attendance. Please try again.",
            MutationAction::EditEvent => "Could not save the event. Please try again.",
            MutationAction::EditRole => "Could not change the role. Please try again.",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            MutationAction::AddMember => "Member added.",
            MutationAction::RemoveMember => "Member removed.",
            MutationAction::EditSettings => "Settings saved.",
            MutationAction::DeleteGroup => "Group deleted.",
            MutationAction::DeleteTeam => "Team deleted.",
            MutationAction::EditMemberDetail => "Member details saved.",
            MutationAction::SaveAttendance => "Attendance saved.",
            MutationAction::EditEvent => "Event saved.",
            MutationAction::EditRole => "Role updated.",
        }
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Why a screen is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadOnlyReason {
    SignedOut,
    OwnershipLoading,
    NotPermitted,
}

/// The visible read-only indicator shown whenever the gate denies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadOnlyBanner {
    pub reason: ReadOnlyReason,
    pub level: PermissionLevel,
    pub message: String,
}

impl ReadOnlyBanner {
    fn new(reason: ReadOnlyReason, level: PermissionLevel) -> Self {
        let message = match reason {
            ReadOnlyReason::SignedOut => "Read-only: sign in to make changes.".to_string(),
            ReadOnlyReason::OwnershipLoading => {
                "Read-only: permissions are still loading.".to_string()
            }
            ReadOnlyReason::NotPermitted => format!(
                "Read-only: your access level is {level}. Only leaders and administrators can make changes."
            ),
        };
        Self {
            reason,
            level,
            message,
        }
    }
}

/// Result of evaluating the gate for one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub can_modify: bool,
    pub level: PermissionLevel,
    /// Present exactly when `can_modify` is false.
    pub banner: Option<ReadOnlyBanner>,
}

impl AccessDecision {
    pub fn decide(user: Option<&SessionUser>, ownership: Option<&OwnershipRecord>) -> Self {
        let allowed = can_modify(user, ownership);
        let level = permission_level(user, ownership);

        let banner = if allowed {
            None
        } else if user.and_then(|u| u.id.as_ref()).is_none() {
            Some(ReadOnlyBanner::new(ReadOnlyReason::SignedOut, level))
        } else if ownership.is_none() {
            Some(ReadOnlyBanner::new(ReadOnlyReason::OwnershipLoading, level))
        } else {
            Some(ReadOnlyBanner::new(ReadOnlyReason::NotPermitted, level))
        };

        Self {
            can_modify: allowed,
            level,
            banner,
        }
    }

    /// Tooltip for a disabled mutating control.
    pub fn disabled_reason(&self) -> Option<&str> {
        self.banner.as_ref().map(|b| b.message.as_str())
    }
}

/// Gate bound to an injected identity source.
#[derive(Debug, Clone)]
pub struct AuthorizationGate<P> {
    identity: P,
}

impl<P: IdentityProvider> AuthorizationGate<P> {
    pub fn new(identity: P) -> Self {
        Self { identity }
    }

    pub fn identity(&self) -> &P {
        &self.identity
    }

    /// Evaluate against the identity as it is right now.
    pub fn evaluate(&self, ownership: Option<&OwnershipRecord>) -> AccessDecision {
        let user = self.identity.current_user();
        AccessDecision::decide(user.as_ref(), ownership)
    }

    /// Check an action, returning the acting user when it is allowed.
    pub fn authorize(
        &self,
        action: MutationAction,
        ownership: Option<&OwnershipRecord>,
    ) -> Result<SessionUser, AuthError> {
        let user = self.identity.current_user();

        match user {
            Some(user) if user.id.is_some() => {
                if can_modify(Some(&user), ownership) {
                    Ok(user)
                } else {
                    Err(AuthError::PermissionDenied { action })
                }
            }
            _ => Err(AuthError::NotAuthenticated { action }),
        }
    }
}
