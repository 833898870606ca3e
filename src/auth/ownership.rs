// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical ownership shape for groups and teams.
//!
//! The API sends `leader_id` / `co_leader_id`, while locally held state and
//! some endpoints use `leaderId` / `coLeaderId`. Both spellings are folded
//! into one [`OwnershipRecord`] at deserialization time so the gate never
//! has to look at raw payloads.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{deserialize_optional_id, GroupMember, MemberRole, TeamMember, UserId};

/// Leader, co-leader and (once loaded) member ids of one resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOwnership", rename_all = "camelCase")]
pub struct OwnershipRecord {
    pub leader_id: Option<UserId>,
    pub co_leader_id: Option<UserId>,
    /// Filled from the membership list; only used for the display label.
    #[serde(skip)]
    pub member_ids: Vec<UserId>,
}

/// Wire form accepting both field spellings.
#[derive(Debug, Default, Deserialize)]
struct RawOwnership {
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    leader_id: Option<UserId>,
    #[serde(default, rename = "leaderId", deserialize_with = "deserialize_optional_id")]
    leader_id_camel: Option<UserId>,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    co_leader_id: Option<UserId>,
    #[serde(default, rename = "coLeaderId", deserialize_with = "deserialize_optional_id")]
    co_leader_id_camel: Option<UserId>,
}

impl From<RawOwnership> for OwnershipRecord {
    fn from(raw: RawOwnership) -> Self {
        OwnershipRecord {
            leader_id: pick("leader", raw.leader_id, raw.leader_id_camel),
            co_leader_id: pick("co-leader", raw.co_leader_id, raw.co_leader_id_camel),
            member_ids: Vec::new(),
        }
    }
}

/// The snake_case (API) value wins when both spellings are present.
fn pick(field: &'static str, snake: Option<UserId>, camel: Option<UserId>) -> Option<UserId> {
    match (snake, camel) {
        (Some(snake), Some(camel)) if snake != camel => {
            warn!(
                field,
                snake_case = %snake,
                camel_case = %camel,
                "Conflicting ownership spellings; using snake_case value"
            );
            Some(snake)
        }
        (Some(snake), _) => Some(snake),
        (None, camel) => camel,
    }
}

impl OwnershipRecord {
    pub fn new(leader_id: Option<UserId>, co_leader_id: Option<UserId>) -> Self {
        Self {
            leader_id,
            co_leader_id,
            member_ids: Vec::new(),
        }
    }

    pub fn is_leader(&self, user_id: &UserId) -> bool {
        self.leader_id.as_ref() == Some(user_id)
    }

    pub fn is_co_leader(&self, user_id: &UserId) -> bool {
        self.co_leader_id.as_ref() == Some(user_id)
    }

    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.member_ids.iter().any(|id| id == user_id)
    }

    /// Attach member ids from a group membership list.
    pub fn with_group_members(mut self, members: &[GroupMember]) -> Self {
        self.member_ids = members.iter().map(|m| m.user_id.clone()).collect();
        self
    }

    /// Attach member ids from a team roster.
    pub fn with_team_members(mut self, members: &[TeamMember]) -> Self {
        self.member_ids = members.iter().map(|m| m.user_id.clone()).collect();
        self
    }
}

/// Leaders reported by a membership list.
///
/// The backend does not guarantee a single leader per group. More than one
/// entry is reported, never resolved: the gate keeps using the detail
/// record's `leader_id`.
pub fn listed_leaders(members: &[GroupMember]) -> Vec<&UserId> {
    members
        .iter()
        .filter(|m| m.role == MemberRole::Leader)
        .map(|m| &m.user_id)
        .collect()
}

/// Resources that carry an ownership record.
pub trait OwnedResource {
    fn ownership(&self) -> &OwnershipRecord;
}

impl OwnedResource for crate::models::ComcellGroup {
    fn ownership(&self) -> &OwnershipRecord {
        &self.ownership
    }
}

impl OwnedResource for crate::models::Team {
    fn ownership(&self) -> &OwnershipRecord {
        &self.ownership
    }
}
