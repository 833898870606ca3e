// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Resource kinds served by the shared detail screen.
//!
//! Groups and teams follow the same load / edit / delete lifecycle and only
//! differ in endpoints, draft shape and delete action. Each kind is a unit
//! type implementing [`ResourceKind`].

use std::future::Future;

use tokio_util::sync::CancellationToken;

use super::validation::{validate_group_update, validate_team_update, ValidationError};
use crate::api::ApiClient;
use crate::auth::{listed_leaders, MutationAction, OwnedResource, OwnershipRecord};
use crate::error::ApiResult;
use crate::models::{
    ComcellGroup, GroupMember, GroupUpdate, ResourceId, Team, TeamMember, TeamUpdate, UserId,
};

pub trait ResourceKind {
    type Resource: OwnedResource + Clone;
    type Member: Clone;
    type Draft: Clone;

    /// Lowercase noun used in user-facing messages.
    const NOUN: &'static str;
    const DELETE_ACTION: MutationAction;

    fn fetch(
        api: &ApiClient,
        id: &ResourceId,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ApiResult<Self::Resource>>;

    fn fetch_members(
        api: &ApiClient,
        id: &ResourceId,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ApiResult<Vec<Self::Member>>>;

    fn update(
        api: &ApiClient,
        id: &ResourceId,
        draft: &Self::Draft,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ApiResult<()>>;

    fn delete(
        api: &ApiClient,
        id: &ResourceId,
        cancel: &CancellationToken,
    ) -> impl Future<Output = ApiResult<()>>;

    fn draft(resource: &Self::Resource) -> Self::Draft;

    fn validate(draft: &Self::Draft) -> Result<(), ValidationError>;

    /// Ownership of `resource` with the member list attached.
    fn ownership(resource: &Self::Resource, members: &[Self::Member]) -> OwnershipRecord;

    /// Leaders named by the member list, when the kind reports them.
    fn listed_leaders(_members: &[Self::Member]) -> Vec<UserId> {
        Vec::new()
    }
}

/// Comcell groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComcellGroups;

impl ResourceKind for ComcellGroups {
    type Resource = ComcellGroup;
    type Member = GroupMember;
    type Draft = GroupUpdate;

    const NOUN: &'static str = "group";
    const DELETE_ACTION: MutationAction = MutationAction::DeleteGroup;

    async fn fetch(
        api: &ApiClient,
        id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<ComcellGroup> {
        api.get_group_detail(id, cancel).await
    }

    async fn fetch_members(
        api: &ApiClient,
        id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<GroupMember>> {
        api.get_group_members(id, cancel).await
    }

    async fn update(
        api: &ApiClient,
        id: &ResourceId,
        draft: &GroupUpdate,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        api.update_group(id, draft, cancel).await
    }

    async fn delete(api: &ApiClient, id: &ResourceId, cancel: &CancellationToken) -> ApiResult<()> {
        api.delete_group(id, cancel).await
    }

    fn draft(resource: &ComcellGroup) -> GroupUpdate {
        GroupUpdate::from(resource)
    }

    fn validate(draft: &GroupUpdate) -> Result<(), ValidationError> {
        validate_group_update(draft)
    }

    fn ownership(resource: &ComcellGroup, members: &[GroupMember]) -> OwnershipRecord {
        resource.ownership().clone().with_group_members(members)
    }

    fn listed_leaders(members: &[GroupMember]) -> Vec<UserId> {
        listed_leaders(members).into_iter().cloned().collect()
    }
}

/// Ministry teams.
#[derive(Debug, Clone, Copy, Default)]
pub struct Teams;

impl ResourceKind for Teams {
    type Resource = Team;
    type Member = TeamMember;
    type Draft = TeamUpdate;

    const NOUN: &'static str = "team";
    const DELETE_ACTION: MutationAction = MutationAction::DeleteTeam;

    async fn fetch(api: &ApiClient, id: &ResourceId, cancel: &CancellationToken) -> ApiResult<Team> {
        api.get_team_detail(id, cancel).await
    }

    async fn fetch_members(
        api: &ApiClient,
        id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<TeamMember>> {
        api.get_team_members(id, cancel).await
    }

    async fn update(
        api: &ApiClient,
        id: &ResourceId,
        draft: &TeamUpdate,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        api.update_team(id, draft, cancel).await
    }

    async fn delete(api: &ApiClient, id: &ResourceId, cancel: &CancellationToken) -> ApiResult<()> {
        api.delete_team(id, cancel).await
    }

    fn draft(resource: &Team) -> TeamUpdate {
        TeamUpdate::from(resource)
    }

    fn validate(draft: &TeamUpdate) -> Result<(), ValidationError> {
        validate_team_update(draft)
    }

    fn ownership(resource: &Team, members: &[TeamMember]) -> OwnershipRecord {
        resource.ownership().clone().with_team_members(members)
    }
}
