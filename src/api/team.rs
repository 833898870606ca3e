// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Team endpoints.

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{ResourceId, Team, TeamMember, TeamMemberDetail, TeamMemberKey, TeamUpdate};

impl ApiClient {
    /// `GET /team/getTeamDetail/:id`
    pub async fn get_team_detail(
        &self,
        team_id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<Team> {
        self.fetch(
            Method::GET,
            &["team", "getTeamDetail", team_id.as_str()],
            None::<&()>,
            cancel,
        )
        .await
    }

    /// `GET /team/getTeamMembers/:id`
    pub async fn get_team_members(
        &self,
        team_id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<TeamMember>> {
        self.fetch(
            Method::GET,
            &["team", "getTeamMembers", team_id.as_str()],
            None::<&()>,
            cancel,
        )
        .await
    }

    /// `POST /team/updateTeam/:id`
    pub async fn update_team(
        &self,
        team_id: &ResourceId,
        update: &TeamUpdate,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(
            Method::POST,
            &["team", "updateTeam", team_id.as_str()],
            Some(update),
            cancel,
        )
        .await
    }

    /// `DELETE /team/deleteTeam/:id`
    pub async fn delete_team(&self, team_id: &ResourceId, cancel: &CancellationToken) -> ApiResult<()> {
        self.execute(
            Method::DELETE,
            &["team", "deleteTeam", team_id.as_str()],
            None::<&()>,
            cancel,
        )
        .await
    }

    /// `POST /team/getMemberDetail` - role, positions, status, notes
    pub async fn get_team_member_detail(
        &self,
        key: &TeamMemberKey,
        cancel: &CancellationToken,
    ) -> ApiResult<TeamMemberDetail> {
        self.fetch(Method::POST, &["team", "getMemberDetail"], Some(key), cancel)
            .await
    }

    /// `POST /team/setMemberDetail`
    pub async fn set_team_member_detail(
        &self,
        detail: &TeamMemberDetail,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(Method::POST, &["team", "setMemberDetail"], Some(detail), cancel)
            .await
    }
}
