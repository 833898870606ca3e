// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Comcell (small group) endpoints.

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{ComcellGroup, GroupMember, GroupUpdate, MembershipChange, ResourceId};

impl ApiClient {
    /// `GET /comcell/getComcellGroupDetail/:id`
    pub async fn get_group_detail(
        &self,
        group_id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<ComcellGroup> {
        self.fetch(
            Method::GET,
            &["comcell", "getComcellGroupDetail", group_id.as_str()],
            None::<&()>,
            cancel,
        )
        .await
    }

    /// `GET /comcell/getComcellGroupMembers/:id`
    pub async fn get_group_members(
        &self,
        group_id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<Vec<GroupMember>> {
        self.fetch(
            Method::GET,
            &["comcell", "getComcellGroupMembers", group_id.as_str()],
            None::<&()>,
            cancel,
        )
        .await
    }

    /// `POST /comcell/updateComcellGroup/:id`
    pub async fn update_group(
        &self,
        group_id: &ResourceId,
        update: &GroupUpdate,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(
            Method::POST,
            &["comcell", "updateComcellGroup", group_id.as_str()],
            Some(update),
            cancel,
        )
        .await
    }

    /// `DELETE /comcell/deleteComcellGroup/:id`
    pub async fn delete_group(
        &self,
        group_id: &ResourceId,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(
            Method::DELETE,
            &["comcell", "deleteComcellGroup", group_id.as_str()],
            None::<&()>,
            cancel,
        )
        .await
    }

    /// `POST /comcell/addMemberToComcellGroup`
    pub async fn add_group_member(
        &self,
        change: &MembershipChange,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(
            Method::POST,
            &["comcell", "addMemberToComcellGroup"],
            Some(change),
            cancel,
        )
        .await
    }

    /// `POST /comcell/removeMemberFromComcellGroup`
    pub async fn remove_group_member(
        &self,
        change: &MembershipChange,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(
            Method::POST,
            &["comcell", "removeMemberFromComcellGroup"],
            Some(change),
            cancel,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberRole;
    use crate::testing::{envelope_ok, MockBackend};
    use axum::{
        extract::Path,
        routing::{delete, get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    fn routes() -> Router {
        Router::new()
            .route(
                "/comcell/getComcellGroupDetail/{id}",
                get(|Path(id): Path<String>| async move {
                    envelope_ok(json!({
                        "id": id,
                        "name": "Eastside",
                        "leader_id": "u-1",
                        "coLeaderId": "u-2"
                    }))
                }),
            )
            .route(
                "/comcell/getComcellGroupMembers/{id}",
                get(|| async {
                    envelope_ok(json!([
                        { "user_id": "u-1", "name": "Grace", "role": "leader" },
                        { "user_id": "u-2", "name": "Paul", "role": "co-leader" },
                        { "user_id": "u-3", "name": "Lydia", "role": "member" }
                    ]))
                }),
            )
            .route(
                "/comcell/updateComcellGroup/{id}",
                post(|Json(body): Json<Value>| async move { envelope_ok(body) }),
            )
            .route(
                "/comcell/deleteComcellGroup/{id}",
                delete(|| async { envelope_ok(Value::Null) }),
            )
            .route(
                "/comcell/addMemberToComcellGroup",
                post(|| async { envelope_ok(Value::Null) }),
            )
            .route(
                "/comcell/removeMemberFromComcellGroup",
                post(|| async { envelope_ok(Value::Null) }),
            )
    }

    #[tokio::test]
    async fn reads_group_and_members() {
        let backend = MockBackend::start(routes()).await;
        let client = backend.client();
        let cancel = CancellationToken::new();
        let id = ResourceId::new("g-1");

        let group = client.get_group_detail(&id, &cancel).await.unwrap();
        assert_eq!(group.id, id);
        assert_eq!(group.ownership.leader_id, Some("u-1".into()));
        assert_eq!(group.ownership.co_leader_id, Some("u-2".into()));

        let members = client.get_group_members(&id, &cancel).await.unwrap();
        assert_eq!(members.len(), 3);
        assert_eq!(members[1].role, MemberRole::CoLeader);
    }

    #[tokio::test]
    async fn mutations_hit_expected_routes() {
        let backend = MockBackend::start(routes()).await;
        let client = backend.client();
        let cancel = CancellationToken::new();
        let id = ResourceId::new("g-1");
        let change = MembershipChange {
            group_id: id.clone(),
            user_id: "u-9".into(),
            role: Some(MemberRole::Member),
        };

        client
            .update_group(
                &id,
                &GroupUpdate {
                    name: "Eastside".into(),
                    ..Default::default()
                },
                &cancel,
            )
            .await
            .unwrap();
        client.add_group_member(&change, &cancel).await.unwrap();
        client.remove_group_member(&change, &cancel).await.unwrap();
        client.delete_group(&id, &cancel).await.unwrap();

        assert_eq!(
            backend.requests(),
            vec![
                "POST /comcell/updateComcellGroup/g-1",
                "POST /comcell/addMemberToComcellGroup",
                "POST /comcell/removeMemberFromComcellGroup",
                "DELETE /comcell/deleteComcellGroup/g-1",
            ]
        );
    }
}
