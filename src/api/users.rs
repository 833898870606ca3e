// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::UpdateUserRoleRequest;

impl ApiClient {
    /// `POST /user/updateUserRole`
    pub async fn update_user_role(
        &self,
        request: &UpdateUserRoleRequest,
        cancel: &CancellationToken,
    ) -> ApiResult<()> {
        self.execute(Method::POST, &["user", "updateUserRole"], Some(request), cancel)
            .await
    }
}
