// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use reqwest::Method;
use tokio_util::sync::CancellationToken;

use super::ApiClient;
use crate::error::ApiResult;
use crate::models::{LoginRequest, LoginResponse};

impl ApiClient {
    /// `POST /auth/login` → `{ token, user }`
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        cancel: &CancellationToken,
    ) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.fetch(Method::POST, &["auth", "login"], Some(&body), cancel)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use crate::testing::{envelope_err, envelope_ok, MockBackend};
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn login_returns_token_and_user() {
        let backend = MockBackend::start(Router::new().route(
            "/auth/login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "hunter2" {
                    envelope_ok(json!({
                        "token": "tok-abc",
                        "user": {
                            "id": 7,
                            "name": "Deborah",
                            "email": body["email"],
                            "roleName": "admin"
                        }
                    }))
                } else {
                    envelope_err("Invalid email or password")
                }
            }),
        ))
        .await;
        let client = backend.client();
        let cancel = CancellationToken::new();

        let response = client
            .login("deborah@example.org", "hunter2", &cancel)
            .await
            .unwrap();
        assert_eq!(response.token, "tok-abc");
        assert_eq!(response.user.role_name, Role::Admin);
        assert_eq!(response.user.email, "deborah@example.org");

        let err = client
            .login("deborah@example.org", "wrong", &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Invalid email or password"));
        assert_eq!(backend.requests(), vec!["POST /auth/login", "POST /auth/login"]);
    }
}
