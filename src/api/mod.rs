// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # REST Data Access
//!
//! [`ApiClient`] wraps the community REST API. Every response uses the
//! envelope `{ success, data, message? }`; a `success: false` body, a non-2xx
//! status and a transport failure all become an [`ApiError`].
//!
//! Every call takes a [`CancellationToken`]. When the token fires first the
//! in-flight request is dropped and the call resolves to
//! [`ApiError::Cancelled`].
//!
//! Endpoint groups live in submodules as `impl ApiClient` blocks:
//!
//! - `auth` - login
//! - `comcell` - group detail, membership, update, delete
//! - `team` - team detail, roster, per-member detail
//! - `events` - events by group, event edits, attendance, attendance stats
//! - `users` - global role changes

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::config::ConsoleConfig;
use crate::error::{ApiError, ApiResult};
use crate::session::TokenSource;

pub mod auth;
pub mod comcell;
pub mod events;
pub mod team;
pub mod users;

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Body shape of non-2xx responses that skipped the envelope.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Client for the community REST API.
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: Client,
    tokens: Option<Arc<dyn TokenSource>>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.tokens.is_some())
            .finish()
    }
}

impl ApiClient {
    /// Create a client rooted at `base_url`.
    pub fn new(base_url: Url, timeout: Duration) -> ApiResult<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url,
            http,
            tokens: None,
        })
    }

    pub fn from_config(config: &ConsoleConfig) -> ApiResult<Self> {
        Self::new(config.api_base_url.clone(), config.http_timeout)
    }

    /// Attach the bearer token source (normally the session store).
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build an endpoint URL from path segments; segments are percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Call an endpoint whose response must carry `data`.
    pub(crate) async fn fetch<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let data = self.call(method, segments, body, cancel).await?;
        let value = data.ok_or_else(|| ApiError::Decode("response carried no data".to_string()))?;
        Ok(serde_json::from_value(value)?)
    }

    /// Call an endpoint for its side effect; any `data` is ignored.
    pub(crate) async fn execute<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.call(method, segments, body, cancel).await.map(|_| ())
    }

    async fn call<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        cancel: &CancellationToken,
    ) -> ApiResult<Option<serde_json::Value>>
    where
        B: Serialize + ?Sized,
    {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let url = self.endpoint(segments)?;
        let request_id = Uuid::new_v4();

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(token) = self.tokens.as_ref().and_then(|t| t.bearer_token()) {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        debug!(%method, path = %url.path(), %request_id, "API request");

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ApiError::Cancelled),
            result = Self::round_trip(request) => result,
        };

        match &result {
            Ok(_) => debug!(%method, path = %url.path(), %request_id, "API request succeeded"),
            Err(ApiError::Cancelled) => {
                debug!(%method, path = %url.path(), %request_id, "API request cancelled")
            }
            Err(e) => warn!(
                %method,
                path = %url.path(),
                %request_id,
                error = %e,
                "API request failed"
            ),
        }

        result
    }

    async fn round_trip(request: reqwest::RequestBuilder) -> ApiResult<Option<serde_json::Value>> {
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .ok()
                .and_then(|b| b.message.or(b.error));
            return Err(ApiError::server(Some(status.as_u16()), message));
        }

        let envelope: Envelope = serde_json::from_slice(&bytes)?;
        if !envelope.success {
            return Err(ApiError::server(Some(status.as_u16()), envelope.message));
        }

        Ok(envelope.data.filter(|d| !d.is_null()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{envelope_ok, MockBackend};
    use axum::{http::StatusCode, routing::get, Json, Router};
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        name: String,
    }

    #[test]
    fn endpoint_encodes_segments() {
        let client = ApiClient::new(
            Url::parse("https://church.example.org/api/").unwrap(),
            Duration::from_secs(5),
        )
        .unwrap();
        let url = client
            .endpoint(&["comcell", "getComcellGroupDetail", "a b/c"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://church.example.org/api/comcell/getComcellGroupDetail/a%20b%2Fc"
        );
    }

    #[tokio::test]
    async fn decodes_envelope_data() {
        let backend = MockBackend::start(Router::new().route(
            "/thing",
            get(|| async { envelope_ok(json!({ "name": "widget" })) }),
        ))
        .await;

        let thing: Thing = backend
            .client()
            .fetch(Method::GET, &["thing"], None::<&()>, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(thing.name, "widget");
        assert_eq!(backend.hits(), 1);
    }

    #[tokio::test]
    async fn unsuccessful_envelope_surfaces_message() {
        let backend = MockBackend::start(Router::new().route(
            "/thing",
            get(|| async { Json(json!({ "success": false, "message": "Group is archived" })) }),
        ))
        .await;

        let err = backend
            .client()
            .execute(Method::GET, &["thing"], None::<&()>, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Group is archived"));
    }

    #[tokio::test]
    async fn error_status_reads_message_or_error_field() {
        let backend = MockBackend::start(
            Router::new()
                .route(
                    "/forbidden",
                    get(|| async {
                        (StatusCode::FORBIDDEN, Json(json!({ "message": "Leaders only" })))
                    }),
                )
                .route(
                    "/broken",
                    get(|| async {
                        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "db down" })))
                    }),
                )
                .route(
                    "/plain",
                    get(|| async { (StatusCode::BAD_GATEWAY, "upstream unavailable") }),
                ),
        )
        .await;
        let client = backend.client();
        let cancel = CancellationToken::new();

        let err = client
            .execute(Method::GET, &["forbidden"], None::<&()>, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.user_message("fallback"), "Leaders only");

        let err = client
            .execute(Method::GET, &["broken"], None::<&()>, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.user_message("fallback"), "db down");

        let err = client
            .execute(Method::GET, &["plain"], None::<&()>, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[tokio::test]
    async fn missing_data_is_a_decode_error() {
        let backend = MockBackend::start(Router::new().route(
            "/thing",
            get(|| async { Json(json!({ "success": true })) }),
        ))
        .await;

        let result: ApiResult<Thing> = backend
            .client()
            .fetch(Method::GET, &["thing"], None::<&()>, &CancellationToken::new())
            .await;
        assert!(matches!(result, Err(ApiError::Decode(_))));
    }

    #[tokio::test]
    async fn cancelled_token_skips_the_request() {
        let backend = MockBackend::start(Router::new().route(
            "/thing",
            get(|| async { envelope_ok(json!({ "name": "widget" })) }),
        ))
        .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = backend
            .client()
            .execute(Method::GET, &["thing"], None::<&()>, &cancel)
            .await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
        assert_eq!(backend.hits(), 0);
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_request() {
        let backend = MockBackend::start(Router::new().route(
            "/slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                envelope_ok(json!({ "name": "late" }))
            }),
        ))
        .await;

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let result = backend
            .client()
            .execute(Method::GET, &["slow"], None::<&()>, &cancel)
            .await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }

    #[tokio::test]
    async fn attaches_bearer_token_and_request_id() {
        use axum::http::HeaderMap;

        let backend = MockBackend::start(Router::new().route(
            "/whoami",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let has_request_id = headers.contains_key(REQUEST_ID_HEADER);
                envelope_ok(json!({ "auth": auth, "has_request_id": has_request_id }))
            }),
        ))
        .await;

        let session = Arc::new(crate::session::SessionStore::in_memory());
        session
            .sign_in(
                "tok-123".to_string(),
                crate::session::SessionUser::new("u-1", "Ruth", crate::auth::Role::User),
            )
            .unwrap();
        let client = backend.client().with_token_source(session);

        let seen: serde_json::Value = client
            .fetch(Method::GET, &["whoami"], None::<&()>, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(seen["auth"], "Bearer tok-123");
        assert_eq!(seen["has_request_id"], true);
    }
}
