// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process mock of the community REST API for tests.
//!
//! Every request that reaches the mock is recorded, so tests can assert
//! exactly which calls were (or were not) made.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use url::Url;

use crate::api::ApiClient;

type HitLog = Arc<Mutex<Vec<String>>>;

pub(crate) struct MockBackend {
    base_url: Url,
    hits: HitLog,
}

impl MockBackend {
    pub(crate) async fn start(router: Router) -> Self {
        let hits: HitLog = Arc::default();
        let app = Router::new()
            .nest("/api", router)
            .layer(middleware::from_fn_with_state(hits.clone(), record_hit));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend failed");
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api/")).expect("mock base URL"),
            hits,
        }
    }

    pub(crate) fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone(), Duration::from_secs(5)).expect("mock client")
    }

    pub(crate) fn hits(&self) -> usize {
        self.hits.lock().unwrap().len()
    }

    /// Recorded requests as `"METHOD /path"`, in arrival order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

async fn record_hit(State(hits): State<HitLog>, request: Request, next: Next) -> Response {
    let path = request
        .uri()
        .path()
        .strip_prefix("/api")
        .unwrap_or(request.uri().path())
        .to_string();
    hits.lock()
        .unwrap()
        .push(format!("{} {}", request.method(), path));
    next.run(request).await
}

/// `{ "success": true, "data": … }`
pub(crate) fn envelope_ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({ "success": true, "data": data }))
}

/// `{ "success": false, "message": … }`
pub(crate) fn envelope_err(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "message": message }))
}
