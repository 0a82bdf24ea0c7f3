//! Shared helpers for driving the router in tests.

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use permadmin_api::AppState;
use permadmin_core::models::permission::Permission;
use permadmin_store::{MemoryStore, SeedData};
use serde_json::Value;
use tower::ServiceExt;

/// Router over the built-in demo data.
pub fn demo_app() -> Router {
    let store = MemoryStore::from_seed(SeedData::demo()).unwrap();
    permadmin_api::router(AppState::new(&store))
}

/// Router over the catalog `[read, write, delete, admin]` and no users.
pub fn small_app() -> Router {
    let catalog = ["read", "write", "delete", "admin"]
        .into_iter()
        .map(Permission::named)
        .collect();
    let store = MemoryStore::new(catalog).unwrap();
    permadmin_api::router(AppState::new(&store))
}

/// Send one request and return the status plus the decoded JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, json)
}

/// Send a raw (possibly malformed) JSON body.
pub async fn send_raw(app: &Router, method: &str, uri: &str, raw: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(raw.to_owned()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Ids of the `permissions` array in a `/v1` user-permissions body.
pub fn permission_ids(body: &Value) -> Vec<String> {
    body["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_owned())
        .collect()
}
