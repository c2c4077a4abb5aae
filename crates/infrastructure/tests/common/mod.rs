//! Local HTTP server shared by the integration tests.

#![allow(clippy::unwrap_used, dead_code)]

use std::io::Read;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::Redirect;
use axum::routing::{get, post};
use flate2::read::GzDecoder;
use serde_json::{Value, json};

/// Starts the test server on an ephemeral port and returns its address.
pub async fn spawn_server() -> SocketAddr {
    let router = Router::new()
        .route("/users/{id}", get(user))
        .route("/users/count", get(|| async { "42" }))
        .route("/echo", post(echo).put(echo))
        .route("/query", get(query))
        .route("/missing", get(missing))
        .route("/slow", get(slow))
        .route("/loop", get(|| async { Redirect::temporary("/loop") }))
        .route("/empty", get(|| async { StatusCode::NO_CONTENT }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A local address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

async fn user(Path(id): Path<i64>) -> Json<Value> {
    Json(json!({ "id": id, "name": format!("user-{id}") }))
}

/// Reports what arrived: headers of interest and the body, gunzipped when
/// marked as gzip.
async fn echo(headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let encoding = header("content-encoding");

    let decoded = if encoding.as_deref() == Some("gzip") {
        let mut out = String::new();
        GzDecoder::new(body.as_ref()).read_to_string(&mut out).unwrap();
        out
    } else {
        String::from_utf8(body.to_vec()).unwrap()
    };

    Json(json!({
        "content_type": header("content-type"),
        "content_encoding": encoding,
        "accept": header("accept"),
        "user_agent": header("user-agent"),
        "body": decoded,
    }))
}

async fn query(RawQuery(query): RawQuery) -> Json<Value> {
    Json(json!(query.unwrap_or_default()))
}

async fn missing() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "not here" })))
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(10)).await;
    "1"
}
