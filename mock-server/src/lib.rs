//! Local HTTP server used as the test harness for `request-core`.
//!
//! Each route exercises one client behaviour: a plain JSON reply, an echo of
//! everything the client sent, a text body, a slow reply for timeouts and an
//! empty 204.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::Query,
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

pub const TEXT_BODY: &str = "some custom text";

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(5);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

/// What the server saw on `/echo`. Header names are lower-cased.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/bar", get(bar))
        .route("/echo", any(echo))
        .route("/text", get(text))
        .route("/slow", get(slow))
        .route("/empty", get(empty))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn bar() -> Json<Message> {
    Json(Message {
        message: "foo".to_string(),
    })
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    Query(query): Query<BTreeMap<String, String>>,
    body: Bytes,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();
    tracing::debug!(%method, "echo");
    Json(Echo {
        method: method.to_string(),
        headers,
        query,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn text() -> &'static str {
    TEXT_BODY
}

async fn slow() -> Json<Message> {
    tokio::time::sleep(SLOW_DELAY).await;
    bar().await
}

async fn empty() -> StatusCode {
    StatusCode::NO_CONTENT
}
