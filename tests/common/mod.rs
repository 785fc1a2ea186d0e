#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, StatusCode, header},
};
use serde_json::Value;
use std::{
    path::PathBuf,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use streamline::config::AuthConfig;
use streamline::db::Database;
use streamline::router::{StreamlineState, streamline_router};
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub db: Arc<Database>,
    path: PathBuf,
}

impl TestApp {
    pub fn new(tag: &str) -> Self {
        Self::with_auth(tag, test_auth_config())
    }

    pub fn with_auth(tag: &str, auth: AuthConfig) -> Self {
        let path = temp_db_path(tag);
        let db = Arc::new(Database::new(format!("sqlite:{}", path.display())));
        let state = StreamlineState::new(db.clone(), &auth).expect("failed to build state");
        Self {
            router: streamline_router(state),
            db,
            path,
        }
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Option<String>, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("failed to build request"),
        )
        .await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).expect("failed to build request"))
            .await
    }

    pub async fn post_with_cookie(&self, uri: &str, cookie: &str) -> (StatusCode, Option<String>, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .expect("failed to build request"),
        )
        .await
    }

    /// Returns status, the `name=value` part of the first Set-Cookie header, and the JSON body.
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("request failed");
        read_response(resp).await
    }

    pub async fn count_users(&self, email: &str) -> i64 {
        self.db
            .storage()
            .await
            .expect("storage unavailable")
            .count_by_email(email)
            .await
            .expect("count failed")
    }

    pub async fn cleanup(self) {
        self.db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", self.path.display()));
        }
    }
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        insecure_cookie: true,
        ..AuthConfig::default()
    }
}

pub fn temp_db_path(tag: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "streamline-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    path
}

pub async fn read_response(resp: Response<Body>) -> (StatusCode, Option<String>, Value) {
    let status = resp.status();
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("response body was not json")
    };
    (status, cookie, json)
}
