#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use crackmes_api::config::{LogFormat, ServerConfig};
use crackmes_api::router::build_app_router;
use crackmes_api::state::AppState;
use crackmes_content::ContentService;
use crackmes_core::storage::StorageConfig;
use crackmes_db::models::user::CreateUser;
use crackmes_db::store::UserStore;
use crackmes_db::{MemoryStore, PoolSettings};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

pub const MODERATION_TOKEN: &str = "test-moderation-token";

/// Users seeded into every test app.
pub const USERS: [&str; 3] = ["alice", "bob", "Zed"];

/// Build a test `ServerConfig` with safe defaults and moderation enabled.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        moderation_token: Some(MODERATION_TOKEN.to_string()),
        db: PoolSettings::default(),
        log_format: LogFormat::Text,
    }
}

/// A router over an in-memory store with throwaway storage roots.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub storage: StorageConfig,
    _crackme_dir: TempDir,
    _solution_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: ServerConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        for name in USERS {
            store
                .create_user(&CreateUser {
                    name: name.to_string(),
                    email: format!("{name}@example.com"),
                    password: "hash".to_string(),
                })
                .await
                .unwrap();
        }

        let crackme_dir = tempfile::tempdir().unwrap();
        let solution_dir = tempfile::tempdir().unwrap();
        let storage = StorageConfig {
            crackme_root: crackme_dir.path().to_path_buf(),
            solution_root: solution_dir.path().to_path_buf(),
        }
        .resolve()
        .unwrap();

        let state = AppState {
            content: ContentService::new(store.clone(), Arc::new(storage.clone())),
            config: Arc::new(config.clone()),
        };

        Self {
            router: build_app_router(state, &config),
            store,
            storage,
            _crackme_dir: crackme_dir,
            _solution_dir: solution_dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Upload a crackme as `author` and approve it. Returns its hex id.
    pub async fn visible_crackme(&self, author: &str) -> String {
        let response = self
            .send(upload(
                CRACKME_UPLOAD,
                author,
                b"MZ\x90\x00",
            ))
            .await;
        let hexid = body_json(response).await["data"]["hexid"]
            .as_str()
            .unwrap()
            .to_string();

        let approved = self
            .send(moderate(
                Method::POST,
                &format!("/api/v1/moderation/crackme/{hexid}/approve"),
                Some(MODERATION_TOKEN),
                None,
            ))
            .await;
        assert_eq!(approved.status(), 200);
        hexid
    }
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Crackme upload URI with every required detail.
pub const CRACKME_UPLOAD: &str =
    "/api/v1/crackmes?name=keygenme&filename=keygenme.zip&lang=C&arch=x86-64&platform=Linux";

/// Solution upload URI for `crackme` with a valid writeup.
pub fn solution_upload(crackme: &str, filename: &str) -> String {
    format!("/api/v1/crackmes/{crackme}/solutions?filename={filename}&info=patched%20the%20check")
}

pub fn get(uri: &str, user: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-auth-user", user);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, user: Option<&str>, json: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(user) = user {
        builder = builder.header("x-auth-user", user);
    }
    builder.body(Body::from(json.to_string())).unwrap()
}

/// A raw-body upload with a truthful `Content-Length`.
pub fn upload(uri: &str, user: &str, bytes: &[u8]) -> Request<Body> {
    upload_declared(uri, user, bytes, bytes.len() as u64)
}

/// A raw-body upload with an arbitrary declared length.
pub fn upload_declared(uri: &str, user: &str, bytes: &[u8], declared: u64) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("x-auth-user", user)
        .header(CONTENT_LENGTH, declared)
        .body(Body::from(bytes.to_vec()))
        .unwrap()
}

pub fn moderate(
    method: Method,
    uri: &str,
    token: Option<&str>,
    json: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-moderation-token", token);
    }
    match json {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
