#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use coder_ai::{
    AiError, AiErrorKind, AiGateway, Completion, CompletionProvider, CompletionRequest,
    TokenUsage,
};
use coder_api::config::ServerConfig;
use coder_api::router::build_app_router;
use coder_api::state::AppState;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

/// Identity used by requests that do not name one.
pub const USER: &str = "user-a";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        user_id_header: "x-user-id".to_string(),
    }
}

/// Build the full application router with the AI gateway disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with_gateway(pool, AiGateway::disabled())
}

/// Build the full application router backed by a canned provider.
pub fn build_test_app_with_ai(pool: PgPool, provider: Arc<StubProvider>) -> Router {
    build_app_with_gateway(pool, AiGateway::new(provider))
}

fn build_app_with_gateway(pool: PgPool, ai: AiGateway) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ai: Arc::new(ai),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Stub AI provider
// ---------------------------------------------------------------------------

/// Answers every request with a fixed reply, or a fixed failure.
pub struct StubProvider {
    pub reply: String,
    pub fail_with: Option<AiErrorKind>,
    pub prompts: std::sync::Mutex<Vec<CompletionRequest>>,
}

impl StubProvider {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            fail_with: None,
            prompts: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub fn failing(kind: AiErrorKind) -> Arc<Self> {
        Arc::new(Self {
            reply: String::new(),
            fail_with: Some(kind),
            prompts: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub fn last_prompt(&self) -> Option<CompletionRequest> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    fn model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AiError> {
        self.prompts.lock().unwrap().push(request);
        if let Some(kind) = self.fail_with {
            return Err(AiError::new(kind, "stub failure"));
        }
        Ok(Completion {
            text: self.reply.clone(),
            model: "stub-model".to_string(),
            usage: TokenUsage::new(100, 50),
        })
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    user: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(USER), None).await
}

pub async fn get_as(app: Router, uri: &str, user: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(user), None).await
}

pub async fn get_anonymous(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(USER), Some(body)).await
}

pub async fn post_json_as(
    app: Router,
    uri: &str,
    user: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(user), Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(USER), Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(USER), None).await
}

pub async fn delete_as(app: Router, uri: &str, user: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(user), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a project through the API and return its id.
pub async fn create_project(pool: &PgPool, name: &str) -> String {
    let app = build_test_app(pool.clone());
    let json = body_json(post_json(app, "/api/v1/projects", serde_json::json!({"name": name})).await).await;
    json["data"]["id"].as_str().unwrap().to_string()
}
