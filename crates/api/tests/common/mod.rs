//! Shared helpers for HTTP-level integration tests.
//!
//! Requests are driven in-process through the real router (same middleware
//! stack as the binary) with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use turismo_api::auth::jwt::{generate_access_token, JwtConfig};
use turismo_api::config::ServerConfig;
use turismo_api::router::build_app_router;
use turismo_api::state::AppState;
use turismo_db::models::provider::{CreateProvider, Provider};
use turismo_db::models::service::{CreateService, Service};
use turismo_db::models::user::{CreateUser, User};
use turismo_db::repositories::{ProviderRepo, ServiceRepo, UserRepo};

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router over the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: &Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: &Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with the given role and mint an access token for it.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> (User, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: "unused-in-token-tests".to_string(),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed");
    let token = generate_access_token(user.id, &user.role, &test_config().jwt)
        .expect("token generation should succeed");
    (user, token)
}

/// Insert a provider (optionally managed by `manager_id`) offering one service.
pub async fn create_service(
    pool: &PgPool,
    manager_id: Option<i64>,
    price: Option<f64>,
) -> (Provider, Service) {
    let provider = ProviderRepo::create(
        pool,
        &CreateProvider {
            name: "Asociación Llachón".to_string(),
            user_id: manager_id,
        },
    )
    .await
    .expect("provider creation should succeed");
    let service = ServiceRepo::create(
        pool,
        &CreateService {
            provider_id: provider.id,
            name: "Paseo en totora".to_string(),
            description: Some("Recorrido por las islas flotantes".to_string()),
            reference_price: price,
            capacity: None,
        },
    )
    .await
    .expect("service creation should succeed");
    (provider, service)
}

/// An add-to-cart / direct-item body.
pub fn booking(service_id: i64, from: &str, to: &str, start: &str, end: &str) -> Value {
    json!({
        "service_id": service_id,
        "start_date": from,
        "end_date": to,
        "start_time": start,
        "end_time": end,
    })
}
