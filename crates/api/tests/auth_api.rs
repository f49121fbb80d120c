//! HTTP-level integration tests for registration, login and the catalog.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, create_user, get, get_auth, post_json, post_json_auth};
use serde_json::json;
use sqlx::PgPool;

fn registration(email: &str) -> serde_json::Value {
    json!({ "name": "Rosa Quispe", "email": email, "password": "titicaca-2024" })
}

// ---------------------------------------------------------------------------
// Auth flow
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_then_login(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(&app, "/api/v1/auth/register", registration("rosa@test.com")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert!(json["access_token"].is_string());
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["role"], "usuario");
    assert!(json["user"].get("password_hash").is_none());

    let body = json!({ "email": "ROSA@test.com", "password": "titicaca-2024" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    let token = body_json(response).await["access_token"].as_str().unwrap().to_string();

    let me = body_json(get_auth(&app, "/api/v1/auth/me", &token).await).await;
    assert_eq!(me["email"], "rosa@test.com");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_is_409(pool: PgPool) {
    let app = build_test_app(pool);

    post_json(&app, "/api/v1/auth/register", registration("rosa@test.com")).await;
    let response = post_json(&app, "/api/v1/auth/register", registration("rosa@test.com")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_rejects_weak_password_and_bad_email(pool: PgPool) {
    let app = build_test_app(pool);

    let body = json!({ "name": "Rosa", "email": "rosa@test.com", "password": "corta" });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = json!({ "name": "Rosa", "email": "not-an-email", "password": "titicaca-2024" });
    let response = post_json(&app, "/api/v1/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_login_with_wrong_password_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    post_json(&app, "/api/v1/auth/register", registration("rosa@test.com")).await;

    let body = json!({ "email": "rosa@test.com", "password": "wrong-password" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = json!({ "email": "ghost@test.com", "password": "titicaca-2024" });
    let response = post_json(&app, "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_token_is_401(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get_auth(&app, "/api/v1/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_catalog_is_public_but_admin_managed(pool: PgPool) {
    let (_admin, admin) = create_user(&pool, "admin@test.com", "admin").await;
    let (_user, user) = create_user(&pool, "ana@test.com", "usuario").await;
    let app = build_test_app(pool);

    let response = post_json_auth(&app, "/api/v1/emprendedores", &user, json!({ "name": "Kayak Perú" })).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = post_json_auth(&app, "/api/v1/emprendedores", &admin, json!({ "name": "Kayak Perú" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let provider_id = body_json(response).await["id"].as_i64().unwrap();

    let body = json!({ "provider_id": provider_id, "name": "Kayak al amanecer", "reference_price": 45.0 });
    let response = post_json_auth(&app, "/api/v1/servicios", &admin, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let service = body_json(response).await;
    assert_eq!(service["capacity"], 1);

    let list = body_json(get(&app, "/api/v1/servicios").await).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let response = get(&app, &format!("/api/v1/servicios/{}", service["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(get(&app, "/api/v1/servicios/9999").await.status(), StatusCode::NOT_FOUND);

    let body = json!({ "provider_id": 9999, "name": "Huérfano" });
    let response = post_json_auth(&app, "/api/v1/servicios", &admin, body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_endpoint(pool: PgPool) {
    let app = build_test_app(pool);
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}
