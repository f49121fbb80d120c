//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server or
//! database is needed.

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use turismo_api::error::AppError;
use turismo_core::error::CoreError;
use turismo_core::status::ReservationStatus;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Reservation",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Reservation with id 42 not found");
}

#[tokio::test]
async fn validation_returns_422() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Validation("bad date".into()))).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "bad date");
}

#[tokio::test]
async fn unknown_status_value_surfaces_as_validation() {
    let err = "archivada".parse::<ReservationStatus>().unwrap_err();
    assert_matches!(err, CoreError::Validation(_));

    let (status, _) = error_to_response(AppError::Core(err)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn invalid_state_returns_400() {
    let (status, json) = error_to_response(AppError::Core(CoreError::InvalidState(
        "item no longer in cart".into(),
    )))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INVALID_STATE");
    assert_eq!(json["error"], "item no longer in cart");
}

#[tokio::test]
async fn empty_cart_returns_400() {
    let (status, json) = error_to_response(AppError::Core(CoreError::EmptyCart)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "EMPTY_CART");
}

#[tokio::test]
async fn conflict_returns_409() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Conflict("slot taken".into()))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn forbidden_and_unauthorized() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("not yours".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("no token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) = error_to_response(AppError::Core(CoreError::Internal(
        "connection string postgres://secret".into(),
    )))
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) = error_to_response(AppError::InternalError("stack trace".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
