//! Handlers for the `/auth` resource (register, login, me).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use turismo_core::error::CoreError;
use turismo_core::roles::ROLE_USER;
use turismo_db::models::user::{CreateUser, User, UserResponse};
use turismo_db::repositories::UserRepo;
use validator::Validate;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Create a customer account (role `usuario`) and sign it in.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            name: input.name,
            email: input.email,
            password_hash,
            role: ROLE_USER.to_string(),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(auth_response(&state, user)?)))
}

/// POST /api/v1/auth/login
///
/// Authenticate with email + password. Returns an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Invalid email or password".into()))
        })?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid email or password".into(),
        )));
    }

    Ok(Json(auth_response(&state, user)?))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;
    Ok(Json(UserResponse::from(user)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn auth_response(state: &AppState, user: User) -> AppResult<AuthResponse> {
    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from(user),
    })
}
