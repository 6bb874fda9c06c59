use axum::{extract::State, Json};
use serde::Deserialize;

use super::auth::TokenResponse;
use crate::api::errors::ApiError;
use crate::api::extract::Payload;
use crate::api::middleware::auth::AuthUser;
use crate::auth::jwt::create_token;
use crate::auth::password::hash_password;
use crate::domain::repositories::StoreError;
use crate::domain::user::{Email, User};
use crate::domain::validation::Validator;
use crate::state::AppState;

const USER_EXISTS: &str = "User already exists";

/// Request body for user registration
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Register a new user and log them in
///
/// POST /api/users
pub async fn register(
    State(state): State<AppState>,
    Payload(req): Payload<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    Validator::new()
        .required("name", req.name.as_deref(), "Name is required")
        .email("email", req.email.as_deref(), "Please include a valid email")
        .min_length(
            "password",
            req.password.as_deref(),
            6,
            "Please enter a password with 6 or more characters",
        )
        .finish()?;

    let email = Email::new(req.email.unwrap_or_default()).map_err(ApiError::rejected)?;

    // Fast path; the store's unique index still decides races
    if state.users.find_by_email(&email).await?.is_some() {
        return Err(ApiError::rejected(USER_EXISTS));
    }

    let password = req.password.unwrap_or_default();
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password)).await??;
    let name = req.name.unwrap_or_default().trim().to_string();
    let user = User::new(name, email, password_hash);

    state.users.create(&user).await.map_err(|e| match e {
        StoreError::Duplicate(_) => ApiError::rejected(USER_EXISTS),
        other => other.into(),
    })?;
    tracing::info!(user_id = %user.id, "user registered");

    let token = create_token(user.id, &state.jwt.secret, state.jwt.expiration)?;

    Ok(Json(TokenResponse { token }))
}

/// The caller's own user record (without password)
///
/// GET /api/users
pub async fn current_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<User>, ApiError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user))
}
