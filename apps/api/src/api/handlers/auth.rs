use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::api::errors::ApiError;
use crate::api::extract::Payload;
use crate::auth::jwt::create_token;
use crate::auth::password::verify_password;
use crate::domain::user::Email;
use crate::domain::validation::Validator;
use crate::state::AppState;

const INVALID_CREDENTIALS: &str = "Invalid Credentials";

/// Request body for login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token handed out by login and registration
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Authenticate a user and get a token
///
/// POST /api/auth
pub async fn login(
    State(state): State<AppState>,
    Payload(req): Payload<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    Validator::new()
        .email("email", req.email.as_deref(), "Please include a valid email")
        .present("password", req.password.as_deref(), "Password is required")
        .finish()?;

    let email = Email::new(req.email.unwrap_or_default()).map_err(ApiError::rejected)?;
    let password = req.password.unwrap_or_default();

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::rejected(INVALID_CREDENTIALS))?;

    let hash = user.password_hash.clone();
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash)).await??;
    if !matches {
        tracing::info!(user_id = %user.id, "login rejected: wrong password");
        return Err(ApiError::rejected(INVALID_CREDENTIALS));
    }

    let token = create_token(user.id, &state.jwt.secret, state.jwt.expiration)?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Json(TokenResponse { token }))
}

/// GET /
pub async fn index() -> &'static str {
    "API Running"
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}
