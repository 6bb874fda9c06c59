use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::auth::jwt::verify_token;
use crate::config::JwtConfig;

/// Authenticated caller for protected routes
///
/// Accepts `Authorization: Bearer <token>` as well as a bare token.
///
/// Usage:
/// ```rust,ignore
/// async fn protected_handler(AuthUser(user_id): AuthUser) -> Result<String, ApiError> {
///     Ok(format!("Hello user {}", user_id))
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)?;
        let jwt = JwtConfig::from_ref(state);

        let claims = verify_token(token, &jwt.secret).map_err(|e| {
            tracing::debug!(error = %e, "rejected bearer token");
            ApiError::InvalidToken
        })?;

        Ok(AuthUser(claims.user.id))
    }
}

/// Pulls the token out of the `Authorization` header
///
/// - no header: `MissingToken`
/// - header not valid UTF-8: `InvalidToken`
/// - optional `Bearer ` prefix stripped, then whitespace trimmed
/// - nothing left: `MissingToken`
pub fn extract_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    let header = headers.get(AUTHORIZATION).ok_or(ApiError::MissingToken)?;
    let header = header.to_str().map_err(|_| ApiError::InvalidToken)?;

    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        return Err(ApiError::MissingToken);
    }

    Ok(token)
}
