use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::jwt::TokenError;
use crate::domain::repositories::StoreError;
use crate::domain::validation::FieldError;
use crate::infrastructure::github::GithubError;

const SERVER_ERROR: &str = "Server Error";

/// Errors a handler can answer with
///
/// Bodies follow two shapes: `{"errors": [{"msg": ..}]}` for input and
/// credential problems, `{"msg": ..}` for everything else. Internal
/// details never reach the client; they are logged instead.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more request fields failed validation (400)
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// Request understood but refused, e.g. bad credentials (400)
    #[error("{0}")]
    Rejected(String),

    /// Referenced document does not exist (400)
    #[error("{0}")]
    NotFound(String),

    #[error("Missing auth token")]
    MissingToken,

    #[error("Invalid auth token")]
    InvalidToken,

    #[error("upstream: {0}")]
    Github(#[from] GithubError),

    #[error("internal: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::Internal(detail.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Rejected(_) | ApiError::NotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::MissingToken | ApiError::InvalidToken => StatusCode::UNAUTHORIZED,
            ApiError::Github(GithubError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Github(GithubError::RateLimited) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Github(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::Validation(errors) => json!({ "errors": errors }),
            ApiError::Rejected(msg) => json!({ "errors": [{ "msg": msg }] }),
            ApiError::NotFound(msg) => json!({ "msg": msg }),
            ApiError::MissingToken => json!({ "msg": "Missing auth token" }),
            ApiError::InvalidToken => json!({ "msg": "Invalid auth token" }),
            ApiError::Github(GithubError::NotFound) => json!({ "msg": "No Github profile found" }),
            ApiError::Github(GithubError::RateLimited) => {
                json!({ "msg": "Github rate limit exceeded" })
            }
            ApiError::Github(GithubError::Status(code)) => {
                json!({ "msg": "Github request failed", "upstreamStatus": code })
            }
            ApiError::Github(GithubError::Transport(detail)) => {
                tracing::warn!(error = %detail, "github request failed");
                json!({ "msg": "Github request failed" })
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                json!({ "msg": SERVER_ERROR })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::internal(e)
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(e: bcrypt::BcryptError) -> Self {
        Self::internal(format!("password hashing: {}", e))
    }
}

/// bcrypt runs on the blocking pool; a panicked or cancelled task lands here
impl From<tokio::task::JoinError> for ApiError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::internal(format!("blocking task: {}", e))
    }
}

/// Only reached when signing fails; verification failures are mapped by
/// the auth extractor
impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        Self::internal(e)
    }
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}
