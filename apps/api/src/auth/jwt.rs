// JWT token creation and verification
// Tokens carry `{ user: { id } }` and expire after the configured TTL

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Identity embedded in a token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClaimUser {
    pub id: Uuid,
}

/// JWT claims structure
///
/// # Fields
/// * `user` - The authenticated user (`user.id`)
/// * `iat` - Issued-at time (seconds since epoch)
/// * `exp` - Expiry time (seconds since epoch)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user: ClaimUser,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Creates a signed token for a user
///
/// # Arguments
/// * `user_id` - The user's ID to embed as `user.id`
/// * `secret` - The HMAC secret used for signing
/// * `ttl` - How long the token stays valid from now
///
/// # Token Properties
/// - Signed with HS256
/// - `exp` = issuance time + `ttl`
///
/// # Example
/// ```
/// use chrono::Duration;
/// use devconnect_api::auth::jwt::create_token;
/// use uuid::Uuid;
///
/// let token = create_token(Uuid::new_v4(), "your-secret-key", Duration::hours(1))
///     .expect("valid token");
/// assert_eq!(token.split('.').count(), 3);
/// ```
pub fn create_token(user_id: Uuid, secret: &str, ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        user: ClaimUser { id: user_id },
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(TokenError::Signing)
}

/// Verifies and decodes a token
///
/// Fails on a bad signature, a malformed token, or an `exp` in the past.
/// No clock leeway is granted.
///
/// # Example
/// ```
/// use chrono::Duration;
/// use devconnect_api::auth::jwt::{create_token, verify_token};
/// use uuid::Uuid;
///
/// let user_id = Uuid::new_v4();
/// let token = create_token(user_id, "secret", Duration::hours(1)).unwrap();
///
/// let claims = verify_token(&token, "secret").expect("valid token");
/// assert_eq!(claims.user.id, user_id);
/// ```
pub fn verify_token(token: &str, secret: &str) -> Result<Claims, TokenError> {
    let mut validation = Validation::default();
    validation.leeway = 0;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(TokenError::Invalid)
}
