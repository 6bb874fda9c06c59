// Repository implementations (data access layer)
// Adapters that implement domain repository interfaces

use serde::de::DeserializeOwned;

use crate::domain::repositories::StoreError;

pub mod in_memory;
pub mod postgres_post_repository;
pub mod postgres_profile_repository;
pub mod postgres_user_repository;

pub use in_memory::{InMemoryPostRepository, InMemoryProfileRepository, InMemoryUserRepository};
pub use postgres_post_repository::PostgresPostRepository;
pub use postgres_profile_repository::PostgresProfileRepository;
pub use postgres_user_repository::PostgresUserRepository;

/// Maps a driver error, surfacing unique violations as duplicates
pub(crate) fn store_error(context: &str, e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(db.message().to_string())
        }
        _ => StoreError::Backend(format!("{}: {}", context, e)),
    }
}

pub(crate) fn decode_document<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, StoreError> {
    serde_json::from_value(value).map_err(|e| StoreError::Corrupt(e.to_string()))
}
