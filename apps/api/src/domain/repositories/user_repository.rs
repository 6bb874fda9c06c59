use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;
use crate::domain::user::{Email, User};

/// Repository trait for User documents
///
/// # Invariants
/// - `email` is unique; `create` fails with [`StoreError::Duplicate`]
///   rather than writing a second record
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user
    async fn create(&self, user: &User) -> Result<(), StoreError>;

    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Find a user by email address
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;

    /// Find every user whose id is in `ids` (missing ids are skipped)
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, StoreError>;

    /// Remove a user; returns whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}
