use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;
use crate::domain::profile::Profile;

/// Repository trait for Profile documents
///
/// Profiles are keyed by owner: at most one per user.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile owned by `user_id`
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError>;

    /// All profiles, oldest first
    async fn find_all(&self) -> Result<Vec<Profile>, StoreError>;

    /// Insert or replace the owner's profile document
    async fn save(&self, profile: &Profile) -> Result<(), StoreError>;

    /// Remove the owner's profile; returns whether one existed
    async fn delete_by_user(&self, user_id: Uuid) -> Result<bool, StoreError>;
}
