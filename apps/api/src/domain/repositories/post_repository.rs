use async_trait::async_trait;
use uuid::Uuid;

use super::StoreError;
use crate::domain::post::Post;

/// Repository trait for Post documents
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Insert a new post
    async fn create(&self, post: &Post) -> Result<(), StoreError>;

    /// Posts written by `user_id`, newest first
    ///
    /// No route lists posts yet; the account deletion tests use this to
    /// check the cascade, and a per-user feed would read through it.
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Post>, StoreError>;

    /// Remove every post written by `user_id`; returns how many were removed
    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, StoreError>;
}
