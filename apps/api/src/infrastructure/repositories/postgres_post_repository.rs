use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{decode_document, store_error};
use crate::domain::post::Post;
use crate::domain::repositories::{PostRepository, StoreError};

/// PostgreSQL implementation of PostRepository
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    /// Creates a new PostgresPostRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: &Post) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, document, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(post.id)
        .bind(post.user)
        .bind(Json(post))
        .bind(post.date)
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to create post", e))?;

        Ok(())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<Post>, StoreError> {
        let documents: Vec<serde_json::Value> = sqlx::query_scalar(
            "SELECT document FROM posts WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| store_error("Failed to find posts by user", e))?;

        documents.into_iter().map(decode_document).collect()
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete posts", e))?;

        Ok(result.rows_affected())
    }
}
