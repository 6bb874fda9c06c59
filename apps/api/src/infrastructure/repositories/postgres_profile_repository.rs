use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use super::{decode_document, store_error};
use crate::domain::profile::Profile;
use crate::domain::repositories::{ProfileRepository, StoreError};

/// PostgreSQL implementation of ProfileRepository
///
/// Each profile is one JSONB document; `user_id` is unique so the table
/// holds at most one profile per user. The row `id` always follows the
/// document's `_id`, also when a save lands on another profile's row.
pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    /// Creates a new PostgresProfileRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_user(&self, user_id: Uuid) -> Result<Option<Profile>, StoreError> {
        let document: Option<serde_json::Value> =
            sqlx::query_scalar("SELECT document FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| store_error("Failed to find profile by user", e))?;

        document.map(decode_document).transpose()
    }

    async fn find_all(&self) -> Result<Vec<Profile>, StoreError> {
        let documents: Vec<serde_json::Value> =
            sqlx::query_scalar("SELECT document FROM profiles ORDER BY created_at")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| store_error("Failed to list profiles", e))?;

        documents.into_iter().map(decode_document).collect()
    }

    async fn save(&self, profile: &Profile) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, document)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE SET
                id = EXCLUDED.id,
                document = EXCLUDED.document,
                updated_at = NOW()
            "#,
        )
        .bind(profile.id)
        .bind(profile.user)
        .bind(Json(profile))
        .execute(&self.pool)
        .await
        .map_err(|e| store_error("Failed to save profile", e))?;

        Ok(())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("Failed to delete profile", e))?;

        Ok(result.rows_affected() > 0)
    }
}
