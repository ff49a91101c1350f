use super::model::{Video, VideoPatch};
use crate::infrastructure::db::pool::DbPool;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use uuid::Uuid;

/// Persistent home of video records.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>>;

    /// Applies `patch` to the stored record and returns the new value.
    async fn apply_update(&self, id: Uuid, patch: VideoPatch) -> Result<Video>;
}

#[derive(Clone)]
pub struct PgVideoRepository {
    pool: DbPool,
}

impl PgVideoRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    async fn apply_update(&self, id: Uuid, patch: VideoPatch) -> Result<Video> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET video_url = COALESCE($2, video_url),
                thumbnail_url = COALESCE($3, thumbnail_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, title, description, thumbnail_url, video_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(patch.video_url)
        .bind(patch.thumbnail_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| anyhow!("video {} disappeared before it could be updated", id))?;

        Ok(video)
    }
}
