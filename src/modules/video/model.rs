use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq, ToSchema)]
pub struct Video {
    pub id: Uuid,
    /// Only this user may attach media to the video.
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

/// Field-level update of a video's asset URLs. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoPatch {
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl VideoPatch {
    pub fn video_url(url: String) -> Self {
        Self {
            video_url: Some(url),
            ..Self::default()
        }
    }

    pub fn thumbnail_url(url: String) -> Self {
        Self {
            thumbnail_url: Some(url),
            ..Self::default()
        }
    }
}
