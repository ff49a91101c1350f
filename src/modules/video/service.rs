use super::model::{Video, VideoPatch};
use crate::common::error::UploadError;
use crate::common::upload::PartSource;
use crate::media::naming::content_name;
use crate::media::policy::{THUMBNAIL_POLICY, VIDEO_POLICY};
use crate::media::staging::StagedFile;
use crate::media::{probe, transcode};
use crate::state::AppState;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

pub struct UploadService;

impl UploadService {
    /// Looks the video up and checks `user_id` owns it. Runs before any of
    /// the request body is read.
    async fn authorize(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        action: &str,
    ) -> Result<Video, UploadError> {
        let video = state
            .videos
            .find_by_id(video_id)
            .await
            .map_err(UploadError::Persistence)?
            .ok_or_else(|| UploadError::NotFound("Couldn't find video".to_string()))?;

        if video.user_id != user_id {
            return Err(UploadError::Forbidden(format!("Not authorized to {}", action)));
        }

        Ok(video)
    }

    /// Stage, remux for fast start, classify, store, then point the record
    /// at the stored object. The record is only touched once the object is
    /// stored.
    pub async fn upload_video<P: PartSource>(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        source: P,
    ) -> Result<Video, UploadError> {
        let video = Self::authorize(state, video_id, user_id, "upload a video").await?;

        let part = source.read_part(&VIDEO_POLICY).await?;
        let media_type = VIDEO_POLICY.validate(&part)?;
        let file_name = content_name(&media_type);

        let staged = StagedFile::write(&state.config.assets_root, &file_name, part.bytes).await?;

        let processed =
            transcode::fast_start(state.tools.as_ref(), &state.config.ffmpeg_path, &staged)
                .await?;
        staged.remove().await;

        let aspect = probe::aspect_ratio(
            state.tools.as_ref(),
            &state.config.ffprobe_path,
            processed.path(),
        )
        .await?;

        let key = format!("{}/{}", aspect, file_name);
        info!(video_id = %video.id, key = %key, "uploading video to object storage");

        state
            .storage
            .put_file(&key, processed.path(), media_type.essence_str())
            .await
            .map_err(|e| UploadError::Storage {
                key: key.clone(),
                message: e.to_string(),
            })?;
        processed.remove().await;

        let video_url = format!("https://{}/{}", state.config.s3_cf_distribution, key);
        let updated = state
            .videos
            .apply_update(video.id, VideoPatch::video_url(video_url))
            .await
            .map_err(UploadError::Persistence)?;

        info!(video_id = %updated.id, title = %updated.title, "video uploaded");
        Ok(updated)
    }

    /// Thumbnails are served straight from the assets root; no processing.
    pub async fn upload_thumbnail<P: PartSource>(
        state: &AppState,
        video_id: Uuid,
        user_id: Uuid,
        source: P,
    ) -> Result<Video, UploadError> {
        let video =
            Self::authorize(state, video_id, user_id, "upload thumbnail for this video").await?;

        let part = source.read_part(&THUMBNAIL_POLICY).await?;
        let media_type = THUMBNAIL_POLICY.validate(&part)?;
        let file_name = content_name(&media_type);

        let asset = StagedFile::write(&state.config.assets_root, &file_name, part.bytes).await?;
        let thumbnail_url = asset_url(&state.config.public_base_url, &file_name)?;

        let updated = state
            .videos
            .apply_update(video.id, VideoPatch::thumbnail_url(thumbnail_url))
            .await
            .map_err(UploadError::Persistence)?;

        let path = asset.keep();
        debug!(path = %path.display(), "thumbnail kept");
        info!(video_id = %updated.id, title = %updated.title, "thumbnail uploaded");
        Ok(updated)
    }
}

fn asset_url(base: &Url, file_name: &str) -> Result<String, UploadError> {
    base.join(&format!("assets/{}", file_name))
        .map(String::from)
        .map_err(|e| UploadError::Processing(format!("cannot build asset URL: {}", e)))
}
