use crate::common::error::UploadError;
use crate::infrastructure::process::runner::{path_arg, ToolRunner};
use crate::media::staging::StagedFile;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const PROCESSED_SUFFIX: &str = ".processed";

pub fn processed_path(input: &Path) -> PathBuf {
    let mut path = input.as_os_str().to_owned();
    path.push(PROCESSED_SUFFIX);
    PathBuf::from(path)
}

/// Remuxes `input` so the MP4 index precedes the media data. Streams are
/// copied, not re-encoded. The result lives next to the input at
/// `<input>.processed`; a partial result is discarded on failure.
pub async fn fast_start(
    tools: &dyn ToolRunner,
    ffmpeg: &str,
    input: &StagedFile,
) -> Result<StagedFile, UploadError> {
    let output = StagedFile::adopt(processed_path(input.path()));

    let args = vec![
        "-i".to_string(),
        path_arg(input.path()),
        "-movflags".to_string(),
        "faststart".to_string(),
        "-codec".to_string(),
        "copy".to_string(),
        "-f".to_string(),
        "mp4".to_string(),
        path_arg(output.path()),
    ];

    info!(input = %input.path().display(), "remuxing video for fast start");

    let result = tools
        .run(ffmpeg, &args)
        .await
        .map_err(|e| UploadError::Processing(format!("failed to run {}: {}", ffmpeg, e)))?;

    if !result.success() {
        warn!(status = ?result.status, "ffmpeg exited unsuccessfully");
        return Err(UploadError::Tool {
            tool: "FFmpeg",
            diagnostics: result.stderr_text(),
        });
    }

    Ok(output)
}
