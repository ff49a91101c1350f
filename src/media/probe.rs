use crate::common::error::UploadError;
use crate::infrastructure::process::runner::{path_arg, ToolRunner};
use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

const RATIO_TOLERANCE: f64 = 0.05;
const LANDSCAPE: f64 = 16.0 / 9.0;
const PORTRAIT: f64 = 9.0 / 16.0;

/// Coarse orientation bucket used as the first segment of storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    Landscape,
    Portrait,
    Other,
}

impl AspectRatio {
    pub fn from_ratio(ratio: f64) -> Self {
        if (ratio - LANDSCAPE).abs() < RATIO_TOLERANCE {
            AspectRatio::Landscape
        } else if (ratio - PORTRAIT).abs() < RATIO_TOLERANCE {
            AspectRatio::Portrait
        } else {
            AspectRatio::Other
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "landscape",
            AspectRatio::Portrait => "portrait",
            AspectRatio::Other => "other",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Width and height of the first stream in ffprobe's JSON output.
pub fn parse_dimensions(stdout: &[u8]) -> Result<(u32, u32), UploadError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)
        .map_err(|e| UploadError::Processing(format!("unreadable ffprobe output: {}", e)))?;

    let stream = output
        .streams
        .first()
        .ok_or_else(|| UploadError::Processing("ffprobe found no video stream".to_string()))?;

    match (stream.width, stream.height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok((width, height)),
        (width, height) => Err(UploadError::Processing(format!(
            "ffprobe reported unusable dimensions {:?}x{:?}",
            width, height
        ))),
    }
}

pub async fn aspect_ratio(
    tools: &dyn ToolRunner,
    ffprobe: &str,
    path: &Path,
) -> Result<AspectRatio, UploadError> {
    let args = vec![
        "-v".to_string(),
        "error".to_string(),
        "-select_streams".to_string(),
        "v:0".to_string(),
        "-show_entries".to_string(),
        "stream=width,height".to_string(),
        "-of".to_string(),
        "json".to_string(),
        path_arg(path),
    ];

    let result = tools
        .run(ffprobe, &args)
        .await
        .map_err(|e| UploadError::Processing(format!("failed to run {}: {}", ffprobe, e)))?;

    if !result.success() {
        warn!(status = ?result.status, "ffprobe exited unsuccessfully");
        return Err(UploadError::Tool {
            tool: "ffprobe",
            diagnostics: result.stderr_text(),
        });
    }

    let (width, height) = parse_dimensions(&result.stdout)?;
    let aspect = AspectRatio::from_ratio(f64::from(width) / f64::from(height));
    debug!(width, height, %aspect, "classified video");
    Ok(aspect)
}
