use crate::common::error::UploadError;
use crate::common::upload::FilePart;
use mime::Mime;

/// Allowance for multipart framing on top of the file ceiling.
const MULTIPART_OVERHEAD: usize = 1 << 20;

/// Constraints one kind of uploaded file must satisfy.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    /// Name of the multipart field carrying the file.
    pub field: &'static str,
    pub label: &'static str,
    pub max_bytes: usize,
    pub allowed_types: &'static [&'static str],
}

pub const VIDEO_POLICY: UploadPolicy = UploadPolicy {
    field: "video",
    label: "Video",
    max_bytes: 1 << 30,
    allowed_types: &["video/mp4"],
};

pub const THUMBNAIL_POLICY: UploadPolicy = UploadPolicy {
    field: "thumbnail",
    label: "Thumbnail",
    max_bytes: 10 << 20,
    allowed_types: &["image/jpeg", "image/png"],
};

impl UploadPolicy {
    /// Checks a fully read part and returns its media type.
    pub fn validate(&self, part: &FilePart) -> Result<Mime, UploadError> {
        if part.field_name != self.field || part.file_name.is_none() {
            return Err(self.invalid_file());
        }
        self.check_size(part.bytes.len())?;
        self.check_media_type(part.content_type.as_deref())
    }

    pub fn check_size(&self, len: usize) -> Result<(), UploadError> {
        if len > self.max_bytes {
            return Err(UploadError::BadRequest(format!(
                "{} file too large",
                self.label
            )));
        }
        Ok(())
    }

    /// Parameters such as `codecs=` are ignored; only the essence is matched.
    pub fn check_media_type(&self, declared: Option<&str>) -> Result<Mime, UploadError> {
        declared
            .and_then(|value| value.parse::<Mime>().ok())
            .filter(|mime| self.allowed_types.contains(&mime.essence_str()))
            .ok_or_else(|| {
                UploadError::BadRequest(format!(
                    "Invalid {} file type",
                    self.label.to_lowercase()
                ))
            })
    }

    pub fn invalid_file(&self) -> UploadError {
        UploadError::BadRequest(format!("Invalid {} file", self.label.to_lowercase()))
    }

    /// Request body limit for the route accepting this kind of file.
    pub fn body_limit(&self) -> usize {
        self.max_bytes + MULTIPART_OVERHEAD
    }
}
