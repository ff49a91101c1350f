use crate::common::error::UploadError;
use crate::media::policy::UploadPolicy;
use async_trait::async_trait;
use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};
use futures_util::StreamExt;
use tracing::{debug, warn};

/// A file received from the client, fully buffered.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub field_name: String,
    /// `None` for plain form fields.
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Where the uploaded file comes from. Nothing is read from the request
/// body until `read_part` is called.
#[async_trait]
pub trait PartSource: Send {
    async fn read_part(self, policy: &UploadPolicy) -> Result<FilePart, UploadError>;
}

#[async_trait]
impl PartSource for Multipart {
    /// Streams the field named by `policy`, rejecting a disallowed media
    /// type before its body is read and an oversized body as soon as the
    /// ceiling is crossed.
    async fn read_part(mut self, policy: &UploadPolicy) -> Result<FilePart, UploadError> {
        while let Some(mut field) = self.next_field().await.map_err(multipart_error)? {
            if field.name() != Some(policy.field) {
                continue;
            }

            let file_name = match field.file_name() {
                Some(name) => name.to_string(),
                None => return Err(policy.invalid_file()),
            };
            let content_type = field.content_type().map(str::to_string);
            policy.check_media_type(content_type.as_deref())?;

            let mut buffer = BytesMut::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(multipart_error)?;
                if let Err(e) = policy.check_size(buffer.len() + chunk.len()) {
                    warn!(
                        max_bytes = policy.max_bytes,
                        received = buffer.len() + chunk.len(),
                        "{} file too large",
                        policy.label
                    );
                    return Err(e);
                }
                buffer.extend_from_slice(&chunk);
            }

            debug!(field = policy.field, size = buffer.len(), "received file part");

            return Ok(FilePart {
                field_name: policy.field.to_string(),
                file_name: Some(file_name),
                content_type,
                bytes: buffer.freeze(),
            });
        }

        Err(policy.invalid_file())
    }
}

fn multipart_error(err: MultipartError) -> UploadError {
    UploadError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::policy::{THUMBNAIL_POLICY, VIDEO_POLICY};
    use axum::body::Body;
    use axum::extract::FromRequest;
    use axum::http::{header, Request};

    const BOUNDARY: &str = "X-BOUNDARY";

    async fn multipart(parts: &[(&str, Option<&str>, Option<&str>, &str)]) -> Multipart {
        let mut body = String::new();
        for (name, file_name, content_type, data) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match file_name {
                Some(file) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    name, file
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n",
                    name
                )),
            }
            if let Some(ct) = content_type {
                body.push_str(&format!("Content-Type: {}\r\n", ct));
            }
            body.push_str(&format!("\r\n{}\r\n", data));
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        let request = Request::builder()
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    fn message(err: UploadError) -> String {
        match err {
            UploadError::BadRequest(msg) => msg,
            other => panic!("expected a client error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn reads_the_named_file_field() {
        let form = multipart(&[
            ("title", None, None, "ignored"),
            ("video", Some("boat.mp4"), Some("video/mp4"), "not really mp4"),
        ])
        .await;

        let part = form.read_part(&VIDEO_POLICY).await.unwrap();
        assert_eq!(part.field_name, "video");
        assert_eq!(part.file_name.as_deref(), Some("boat.mp4"));
        assert_eq!(part.content_type.as_deref(), Some("video/mp4"));
        assert_eq!(&part.bytes[..], b"not really mp4");
        assert!(VIDEO_POLICY.validate(&part).is_ok());
    }

    #[tokio::test]
    async fn missing_field_is_invalid_file() {
        let form = multipart(&[("other", Some("a.png"), Some("image/png"), "png")]).await;
        let err = form.read_part(&THUMBNAIL_POLICY).await.unwrap_err();
        assert_eq!(message(err), "Invalid thumbnail file");
    }

    #[tokio::test]
    async fn plain_field_is_invalid_file() {
        let form = multipart(&[("video", None, None, "just text")]).await;
        let err = form.read_part(&VIDEO_POLICY).await.unwrap_err();
        assert_eq!(message(err), "Invalid video file");
    }

    #[tokio::test]
    async fn disallowed_type_is_rejected() {
        let form = multipart(&[("thumbnail", Some("a.gif"), Some("image/gif"), "GIF89a")]).await;
        let err = form.read_part(&THUMBNAIL_POLICY).await.unwrap_err();
        assert_eq!(message(err), "Invalid thumbnail file type");
    }

    #[tokio::test]
    async fn oversized_part_is_rejected() {
        let policy = UploadPolicy {
            max_bytes: 4,
            ..VIDEO_POLICY
        };
        let form = multipart(&[("video", Some("a.mp4"), Some("video/mp4"), "12345")]).await;
        let err = form.read_part(&policy).await.unwrap_err();
        assert_eq!(message(err), "Video file too large");
    }
}
