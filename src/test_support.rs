//! Fakes for the pipeline's collaborators.

use crate::common::error::UploadError;
use crate::common::upload::{FilePart, PartSource};
use crate::config::settings::AppConfig;
use crate::infrastructure::process::runner::{ToolOutput, ToolRunner};
use crate::infrastructure::storage::s3::{ObjectStore, StorageError};
use crate::media::policy::UploadPolicy;
use crate::middleware::auth::TokenClaims;
use crate::modules::video::model::{Video, VideoPatch};
use crate::modules::video::repository::VideoStore;
use crate::state::AppState;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bytes::Bytes;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use url::Url;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret";

pub fn test_config(assets_root: &Path) -> AppConfig {
    AppConfig {
        server_port: 8091,
        database_url: "postgres://localhost/unused".to_string(),
        assets_root: assets_root.to_path_buf(),
        public_base_url: Url::parse("http://localhost:8091").unwrap(),
        s3_bucket: "videos".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        s3_access_key: "key".to_string(),
        s3_secret_key: "secret".to_string(),
        s3_cf_distribution: "cdn.example.test".to_string(),
        jwt_secret: JWT_SECRET.to_string(),
        ffmpeg_path: "ffmpeg".to_string(),
        ffprobe_path: "ffprobe".to_string(),
        tool_timeout: None,
    }
}

pub fn app_state(
    assets_root: &Path,
    videos: Arc<dyn VideoStore>,
    storage: Arc<dyn ObjectStore>,
    tools: Arc<dyn ToolRunner>,
) -> AppState {
    AppState::new(test_config(assets_root), videos, storage, tools)
}

pub fn sample_video(owner: Uuid) -> Video {
    let now = OffsetDateTime::now_utc();
    Video {
        id: Uuid::new_v4(),
        user_id: owner,
        title: "Boots and cats".to_string(),
        description: None,
        thumbnail_url: None,
        video_url: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn mint_token(user: Uuid, secret: &str) -> String {
    let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
    let claims = TokenClaims {
        sub: user,
        iat: now,
        exp: now + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[derive(Default)]
pub struct MemoryVideoStore {
    videos: Mutex<HashMap<Uuid, Video>>,
    updates: AtomicUsize,
    fail_updates: AtomicBool,
}

impl MemoryVideoStore {
    pub fn with(video: Video) -> Self {
        let store = Self::default();
        store.videos.lock().unwrap().insert(video.id, video);
        store
    }

    pub fn get(&self, id: Uuid) -> Video {
        self.videos.lock().unwrap()[&id].clone()
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn fail_updates(&self) {
        self.fail_updates.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoStore for MemoryVideoStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>> {
        Ok(self.videos.lock().unwrap().get(&id).cloned())
    }

    async fn apply_update(&self, id: Uuid, patch: VideoPatch) -> Result<Video> {
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(anyhow!("connection reset"));
        }
        let mut videos = self.videos.lock().unwrap();
        let video = videos.get_mut(&id).ok_or_else(|| anyhow!("no video {}", id))?;
        if let Some(url) = patch.video_url {
            video.video_url = Some(url);
        }
        if let Some(url) = patch.thumbnail_url {
            video.thumbnail_url = Some(url);
        }
        video.updated_at = OffsetDateTime::now_utc();
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(video.clone())
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

#[derive(Default)]
pub struct RecordingObjectStore {
    objects: Mutex<Vec<StoredObject>>,
    failure: Mutex<Option<String>>,
}

impl RecordingObjectStore {
    pub fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().unwrap().clone()
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put_file(&self, key: &str, path: &Path, content_type: &str) -> Result<(), StorageError> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(StorageError::Request(message));
        }
        let body = std::fs::read(path).map_err(|e| StorageError::Body {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            content_type: content_type.to_string(),
            body,
        });
        Ok(())
    }
}

type Script = Box<dyn Fn(&str, &[String]) -> io::Result<ToolOutput> + Send + Sync>;

/// Tool runner answering from a closure and recording every call.
pub struct ScriptedTools {
    script: Script,
    calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedTools {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str, &[String]) -> io::Result<ToolOutput> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A working ffmpeg/ffprobe pair for a video of the given size.
    pub fn media(width: u32, height: u32) -> Self {
        let probe = format!(
            r#"{{"programs": [], "streams": [{{"width": {}, "height": {}}}]}}"#,
            width, height
        );
        Self::media_with_probe(probe.as_bytes())
    }

    /// ffmpeg copies its input to its output; ffprobe prints `probe_stdout`.
    pub fn media_with_probe(probe_stdout: &[u8]) -> Self {
        let probe_stdout = probe_stdout.to_vec();
        Self::new(move |program, args| match program {
            "ffmpeg" => {
                std::fs::copy(&args[1], args.last().unwrap())?;
                Ok(ToolOutput {
                    status: Some(0),
                    ..ToolOutput::default()
                })
            }
            "ffprobe" => Ok(ToolOutput {
                status: Some(0),
                stdout: probe_stdout.clone(),
                stderr: Vec::new(),
            }),
            other => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("unexpected tool {}", other),
            )),
        })
    }

    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolRunner for ScriptedTools {
    async fn run(&self, program: &str, args: &[String]) -> io::Result<ToolOutput> {
        self.calls
            .lock()
            .unwrap()
            .push((program.to_string(), args.to_vec()));
        (self.script)(program, args)
    }
}

/// Part source that remembers whether the pipeline asked for the body.
pub struct StaticPart {
    part: FilePart,
    read: Arc<AtomicBool>,
}

impl StaticPart {
    pub fn new(part: FilePart) -> Self {
        Self {
            part,
            read: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn read_flag(&self) -> Arc<AtomicBool> {
        self.read.clone()
    }
}

#[async_trait]
impl PartSource for StaticPart {
    async fn read_part(self, policy: &UploadPolicy) -> Result<FilePart, UploadError> {
        self.read.store(true, Ordering::SeqCst);
        if self.part.field_name != policy.field {
            return Err(policy.invalid_file());
        }
        Ok(self.part)
    }
}

pub fn file_part(field: &str, content_type: &str, bytes: &'static [u8]) -> FilePart {
    FilePart {
        field_name: field.to_string(),
        file_name: Some("upload".to_string()),
        content_type: Some(content_type.to_string()),
        bytes: Bytes::from_static(bytes),
    }
}
