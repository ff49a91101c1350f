use crate::config::env::{self, EnvKey};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const DEFAULT_PORT: u16 = 8091;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for environment variable {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub assets_root: PathBuf,
    pub public_base_url: Url,
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub s3_cf_distribution: String,
    pub jwt_secret: String,
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    /// Upper bound for a single ffmpeg/ffprobe run. `None` waits indefinitely.
    pub tool_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let server_port = parsed(EnvKey::ServerPort)?.unwrap_or(DEFAULT_PORT);

        let public_base_url = env::get_or(
            EnvKey::PublicBaseUrl,
            &format!("http://localhost:{}", server_port),
        );
        let public_base_url = Url::parse(&public_base_url).map_err(|_| ConfigError::Invalid {
            key: EnvKey::PublicBaseUrl.as_str(),
            value: public_base_url.clone(),
        })?;

        Ok(Self {
            server_port,
            database_url: required(EnvKey::DatabaseUrl)?,
            assets_root: PathBuf::from(env::get_or(EnvKey::AssetsRoot, "./assets")),
            public_base_url,
            s3_bucket: required(EnvKey::S3Bucket)?,
            s3_region: env::get_or(EnvKey::S3Region, "us-east-1"),
            s3_endpoint: env::get_opt(EnvKey::S3Endpoint),
            s3_access_key: required(EnvKey::S3AccessKey)?,
            s3_secret_key: required(EnvKey::S3SecretKey)?,
            s3_cf_distribution: required(EnvKey::S3CfDistribution)?,
            jwt_secret: required(EnvKey::JwtSecret)?,
            ffmpeg_path: env::get_or(EnvKey::FfmpegPath, "ffmpeg"),
            ffprobe_path: env::get_or(EnvKey::FfprobePath, "ffprobe"),
            tool_timeout: parsed::<u64>(EnvKey::ToolTimeoutSecs)?.map(Duration::from_secs),
        })
    }
}

fn required(key: EnvKey) -> Result<String, ConfigError> {
    env::get_opt(key).ok_or(ConfigError::Missing(key.as_str()))
}

fn parsed<T: std::str::FromStr>(key: EnvKey) -> Result<Option<T>, ConfigError> {
    env::get_parsed(key).map_err(|value| ConfigError::Invalid {
        key: key.as_str(),
        value,
    })
}
