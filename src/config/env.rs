use std::env;
use std::str::FromStr;

#[derive(Clone, Copy, Debug)]
pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    AssetsRoot,
    PublicBaseUrl,
    S3Bucket,
    S3Region,
    S3Endpoint,
    S3AccessKey,
    S3SecretKey,
    S3CfDistribution,
    JwtSecret,
    FfmpegPath,
    FfprobePath,
    ToolTimeoutSecs,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::AssetsRoot => "ASSETS_ROOT",
            EnvKey::PublicBaseUrl => "PUBLIC_BASE_URL",
            EnvKey::S3Bucket => "S3_BUCKET",
            EnvKey::S3Region => "S3_REGION",
            EnvKey::S3Endpoint => "S3_ENDPOINT",
            EnvKey::S3AccessKey => "AWS_ACCESS_KEY_ID",
            EnvKey::S3SecretKey => "AWS_SECRET_ACCESS_KEY",
            EnvKey::S3CfDistribution => "S3_CF_DISTRIBUTION",
            EnvKey::JwtSecret => "JWT_SECRET",
            EnvKey::FfmpegPath => "FFMPEG_PATH",
            EnvKey::FfprobePath => "FFPROBE_PATH",
            EnvKey::ToolTimeoutSecs => "MEDIA_TOOL_TIMEOUT_SECS",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    get(key).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    get_opt(key).unwrap_or_else(|| default.to_string())
}

/// Parses the variable if it is set. An unset variable yields `Ok(None)`;
/// a value that does not parse is returned as the error.
pub fn get_parsed<T: FromStr>(key: EnvKey) -> Result<Option<T>, String> {
    match get_opt(key) {
        Some(val) => val.parse::<T>().map(Some).map_err(|_| val),
        None => Ok(None),
    }
}
