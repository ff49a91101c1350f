use crate::config::settings::AppConfig;
use crate::infrastructure::process::runner::ToolRunner;
use crate::infrastructure::storage::s3::ObjectStore;
use crate::modules::video::repository::VideoStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub videos: Arc<dyn VideoStore>,
    pub storage: Arc<dyn ObjectStore>,
    pub tools: Arc<dyn ToolRunner>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn ObjectStore>,
        tools: Arc<dyn ToolRunner>,
    ) -> Self {
        Self {
            config,
            videos,
            storage,
            tools,
        }
    }
}
