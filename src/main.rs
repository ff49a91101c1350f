use crate::config::settings::AppConfig;
use crate::infrastructure::db::pool::{connect_to_db, run_migrations};
use crate::infrastructure::process::runner::ProcessRunner;
use crate::infrastructure::storage::s3::StorageService;
use crate::modules::video::repository::PgVideoRepository;
use crate::state::AppState;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod media;
mod middleware;
mod modules;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new()?;
    tokio::fs::create_dir_all(&config.assets_root).await?;

    let db = connect_to_db(&config.database_url).await?;
    run_migrations(&db).await?;

    let state = AppState::new(
        config.clone(),
        Arc::new(PgVideoRepository::new(db)),
        Arc::new(StorageService::new(&config)),
        Arc::new(ProcessRunner::new(config.tool_timeout)),
    );

    let app = app::create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
