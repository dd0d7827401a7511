pub mod api;
pub mod config;
pub mod errors;
pub mod github;
pub mod metrics_defs;
pub mod stats;
pub mod store;
pub mod testutils;

use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::api::AppState;
use crate::config::{Config, StoreConfig};
use crate::github::{GithubReleases, ReleaseSourceError};
use crate::store::{FilesystemStore, MemoryStore, PingStore};

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("release client error: {0}")]
    ReleaseClient(#[from] ReleaseSourceError),
}

pub async fn run(config: Config) -> Result<(), ServerError> {
    let releases =
        GithubReleases::new(config.upstream.url.clone(), &config.upstream.user_agent)?;

    let store: Arc<dyn PingStore> = match &config.store {
        StoreConfig::Filesystem { base_dir } => Arc::new(FilesystemStore::new(base_dir)),
        StoreConfig::Memory => {
            tracing::warn!("using the in-memory ping store; records are lost on restart");
            Arc::new(MemoryStore::default())
        }
    };

    let state = AppState {
        store,
        releases: Arc::new(releases),
    };
    let app = api::router(state);

    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, upstream = %config.upstream.url, "update server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
