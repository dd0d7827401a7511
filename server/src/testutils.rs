//! Canned releases and fake collaborators shared by the crate's tests.

use async_trait::async_trait;
use std::sync::Arc;

use crate::api::AppState;
use crate::github::{Release, ReleaseAsset, ReleaseSource, ReleaseSourceError};
use crate::store::MemoryStore;

pub fn asset(name: &str, download_count: u64) -> ReleaseAsset {
    ReleaseAsset {
        name: name.to_string(),
        download_count,
    }
}

pub fn release(tag: &str, assets: Vec<ReleaseAsset>) -> Release {
    Release {
        tag_name: tag.to_string(),
        name: format!("OBS-NDI {tag}"),
        html_url: format!("https://github.com/obs-ndi/obs-ndi/releases/tag/{tag}"),
        created_at: "2024-04-28T17:18:27Z".to_string(),
        published_at: "2024-05-02T20:36:30Z".to_string(),
        assets,
    }
}

/// Release source backed by a canned newest-first list, or failing every
/// call with an upstream status error.
pub enum FakeReleaseSource {
    Releases(Vec<Release>),
    Unavailable,
}

#[async_trait]
impl ReleaseSource for FakeReleaseSource {
    async fn latest_release(&self) -> Result<Release, ReleaseSourceError> {
        match self {
            FakeReleaseSource::Releases(releases) => releases
                .first()
                .cloned()
                .ok_or(ReleaseSourceError::Status(http::StatusCode::NOT_FOUND)),
            FakeReleaseSource::Unavailable => {
                Err(ReleaseSourceError::Status(http::StatusCode::BAD_GATEWAY))
            }
        }
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ReleaseSourceError> {
        match self {
            FakeReleaseSource::Releases(releases) => Ok(releases.clone()),
            FakeReleaseSource::Unavailable => {
                Err(ReleaseSourceError::Status(http::StatusCode::BAD_GATEWAY))
            }
        }
    }
}

/// Application state wired to a fresh in-memory store and the given fake
/// source. The store is also returned directly so tests can inspect it.
pub fn state_with(releases: FakeReleaseSource) -> (Arc<MemoryStore>, AppState) {
    let store = Arc::new(MemoryStore::default());
    let state = AppState {
        store: store.clone(),
        releases: Arc::new(releases),
    };
    (store, state)
}
