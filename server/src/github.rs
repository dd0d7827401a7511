use async_trait::async_trait;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(thiserror::Error, Debug)]
pub enum ReleaseSourceError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected upstream status: {0}")]
    Status(StatusCode),
}

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_count: u64,
}

/// Release metadata as the upstream API returns it. Timestamps are kept
/// as upstream strings and passed through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Release {
    pub tag_name: String,
    pub name: String,
    pub html_url: String,
    pub created_at: String,
    pub published_at: String,
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Upstream release metadata, injected into handlers so tests can
/// substitute canned data.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// The most recent published release.
    async fn latest_release(&self) -> Result<Release, ReleaseSourceError>;

    /// All releases, newest first (upstream ordering, single page).
    async fn list_releases(&self) -> Result<Vec<Release>, ReleaseSourceError>;
}

/// GitHub REST client scoped to one repository,
/// e.g. `https://api.github.com/repos/obs-ndi/obs-ndi`.
pub struct GithubReleases {
    client: reqwest::Client,
    base_url: Url,
}

impl GithubReleases {
    /// GitHub rejects requests without a User-Agent, so one is mandatory.
    pub fn new(base_url: Url, user_agent: &str) -> Result<Self, ReleaseSourceError> {
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { client, base_url })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ReleaseSourceError> {
        let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(ReleaseSourceError::Status(response.status()));
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ReleaseSource for GithubReleases {
    async fn latest_release(&self) -> Result<Release, ReleaseSourceError> {
        self.get_json("releases/latest").await
    }

    async fn list_releases(&self) -> Result<Vec<Release>, ReleaseSourceError> {
        self.get_json("releases").await
    }
}
