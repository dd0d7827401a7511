use axum::Json;
use axum::extract::{Query, State};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::errors::{ApiError, Result};
use crate::github::Release;
use crate::metrics_defs::PINGS_RECORDED;
use crate::store::PingRecord;

#[derive(Debug, Default, Deserialize)]
pub struct UpdateQuery {
    #[serde(rename = "obsGuid")]
    pub obs_guid: Option<String>,
    #[serde(rename = "obsndiVersion")]
    pub obsndi_version: Option<String>,
}

/// The subset of release metadata exposed to pinging clients.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LatestReleaseInfo {
    pub tag_name: String,
    pub name: String,
    pub html_url: String,
    pub created_at: String,
    pub published_at: String,
}

impl From<Release> for LatestReleaseInfo {
    fn from(release: Release) -> Self {
        LatestReleaseInfo {
            tag_name: release.tag_name,
            name: release.name,
            html_url: release.html_url,
            created_at: release.created_at,
            published_at: release.published_at,
        }
    }
}

fn required(value: Option<String>, param: &'static str) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::Validation(param)),
    }
}

/// `GET /update?obsGuid=...&obsndiVersion=...`
///
/// Records the ping (one upsert per valid call, before the upstream fetch,
/// so the record survives an upstream failure) and answers with the latest
/// release metadata.
pub async fn handler(
    State(state): State<AppState>,
    Query(query): Query<UpdateQuery>,
) -> Result<Json<LatestReleaseInfo>> {
    let client_id = required(query.obs_guid, "obsGuid")?;
    let client_version = required(query.obsndi_version, "obsndiVersion")?;

    let record = PingRecord {
        client_id,
        client_version,
        observed_at: Utc::now(),
    };
    tracing::info!(
        client_id = %record.client_id,
        client_version = %record.client_version,
        "recording version ping"
    );
    state.store.upsert(&record).await?;
    metrics::counter!(PINGS_RECORDED.name).increment(1);

    let release = state.releases.latest_release().await?;
    Ok(Json(release.into()))
}
