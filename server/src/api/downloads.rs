use axum::Json;
use axum::extract::State;

use crate::api::AppState;
use crate::errors::Result;
use crate::metrics_defs::STATS_AGGREGATIONS;
use crate::stats::{self, DownloadStats};

/// `GET /downloads`
///
/// Fetches the whole release list and aggregates per-platform download
/// counts and percentage shares, across all versions and for the newest
/// release only. Fetch-then-process: an upstream failure never yields
/// partial counts.
pub async fn handler(State(state): State<AppState>) -> Result<Json<DownloadStats>> {
    let releases = state.releases.list_releases().await?;
    let stats = stats::aggregate(&releases);
    metrics::counter!(STATS_AGGREGATIONS.name).increment(1);
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{FakeReleaseSource, asset, release, state_with};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[tokio::test]
    async fn test_counts_and_percentages() {
        let (_store, state) = state_with(FakeReleaseSource::Releases(vec![
            release(
                "4.13.2",
                vec![
                    asset("obs-ndi-4.13.2-win.exe", 10),
                    asset("obs-ndi-4.13.2.dmg-mac", 5),
                    asset("obs-ndi_4.13.2.deb", 5),
                ],
            ),
            release("4.13.1", vec![asset("obs-ndi-4.13.1-win.exe", 1)]),
        ]));

        let Json(stats) = handler(State(state)).await.unwrap();

        assert_eq!(stats.download_counts.latest_version.total, 20);
        assert_eq!(stats.download_counts.all_versions.total, 21);
        assert_eq!(stats.download_counts.all_versions.windows, 11);
        assert_eq!(stats.percentages.latest_version.windows, "50.00%");
        assert_eq!(stats.percentages.latest_version.macos, "25.00%");
        assert_eq!(stats.percentages.latest_version.linux, "25.00%");
    }

    #[tokio::test]
    async fn test_empty_release_list_is_all_zero() {
        let (_store, state) = state_with(FakeReleaseSource::Releases(vec![]));

        let Json(stats) = handler(State(state)).await.unwrap();

        assert_eq!(stats.download_counts.all_versions.total, 0);
        assert_eq!(stats.percentages.all_versions.windows, "0.00%");
    }

    #[tokio::test]
    async fn test_upstream_failure_hides_error_detail() {
        let (_store, state) = state_with(FakeReleaseSource::Unavailable);

        let response = handler(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body, "internal server error");
        assert!(!body.contains("502"));
    }
}
