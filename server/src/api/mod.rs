pub mod downloads;
pub mod health;
pub mod update;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::github::ReleaseSource;
use crate::store::PingStore;

/// Collaborators shared by all handlers, injected at construction so
/// tests can substitute fakes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PingStore>,
    pub releases: Arc<dyn ReleaseSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/update", get(update::handler))
        .route("/downloads", get(downloads::handler))
        .route("/health", get(health::handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // The site is queried from arbitrary origins
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{FakeReleaseSource, asset, release, state_with};
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    fn app(releases: FakeReleaseSource) -> Router {
        let (_store, state) = state_with(releases);
        router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app(FakeReleaseSource::Releases(vec![]));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_without_params_is_forbidden() {
        let app = app(FakeReleaseSource::Releases(vec![]));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/update")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_update_roundtrip_through_router() {
        let app = app(FakeReleaseSource::Releases(vec![release(
            "4.13.2",
            vec![asset("obs-ndi-4.13.2-win.exe", 10)],
        )]));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/update?obsGuid=xyz&obsndiVersion=1.2.3")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["tag_name"], "4.13.2");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let app = app(FakeReleaseSource::Releases(vec![]));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/downloads")
                    .header(header::ORIGIN, "https://obsndiproject.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }
}
