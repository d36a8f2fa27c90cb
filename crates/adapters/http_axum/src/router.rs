//! Axum router assembly.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use devhub_app::ports::DeviceRepository;

use crate::state::AppState;

/// Build the top-level axum [`Router`].
///
/// Nests the API routes under `/api/v1` next to the `/health` and `/ping`
/// liveness probes. Includes a [`TraceLayer`] that logs each HTTP
/// request/response using the `tracing` ecosystem.
pub fn build<DR>(state: AppState<DR>) -> Router
where
    DR: DeviceRepository + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/ping", get(ping))
        .nest("/api/v1", crate::api::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use devhub_app::memory::InMemoryDeviceRepository;
    use devhub_app::services::device_service::DeviceService;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_state() -> AppState<InMemoryDeviceRepository> {
        AppState::new(DeviceService::new(InMemoryDeviceRepository::new()))
    }

    #[tokio::test]
    async fn should_return_ok_when_health_check_called() {
        let app = build(test_state());

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
    async fn should_answer_pong_when_pinged() {
        let app = build(test_state());

        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "pong");
    }

    #[tokio::test]
    async fn should_return_not_found_for_unknown_route() {
        let app = build(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v2/devices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
