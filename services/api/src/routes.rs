use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use jtutors::marketplace::hires::{hire_router, HireLedgerService, HireRepository};
use jtutors::marketplace::profile::{
    profile_router, ProfileChangePublisher, ProfileRepository, TutorProfileService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_platform_routes<R, P, H>(
    profiles: Arc<TutorProfileService<R, P>>,
    ledger: Arc<HireLedgerService<H>>,
) -> axum::Router
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
    H: HireRepository + 'static,
{
    profile_router(profiles)
        .merge(hire_router(ledger))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{InMemoryChangeBroadcast, InMemoryHireRepository, InMemoryProfileRepository};
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn platform_router() -> axum::Router {
        let profiles = Arc::new(TutorProfileService::new(
            Arc::new(InMemoryProfileRepository::default()),
            Arc::new(InMemoryChangeBroadcast::default()),
        ));
        let ledger = Arc::new(HireLedgerService::new(Arc::new(
            InMemoryHireRepository::default(),
        )));
        with_platform_routes(profiles, ledger)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let router = platform_router();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn merged_router_serves_profile_and_ledger_surfaces() {
        let router = platform_router();

        let register = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/tutors")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"tutor_id":"tutor-9"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(register.status(), StatusCode::CREATED);

        let completion = router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/tutors/tutor-9/completion")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(completion.status(), StatusCode::OK);
        let body = json_body(completion).await;
        assert_eq!(body["profile_completion"], 0);

        let balance = router
            .oneshot(
                Request::builder()
                    .uri("/api/v1/tutors/tutor-9/balance")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(balance.status(), StatusCode::OK);
        let body = json_body(balance).await;
        assert_eq!(body["available_cents"], 0);
    }
}
