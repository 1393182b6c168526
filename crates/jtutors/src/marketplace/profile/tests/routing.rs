use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::marketplace::profile::router::profile_router;
use crate::marketplace::profile::service::TutorProfileService;

fn build_router() -> (axum::Router, Arc<MemoryBroadcast>) {
    let repository = Arc::new(MemoryRepository::default());
    let broadcast = Arc::new(MemoryBroadcast::default());
    let service = Arc::new(TutorProfileService::new(repository, broadcast.clone()));
    (profile_router(service), broadcast)
}

async fn read_json_body(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(payload).expect("serialize")))
        .expect("request")
}

async fn register(router: &axum::Router, tutor_id: &str) {
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/tutors",
            &json!({ "tutor_id": tutor_id }),
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn register_returns_an_empty_profile_view() {
    let (router, _) = build_router();
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/tutors",
            &json!({ "tutor_id": "tutor-9" }),
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("profile_completion"), Some(&json!(0)));
    assert_eq!(
        payload
            .get("sections")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(8)
    );
}

#[tokio::test]
async fn personal_info_mutation_returns_the_new_percentage() {
    let (router, broadcast) = build_router();
    register(&router, "tutor-1").await;

    let info = serde_json::to_value(personal_info()).expect("serialize info");
    let response = router
        .clone()
        .oneshot(json_request("PUT", "/api/v1/tutors/tutor-1/personal", &info))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("profile_completion"), Some(&json!(12)));
    assert_eq!(payload.get("section"), Some(&json!("personal_info")));
    assert_eq!(broadcast.events().len(), 1);
}

#[tokio::test]
async fn completion_endpoint_reflects_section_writes() {
    let (router, _) = build_router();
    register(&router, "tutor-1").await;

    let info = serde_json::to_value(personal_info()).expect("serialize info");
    router
        .clone()
        .oneshot(json_request("PUT", "/api/v1/tutors/tutor-1/personal", &info))
        .await
        .expect("router dispatch");
    router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/tutors/tutor-1/subjects",
            &json!({ "subject_id": "algebra" }),
        ))
        .await
        .expect("router dispatch");

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/tutors/tutor-1/completion")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("profile_completion"), Some(&json!(25)));
}

#[tokio::test]
async fn unknown_tutor_maps_to_not_found() {
    let (router, _) = build_router();
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/tutors/ghost/completion")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_required_field_maps_to_unprocessable() {
    let (router, _) = build_router();
    register(&router, "tutor-1").await;

    let mut info = personal_info();
    info.display_name = String::new();
    let payload = serde_json::to_value(info).expect("serialize info");
    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/v1/tutors/tutor-1/personal",
            &payload,
        ))
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert!(body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("display_name"));
}

#[tokio::test]
async fn offline_storage_maps_to_internal_server_error() {
    let service = Arc::new(TutorProfileService::new(
        Arc::new(UnavailableRepository),
        Arc::new(MemoryBroadcast::default()),
    ));
    let router = profile_router(service);

    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/v1/tutors/tutor-1/completion")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert!(body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .contains("unavailable"));
}

#[tokio::test]
async fn duplicate_subject_maps_to_conflict() {
    let (router, _) = build_router();
    register(&router, "tutor-1").await;

    let subject = json!({ "subject_id": "algebra" });
    let first = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/tutors/tutor-1/subjects",
            &subject,
        ))
        .await
        .expect("router dispatch");
    assert_eq!(first.status(), StatusCode::OK);

    let second = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/tutors/tutor-1/subjects",
            &subject,
        ))
        .await
        .expect("router dispatch");
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn experience_entry_round_trips_through_update_and_delete() {
    let (router, _) = build_router();
    register(&router, "tutor-1").await;

    let draft = serde_json::to_value(experience_draft()).expect("serialize draft");
    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/tutors/tutor-1/experience",
            &draft,
        ))
        .await
        .expect("router dispatch");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let entry_id = payload
        .get("entry_id")
        .and_then(Value::as_str)
        .expect("entry id returned")
        .to_string();

    let updated = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/tutors/tutor-1/experience/{entry_id}"),
            &draft,
        ))
        .await
        .expect("router dispatch");
    assert_eq!(updated.status(), StatusCode::OK);

    let deleted = router
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/tutors/tutor-1/experience/{entry_id}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");
    assert_eq!(deleted.status(), StatusCode::OK);
    let payload = read_json_body(deleted).await;
    assert_eq!(payload.get("profile_completion"), Some(&json!(0)));
}
