use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    AvailabilityDraft, BackgroundCheckDecision, BackgroundCheckSubmission, EducationDraft, EntryId,
    ExperienceDraft, PayoutMethod, PersonalInfo, ProfilePhoto, SubjectId, TutorId,
};
use super::repository::{ProfileChangePublisher, ProfileRepository, RepositoryError};
use super::service::{MutationOutcome, ProfileServiceError, TutorProfileService};

/// Router builder exposing the profile sections and completion endpoints.
pub fn profile_router<R, P>(service: Arc<TutorProfileService<R, P>>) -> Router
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    Router::new()
        .route("/api/v1/tutors", post(register_handler::<R, P>))
        .route("/api/v1/tutors/:tutor_id", get(profile_handler::<R, P>))
        .route(
            "/api/v1/tutors/:tutor_id/completion",
            get(completion_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/personal",
            put(personal_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/experience",
            post(add_experience_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/experience/:entry_id",
            put(update_experience_handler::<R, P>).delete(delete_experience_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/education",
            post(add_education_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/education/:entry_id",
            put(update_education_handler::<R, P>).delete(delete_education_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/subjects",
            post(add_subject_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/subjects/:subject_id",
            axum::routing::delete(remove_subject_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/availability",
            post(add_availability_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/availability/:entry_id",
            axum::routing::delete(delete_availability_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/payout",
            put(payout_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/background-check",
            post(submit_background_check_handler::<R, P>),
        )
        .route(
            "/api/v1/tutors/:tutor_id/background-check/decision",
            post(review_background_check_handler::<R, P>),
        )
        .route("/api/v1/tutors/:tutor_id/photo", put(photo_handler::<R, P>))
        .with_state(service)
}

fn error_response(error: ProfileServiceError) -> Response {
    let status = match &error {
        ProfileServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProfileServiceError::Repository(RepositoryError::Conflict)
        | ProfileServiceError::SubjectAlreadySelected
        | ProfileServiceError::BackgroundCheckAlreadySubmitted
        | ProfileServiceError::BackgroundCheckAlreadyDecided => StatusCode::CONFLICT,
        ProfileServiceError::Repository(RepositoryError::NotFound)
        | ProfileServiceError::SubjectNotSelected => StatusCode::NOT_FOUND,
        ProfileServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

fn mutation_response(result: Result<MutationOutcome, ProfileServiceError>) -> Response {
    match result {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => error_response(error),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) tutor_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubjectRequest {
    pub(crate) subject_id: String,
}

pub(crate) async fn register_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    match service.register(TutorId(request.tutor_id)) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn profile_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    match service.profile(&TutorId(tutor_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn completion_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    match service.completion(&TutorId(tutor_id)) {
        Ok(snapshot) => (StatusCode::OK, axum::Json(snapshot)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn personal_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(info): axum::Json<PersonalInfo>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.upsert_personal(&TutorId(tutor_id), info))
}

pub(crate) async fn add_experience_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(draft): axum::Json<ExperienceDraft>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.add_experience(&TutorId(tutor_id), draft))
}

pub(crate) async fn update_experience_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path((tutor_id, entry_id)): Path<(String, String)>,
    axum::Json(draft): axum::Json<ExperienceDraft>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.update_experience(&TutorId(tutor_id), &EntryId(entry_id), draft))
}

pub(crate) async fn delete_experience_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path((tutor_id, entry_id)): Path<(String, String)>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.delete_experience(&TutorId(tutor_id), &EntryId(entry_id)))
}

pub(crate) async fn add_education_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(draft): axum::Json<EducationDraft>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.add_education(&TutorId(tutor_id), draft))
}

pub(crate) async fn update_education_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path((tutor_id, entry_id)): Path<(String, String)>,
    axum::Json(draft): axum::Json<EducationDraft>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.update_education(&TutorId(tutor_id), &EntryId(entry_id), draft))
}

pub(crate) async fn delete_education_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path((tutor_id, entry_id)): Path<(String, String)>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.delete_education(&TutorId(tutor_id), &EntryId(entry_id)))
}

pub(crate) async fn add_subject_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(request): axum::Json<SubjectRequest>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.add_subject(&TutorId(tutor_id), SubjectId(request.subject_id)))
}

pub(crate) async fn remove_subject_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path((tutor_id, subject_id)): Path<(String, String)>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.remove_subject(&TutorId(tutor_id), &SubjectId(subject_id)))
}

pub(crate) async fn add_availability_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(draft): axum::Json<AvailabilityDraft>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.add_availability(&TutorId(tutor_id), draft))
}

pub(crate) async fn delete_availability_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path((tutor_id, entry_id)): Path<(String, String)>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.delete_availability(&TutorId(tutor_id), &EntryId(entry_id)))
}

pub(crate) async fn payout_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(method): axum::Json<PayoutMethod>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.set_payout(&TutorId(tutor_id), method))
}

pub(crate) async fn submit_background_check_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(submission): axum::Json<BackgroundCheckSubmission>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.submit_background_check(&TutorId(tutor_id), submission))
}

pub(crate) async fn review_background_check_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(decision): axum::Json<BackgroundCheckDecision>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.review_background_check(&TutorId(tutor_id), decision))
}

pub(crate) async fn photo_handler<R, P>(
    State(service): State<Arc<TutorProfileService<R, P>>>,
    Path(tutor_id): Path<String>,
    axum::Json(photo): axum::Json<ProfilePhoto>,
) -> Response
where
    R: ProfileRepository + 'static,
    P: ProfileChangePublisher + 'static,
{
    mutation_response(service.set_photo(&TutorId(tutor_id), photo))
}
