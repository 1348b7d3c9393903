use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{
    ApplicantSnapshot, ApplicationStatus, Position, ProjectId, UserId,
};
use super::repository::{RecruitmentRepository, RepositoryError};
use super::service::{ProjectChanges, ProjectDraft, ProjectService, ProjectServiceError};

/// Router builder exposing the recruitment operations over HTTP. The actor
/// identity arrives in the request body; authentication is the caller's
/// concern and happens upstream of this router.
pub fn recruitment_router<R>(service: Arc<ProjectService<R>>) -> Router
where
    R: RecruitmentRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/projects",
            post(create_project_handler::<R>).get(list_projects_handler::<R>),
        )
        .route(
            "/api/v1/projects/:project_id",
            get(project_detail_handler::<R>)
                .patch(update_project_handler::<R>)
                .delete(delete_project_handler::<R>),
        )
        .route(
            "/api/v1/projects/:project_id/applications",
            post(apply_handler::<R>),
        )
        .route(
            "/api/v1/projects/:project_id/eligibility",
            post(eligibility_handler::<R>),
        )
        .route(
            "/api/v1/projects/:project_id/applications/:user_id",
            axum::routing::patch(decide_handler::<R>).delete(withdraw_handler::<R>),
        )
        .route("/api/v1/dashboard/:user_id", get(dashboard_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateProjectRequest {
    pub(crate) owner_id: UserId,
    #[serde(flatten)]
    pub(crate) draft: ProjectDraft,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateProjectRequest {
    pub(crate) actor: UserId,
    #[serde(flatten)]
    pub(crate) changes: ProjectChanges,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorRequest {
    pub(crate) actor: UserId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApplyRequest {
    pub(crate) applicant: ApplicantSnapshot,
    pub(crate) applied_position: Vec<Position>,
    #[serde(default)]
    pub(crate) cover_letter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EligibilityRequest {
    pub(crate) applicant: ApplicantSnapshot,
    pub(crate) positions: Vec<Position>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    pub(crate) actor: UserId,
    pub(crate) status: ApplicationStatus,
}

pub(crate) async fn create_project_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Json(request): Json<CreateProjectRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.create_project(request.owner_id, request.draft, Utc::now()) {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_projects_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.list_projects() {
        Ok(records) => {
            let summaries: Vec<_> = records.iter().map(|record| record.summary_view()).collect();
            (StatusCode::OK, Json(summaries)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn project_detail_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Path(project_id): Path<String>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.get_project(&ProjectId(project_id)) {
        Ok(record) => (StatusCode::OK, Json(record.detail_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_project_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Path(project_id): Path<String>,
    Json(request): Json<UpdateProjectRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.update_project(
        &request.actor,
        &ProjectId(project_id),
        request.changes,
        Utc::now(),
    ) {
        Ok(project) => (StatusCode::OK, Json(project)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_project_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Path(project_id): Path<String>,
    Json(request): Json<ActorRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.delete_project(&request.actor, &ProjectId(project_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn apply_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Path(project_id): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.apply(
        &request.applicant,
        &ProjectId(project_id),
        request.applied_position,
        request.cover_letter,
        Utc::now(),
    ) {
        Ok(application) => (StatusCode::CREATED, Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn eligibility_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Path(project_id): Path<String>,
    Json(request): Json<EligibilityRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.check_eligibility(
        &request.applicant,
        &ProjectId(project_id),
        &request.positions,
        Utc::now(),
    ) {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decide_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Path((project_id, user_id)): Path<(String, String)>,
    Json(request): Json<DecisionRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    let project_id = ProjectId(project_id);
    let applicant = UserId(user_id);
    let now = Utc::now();

    let result = match request.status {
        ApplicationStatus::Accepted => {
            service.accept(&request.actor, &applicant, &project_id, now)
        }
        ApplicationStatus::Rejected => {
            service.reject(&request.actor, &applicant, &project_id, now)
        }
        ApplicationStatus::Pending => {
            let payload = json!({
                "error": "status must be ACCEPTED or REJECTED",
            });
            return (StatusCode::BAD_REQUEST, Json(payload)).into_response();
        }
    };

    match result {
        Ok(application) => (StatusCode::OK, Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn withdraw_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Path((project_id, user_id)): Path<(String, String)>,
    Json(request): Json<ActorRequest>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.withdraw(&request.actor, &UserId(user_id), &ProjectId(project_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn dashboard_handler<R>(
    State(service): State<Arc<ProjectService<R>>>,
    Path(user_id): Path<String>,
) -> Response
where
    R: RecruitmentRepository + 'static,
{
    match service.dashboard().aggregate(&UserId(user_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(error) => error_response(ProjectServiceError::Repository(error)),
    }
}

fn error_response(error: ProjectServiceError) -> Response {
    let status = match &error {
        ProjectServiceError::ProjectNotFound | ProjectServiceError::ApplicationNotFound => {
            StatusCode::NOT_FOUND
        }
        ProjectServiceError::NotProjectOwner | ProjectServiceError::NotApplicant => {
            StatusCode::FORBIDDEN
        }
        ProjectServiceError::Ineligible(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProjectServiceError::InvalidState { .. } | ProjectServiceError::Validation(_) => {
            StatusCode::BAD_REQUEST
        }
        ProjectServiceError::CapacityExhausted(_) => StatusCode::CONFLICT,
        ProjectServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ProjectServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ProjectServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = match &error {
        ProjectServiceError::Ineligible(report) => json!({
            "error": error.to_string(),
            "reasons": report.messages(),
        }),
        _ => json!({ "error": error.to_string() }),
    };

    (status, Json(payload)).into_response()
}
