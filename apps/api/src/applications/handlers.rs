use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::applications::workflow::{
    self, ApplyRequest, JobApplicantRow, MyApplicationRow, UpdateStatusRequest,
};
use crate::auth::Actor;
use crate::errors::AppError;
use crate::models::application::JobApplicationRow;
use crate::state::AppState;

/// POST /api/v1/jobs/:id/apply
pub async fn handle_apply(
    State(state): State<AppState>,
    actor: Actor,
    Path(job_id): Path<Uuid>,
    Json(req): Json<ApplyRequest>,
) -> Result<(StatusCode, Json<JobApplicationRow>), AppError> {
    let user_id = actor.require_applicant()?;
    let row = workflow::apply(&state.db, user_id, job_id, req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/jobs/:id/applicants
pub async fn handle_list_applicants(
    State(state): State<AppState>,
    actor: Actor,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Vec<JobApplicantRow>>, AppError> {
    let employer_id = actor.require_employer()?;
    let rows = workflow::list_applicants_for_job(&state.db, job_id, employer_id).await?;
    Ok(Json(rows))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(application_id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<JobApplicationRow>, AppError> {
    let employer_id = actor.require_employer()?;
    let row = workflow::update_status(&state.db, application_id, employer_id, req.status).await?;
    Ok(Json(row))
}

/// GET /api/v1/applications/me
pub async fn handle_list_my_applications(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<MyApplicationRow>>, AppError> {
    let user_id = actor.require_applicant()?;
    let rows = workflow::list_my_applications(&state.db, user_id).await?;
    Ok(Json(rows))
}
