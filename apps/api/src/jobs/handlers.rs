use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Actor;
use crate::errors::AppError;
use crate::jobs::lifecycle::{self, JobFilters, JobInput, JobPatch, JobsPage};
use crate::models::job::{JobPostingRow, JobStatus};
use crate::pagination::PageParams;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct JobsQuery {
    /// Comma-separated set, e.g. `employment_type=full_time,contract`.
    pub employment_type: Option<String>,
    pub remote: Option<bool>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl JobsQuery {
    fn into_parts(self) -> Result<(JobFilters, PageParams), AppError> {
        let employment_types = match &self.employment_type {
            None => vec![],
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse().map_err(AppError::Validation))
                .collect::<Result<Vec<_>, _>>()?,
        };

        Ok((
            JobFilters {
                employment_types,
                remote: self.remote,
                salary_min: self.salary_min,
                salary_max: self.salary_max,
            },
            PageParams {
                page: self.page,
                limit: self.limit,
            },
        ))
    }
}

/// GET /api/v1/jobs (public)
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(query): Query<JobsQuery>,
) -> Result<Json<JobsPage>, AppError> {
    let (filters, page) = query.into_parts()?;
    let result = lifecycle::list_jobs(&state.db, &filters, &page).await?;
    Ok(Json(result))
}

/// GET /api/v1/jobs/:id (public, open postings only)
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobPostingRow>, AppError> {
    let job = lifecycle::get_open_job(&state.db, id).await?;
    Ok(Json(job))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<JobInput>,
) -> Result<(StatusCode, Json<JobPostingRow>), AppError> {
    let employer_id = actor.require_employer()?;
    let job = lifecycle::create_job(&state.db, employer_id, input).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/employer/jobs
pub async fn handle_list_employer_jobs(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<JobPostingRow>>, AppError> {
    let employer_id = actor.require_employer()?;
    let jobs = lifecycle::list_employer_jobs(&state.db, employer_id).await?;
    Ok(Json(jobs))
}

/// PATCH /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<JobPostingRow>, AppError> {
    let employer_id = actor.require_employer()?;
    let job = lifecycle::update_job(&state.db, id, employer_id, patch).await?;
    Ok(Json(job))
}

/// POST /api/v1/jobs/:id/archive
pub async fn handle_archive_job(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<JobPostingRow>, AppError> {
    let employer_id = actor.require_employer()?;
    let job = lifecycle::set_job_status(&state.db, id, employer_id, JobStatus::Closed).await?;
    Ok(Json(job))
}

/// POST /api/v1/jobs/:id/restore
pub async fn handle_restore_job(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<JobPostingRow>, AppError> {
    let employer_id = actor.require_employer()?;
    let job = lifecycle::set_job_status(&state.db, id, employer_id, JobStatus::Open).await?;
    Ok(Json(job))
}
