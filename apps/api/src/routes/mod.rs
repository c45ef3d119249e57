pub mod health;

use axum::{
    extract::Multipart,
    routing::{delete, get, patch, post},
    Router,
};
use bytes::Bytes;

use crate::applications::handlers as applications;
use crate::companies::handlers as companies;
use crate::errors::AppError;
use crate::jobs::handlers as jobs;
use crate::profiles::handlers as profiles;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Applicant profile
        .route(
            "/api/v1/profiles/me",
            post(profiles::handle_create_profile)
                .get(profiles::handle_get_profile)
                .patch(profiles::handle_update_profile),
        )
        .route(
            "/api/v1/profiles/me/education",
            post(profiles::handle_add_education),
        )
        .route(
            "/api/v1/profiles/me/education/:id",
            patch(profiles::handle_update_education).delete(profiles::handle_delete_education),
        )
        .route(
            "/api/v1/profiles/me/experience",
            post(profiles::handle_add_experience),
        )
        .route(
            "/api/v1/profiles/me/experience/:id",
            patch(profiles::handle_update_experience).delete(profiles::handle_delete_experience),
        )
        .route(
            "/api/v1/profiles/me/resume",
            post(profiles::handle_upload_resume),
        )
        .route(
            "/api/v1/profiles/me/resume/:id",
            delete(profiles::handle_delete_resume),
        )
        // Company profile
        .route(
            "/api/v1/companies/me",
            post(companies::handle_create_company)
                .get(companies::handle_get_company)
                .patch(companies::handle_update_company)
                .delete(companies::handle_delete_company),
        )
        .route("/api/v1/companies/me/logo", post(companies::handle_upload_logo))
        .route(
            "/api/v1/companies/me/metrics/recount",
            post(companies::handle_recount_metrics),
        )
        // Job postings
        .route(
            "/api/v1/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job).patch(jobs::handle_update_job))
        .route("/api/v1/jobs/:id/archive", post(jobs::handle_archive_job))
        .route("/api/v1/jobs/:id/restore", post(jobs::handle_restore_job))
        .route("/api/v1/employer/jobs", get(jobs::handle_list_employer_jobs))
        // Applications
        .route("/api/v1/jobs/:id/apply", post(applications::handle_apply))
        .route(
            "/api/v1/jobs/:id/applicants",
            get(applications::handle_list_applicants),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(applications::handle_update_status),
        )
        .route(
            "/api/v1/applications/me",
            get(applications::handle_list_my_applications),
        )
        .with_state(state)
}

/// Pulls the single `file` field out of a multipart upload, returning the
/// original filename and the raw bytes.
pub async fn multipart_file(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let file_name = field
                .file_name()
                .map(str::to_string)
                .ok_or_else(|| AppError::Validation("multipart 'file' field needs a filename".into()))?;
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
            if bytes.is_empty() {
                return Err(AppError::Validation("uploaded file is empty".into()));
            }
            return Ok((file_name, bytes));
        }
    }
    Err(AppError::Validation("multipart field 'file' is required".into()))
}
