use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::Actor;
use crate::errors::AppError;
use crate::models::profile::{ApplicantProfileRow, EducationRow, ExperienceRow, ResumeRow};
use crate::profiles::store::{
    self, CreateProfileRequest, EducationInput, EducationPatch, ExperienceInput, ExperiencePatch,
    ProfileView, UpdateProfileRequest,
};
use crate::routes::multipart_file;
use crate::state::AppState;

/// POST /api/v1/profiles/me
pub async fn handle_create_profile(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ApplicantProfileRow>), AppError> {
    let user_id = actor.require_applicant()?;
    let row = store::create_profile(&state.db, user_id, req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/profiles/me
pub async fn handle_get_profile(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<ProfileView>, AppError> {
    let user_id = actor.require_applicant()?;
    let view = store::get_profile_view(&state.db, user_id).await?;
    Ok(Json(view))
}

/// PATCH /api/v1/profiles/me
pub async fn handle_update_profile(
    State(state): State<AppState>,
    actor: Actor,
    Json(patch): Json<UpdateProfileRequest>,
) -> Result<Json<ApplicantProfileRow>, AppError> {
    let user_id = actor.require_applicant()?;
    let row = store::update_profile(&state.db, user_id, patch).await?;
    Ok(Json(row))
}

/// POST /api/v1/profiles/me/education
pub async fn handle_add_education(
    State(state): State<AppState>,
    actor: Actor,
    Json(entry): Json<EducationInput>,
) -> Result<(StatusCode, Json<EducationRow>), AppError> {
    let user_id = actor.require_applicant()?;
    let row = store::add_education(&state.db, user_id, entry).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/profiles/me/education/:id
pub async fn handle_update_education(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(patch): Json<EducationPatch>,
) -> Result<Json<EducationRow>, AppError> {
    let user_id = actor.require_applicant()?;
    let row = store::update_education(&state.db, user_id, id, patch).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/profiles/me/education/:id
pub async fn handle_delete_education(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user_id = actor.require_applicant()?;
    store::delete_education(&state.db, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profiles/me/experience
pub async fn handle_add_experience(
    State(state): State<AppState>,
    actor: Actor,
    Json(entry): Json<ExperienceInput>,
) -> Result<(StatusCode, Json<ExperienceRow>), AppError> {
    let user_id = actor.require_applicant()?;
    let row = store::add_experience(&state.db, user_id, entry).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PATCH /api/v1/profiles/me/experience/:id
pub async fn handle_update_experience(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(patch): Json<ExperiencePatch>,
) -> Result<Json<ExperienceRow>, AppError> {
    let user_id = actor.require_applicant()?;
    let row = store::update_experience(&state.db, user_id, id, patch).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/profiles/me/experience/:id
pub async fn handle_delete_experience(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user_id = actor.require_applicant()?;
    store::delete_experience(&state.db, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/profiles/me/resume (multipart field "file")
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    actor: Actor,
    multipart: axum::extract::Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let user_id = actor.require_applicant()?;
    let (file_name, bytes) = multipart_file(multipart).await?;
    let row =
        store::upload_resume(&state.db, state.store.as_ref(), user_id, &file_name, bytes).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// DELETE /api/v1/profiles/me/resume/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user_id = actor.require_applicant()?;
    store::delete_resume(&state.db, state.store.as_ref(), user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
