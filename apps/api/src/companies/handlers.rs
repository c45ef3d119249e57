use axum::{extract::State, http::StatusCode, Json};

use crate::auth::Actor;
use crate::companies::store::{self, CreateCompanyRequest, UpdateCompanyRequest};
use crate::errors::AppError;
use crate::models::company::CompanyProfileRow;
use crate::routes::multipart_file;
use crate::state::AppState;

/// POST /api/v1/companies/me
pub async fn handle_create_company(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyProfileRow>), AppError> {
    let user_id = actor.require_employer()?;
    let row = store::create_company(&state.db, user_id, req).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/companies/me
pub async fn handle_get_company(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<CompanyProfileRow>, AppError> {
    let user_id = actor.require_employer()?;
    let row = store::require_company(&state.db, user_id).await?;
    Ok(Json(row))
}

/// PATCH /api/v1/companies/me
pub async fn handle_update_company(
    State(state): State<AppState>,
    actor: Actor,
    Json(patch): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyProfileRow>, AppError> {
    let user_id = actor.require_employer()?;
    let row = store::update_company(&state.db, user_id, patch).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/companies/me
pub async fn handle_delete_company(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<StatusCode, AppError> {
    let user_id = actor.require_employer()?;
    store::delete_company(&state.db, state.store.as_ref(), user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/companies/me/logo (multipart field "file")
pub async fn handle_upload_logo(
    State(state): State<AppState>,
    actor: Actor,
    multipart: axum::extract::Multipart,
) -> Result<Json<CompanyProfileRow>, AppError> {
    let user_id = actor.require_employer()?;
    let (file_name, bytes) = multipart_file(multipart).await?;
    let row = store::upload_logo(&state.db, state.store.as_ref(), user_id, &file_name, bytes).await?;
    Ok(Json(row))
}

/// POST /api/v1/companies/me/metrics/recount
pub async fn handle_recount_metrics(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<CompanyProfileRow>, AppError> {
    let user_id = actor.require_employer()?;
    let row = store::recount_metrics(&state.db, user_id).await?;
    Ok(Json(row))
}
