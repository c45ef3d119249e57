use bytes::Bytes;
use serde::Deserialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::companies::credibility::credibility_score;
use crate::errors::AppError;
use crate::models::company::CompanyProfileRow;
use crate::storage::{content_type_for, object_key, ObjectStore};

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub company_name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompanyRequest {
    pub company_name: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
}

/// Creates the employer's company profile. The 1:1 profile-per-account
/// invariant is the UNIQUE constraint on `user_id`; a duplicate insert
/// surfaces as `Conflict`.
pub async fn create_company(
    pool: &PgPool,
    user_id: Uuid,
    req: CreateCompanyRequest,
) -> Result<CompanyProfileRow, AppError> {
    if req.company_name.trim().is_empty() {
        return Err(AppError::Validation("company_name must not be empty".into()));
    }

    let score = credibility_score(
        &req.company_name,
        req.description.as_deref(),
        req.industry.as_deref(),
        req.location.as_deref(),
        false,
    );

    let row = sqlx::query_as::<_, CompanyProfileRow>(
        r#"
        INSERT INTO company_profiles
            (id, user_id, company_name, description, industry, location, credibility_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&req.company_name)
    .bind(&req.description)
    .bind(&req.industry)
    .bind(&req.location)
    .bind(score)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "company profile already exists"))?;

    info!("Created company profile {} for user {user_id}", row.id);
    Ok(row)
}

pub async fn get_company_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<CompanyProfileRow>, AppError> {
    Ok(
        sqlx::query_as::<_, CompanyProfileRow>(
            "SELECT * FROM company_profiles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?,
    )
}

/// Resolves the employer's company profile or fails with `NotFound`.
pub async fn require_company(pool: &PgPool, user_id: Uuid) -> Result<CompanyProfileRow, AppError> {
    get_company_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("company profile required".into()))
}

/// Applies a partial update and recomputes the credibility score from the
/// resulting state. Absent patch fields leave the stored value unchanged.
pub async fn update_company(
    pool: &PgPool,
    user_id: Uuid,
    patch: UpdateCompanyRequest,
) -> Result<CompanyProfileRow, AppError> {
    let current = require_company(pool, user_id).await?;

    let company_name = patch.company_name.unwrap_or(current.company_name);
    if company_name.trim().is_empty() {
        return Err(AppError::Validation("company_name must not be empty".into()));
    }
    let description = patch.description.or(current.description);
    let industry = patch.industry.or(current.industry);
    let location = patch.location.or(current.location);

    let score = credibility_score(
        &company_name,
        description.as_deref(),
        industry.as_deref(),
        location.as_deref(),
        current.logo_key.is_some(),
    );

    let row = sqlx::query_as::<_, CompanyProfileRow>(
        r#"
        UPDATE company_profiles
        SET company_name = $2, description = $3, industry = $4, location = $5,
            credibility_score = $6, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(current.id)
    .bind(&company_name)
    .bind(&description)
    .bind(&industry)
    .bind(&location)
    .bind(score)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Replaces the company logo. The previous object is deleted best-effort:
/// a failed delete leaves an orphaned blob, never a broken profile. The new
/// upload must succeed before anything is persisted.
pub async fn upload_logo(
    pool: &PgPool,
    store: &dyn ObjectStore,
    user_id: Uuid,
    file_name: &str,
    bytes: Bytes,
) -> Result<CompanyProfileRow, AppError> {
    let current = require_company(pool, user_id).await?;

    if let Some(old_key) = &current.logo_key {
        if let Err(e) = store.delete(old_key).await {
            warn!("Failed to delete previous logo '{old_key}': {e}");
        }
    }

    let key = object_key("logos", current.id, file_name);
    let stored = store.put(&key, bytes, content_type_for(file_name)).await?;

    let score = credibility_score(
        &current.company_name,
        current.description.as_deref(),
        current.industry.as_deref(),
        current.location.as_deref(),
        true,
    );

    let row = sqlx::query_as::<_, CompanyProfileRow>(
        r#"
        UPDATE company_profiles
        SET logo_url = $2, logo_key = $3, credibility_score = $4, updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(current.id)
    .bind(&stored.url)
    .bind(&stored.key)
    .bind(score)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Deletes the company profile. Job postings referencing the company are
/// left in place; they carry their own denormalized employer/company ids.
pub async fn delete_company(
    pool: &PgPool,
    store: &dyn ObjectStore,
    user_id: Uuid,
) -> Result<(), AppError> {
    let current = require_company(pool, user_id).await?;

    if let Some(logo_key) = &current.logo_key {
        if let Err(e) = store.delete(logo_key).await {
            warn!("Failed to delete logo '{logo_key}' for company {}: {e}", current.id);
        }
    }

    sqlx::query("DELETE FROM company_profiles WHERE id = $1")
        .bind(current.id)
        .execute(pool)
        .await?;

    info!("Deleted company profile {} for user {user_id}", current.id);
    Ok(())
}

/// Recomputes the denormalized counters from source-of-truth tables. This is
/// the repair path for any drift the transactional maintenance cannot cover
/// (e.g. rows written before the counters existed).
pub async fn recount_metrics(pool: &PgPool, user_id: Uuid) -> Result<CompanyProfileRow, AppError> {
    let current = require_company(pool, user_id).await?;

    let row = sqlx::query_as::<_, CompanyProfileRow>(
        r#"
        UPDATE company_profiles
        SET job_posts_count = (SELECT count(*) FROM job_postings WHERE company_id = $1),
            active_jobs_count = (SELECT count(*) FROM job_postings
                                 WHERE company_id = $1 AND status = 'open'),
            total_applicants = (SELECT count(*) FROM job_applications WHERE company_id = $1),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(current.id)
    .fetch_one(pool)
    .await?;

    info!(
        "Recounted metrics for company {}: {} posts, {} active, {} applicants",
        row.id, row.job_posts_count, row.active_jobs_count, row.total_applicants
    );
    Ok(row)
}
