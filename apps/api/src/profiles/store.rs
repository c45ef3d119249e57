use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{ApplicantProfileRow, EducationRow, ExperienceRow, ResumeRow};
use crate::storage::{content_type_for, object_key, ObjectStore};

#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct EducationInput {
    pub school: String,
    pub degree: String,
    pub field: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct EducationPatch {
    pub school: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub current: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceInput {
    pub company: String,
    pub position_title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub current: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExperiencePatch {
    pub company: Option<String>,
    pub position_title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub current: Option<bool>,
}

/// The full applicant aggregate as read by its owner.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: ApplicantProfileRow,
    pub education: Vec<EducationRow>,
    pub experience: Vec<ExperienceRow>,
    pub resume: Option<ResumeRow>,
}

/// Creates the applicant's profile. Duplicate creation surfaces the UNIQUE
/// violation on `user_id` as `Conflict`.
pub async fn create_profile(
    pool: &PgPool,
    user_id: Uuid,
    req: CreateProfileRequest,
) -> Result<ApplicantProfileRow, AppError> {
    if req.first_name.trim().is_empty() || req.last_name.trim().is_empty() {
        return Err(AppError::Validation("first_name and last_name are required".into()));
    }

    let row = sqlx::query_as::<_, ApplicantProfileRow>(
        r#"
        INSERT INTO applicant_profiles (id, user_id, first_name, last_name, skills)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.skills)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "applicant profile already exists"))?;

    info!("Created applicant profile {} for user {user_id}", row.id);
    Ok(row)
}

pub async fn get_profile_by_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<ApplicantProfileRow>, AppError> {
    Ok(sqlx::query_as::<_, ApplicantProfileRow>(
        "SELECT * FROM applicant_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?)
}

/// Resolves the applicant's profile or fails with `NotFound`. Every nested
/// mutation goes through this resolution, which is what scopes entry lookups
/// to the caller's own aggregate.
pub async fn require_profile(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<ApplicantProfileRow, AppError> {
    get_profile_by_user(pool, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("applicant profile required".into()))
}

pub async fn get_profile_view(pool: &PgPool, user_id: Uuid) -> Result<ProfileView, AppError> {
    let profile = require_profile(pool, user_id).await?;

    let education = sqlx::query_as::<_, EducationRow>(
        "SELECT * FROM education_entries WHERE profile_id = $1 ORDER BY position ASC",
    )
    .bind(profile.id)
    .fetch_all(pool)
    .await?;

    let experience = sqlx::query_as::<_, ExperienceRow>(
        "SELECT * FROM experience_entries WHERE profile_id = $1 ORDER BY position ASC",
    )
    .bind(profile.id)
    .fetch_all(pool)
    .await?;

    let resume = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM applicant_resumes WHERE profile_id = $1",
    )
    .bind(profile.id)
    .fetch_optional(pool)
    .await?;

    Ok(ProfileView {
        profile,
        education,
        experience,
        resume,
    })
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: Uuid,
    patch: UpdateProfileRequest,
) -> Result<ApplicantProfileRow, AppError> {
    let current = require_profile(pool, user_id).await?;

    let row = sqlx::query_as::<_, ApplicantProfileRow>(
        r#"
        UPDATE applicant_profiles
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            skills = COALESCE($4, skills),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(current.id)
    .bind(&patch.first_name)
    .bind(&patch.last_name)
    .bind(&patch.skills)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

// ── Education ───────────────────────────────────────────────────────────────

pub async fn add_education(
    pool: &PgPool,
    user_id: Uuid,
    entry: EducationInput,
) -> Result<EducationRow, AppError> {
    let profile = require_profile(pool, user_id).await?;

    let row = sqlx::query_as::<_, EducationRow>(
        r#"
        INSERT INTO education_entries
            (id, profile_id, school, degree, field, start_date, end_date, current, position)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM education_entries WHERE profile_id = $2))
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(profile.id)
    .bind(&entry.school)
    .bind(&entry.degree)
    .bind(&entry.field)
    .bind(entry.start_date)
    .bind(entry.end_date)
    .bind(entry.current)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_education(
    pool: &PgPool,
    user_id: Uuid,
    entry_id: Uuid,
    patch: EducationPatch,
) -> Result<EducationRow, AppError> {
    let profile = require_profile(pool, user_id).await?;

    // Scoped to (id, profile_id): an identifier from another profile is
    // indistinguishable from a missing one.
    sqlx::query_as::<_, EducationRow>(
        r#"
        UPDATE education_entries
        SET school = COALESCE($3, school),
            degree = COALESCE($4, degree),
            field = COALESCE($5, field),
            start_date = COALESCE($6, start_date),
            end_date = COALESCE($7, end_date),
            current = COALESCE($8, current)
        WHERE id = $1 AND profile_id = $2
        RETURNING *
        "#,
    )
    .bind(entry_id)
    .bind(profile.id)
    .bind(&patch.school)
    .bind(&patch.degree)
    .bind(&patch.field)
    .bind(patch.start_date)
    .bind(patch.end_date)
    .bind(patch.current)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("education entry {entry_id} not found")))
}

pub async fn delete_education(
    pool: &PgPool,
    user_id: Uuid,
    entry_id: Uuid,
) -> Result<(), AppError> {
    let profile = require_profile(pool, user_id).await?;

    let result = sqlx::query("DELETE FROM education_entries WHERE id = $1 AND profile_id = $2")
        .bind(entry_id)
        .bind(profile.id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("education entry {entry_id} not found")));
    }
    Ok(())
}

// ── Experience ──────────────────────────────────────────────────────────────

pub async fn add_experience(
    pool: &PgPool,
    user_id: Uuid,
    entry: ExperienceInput,
) -> Result<ExperienceRow, AppError> {
    let profile = require_profile(pool, user_id).await?;

    let row = sqlx::query_as::<_, ExperienceRow>(
        r#"
        INSERT INTO experience_entries
            (id, profile_id, company, position_title, description, start_date, end_date, current, position)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM experience_entries WHERE profile_id = $2))
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(profile.id)
    .bind(&entry.company)
    .bind(&entry.position_title)
    .bind(&entry.description)
    .bind(entry.start_date)
    .bind(entry.end_date)
    .bind(entry.current)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

pub async fn update_experience(
    pool: &PgPool,
    user_id: Uuid,
    entry_id: Uuid,
    patch: ExperiencePatch,
) -> Result<ExperienceRow, AppError> {
    let profile = require_profile(pool, user_id).await?;

    sqlx::query_as::<_, ExperienceRow>(
        r#"
        UPDATE experience_entries
        SET company = COALESCE($3, company),
            position_title = COALESCE($4, position_title),
            description = COALESCE($5, description),
            start_date = COALESCE($6, start_date),
            end_date = COALESCE($7, end_date),
            current = COALESCE($8, current)
        WHERE id = $1 AND profile_id = $2
        RETURNING *
        "#,
    )
    .bind(entry_id)
    .bind(profile.id)
    .bind(&patch.company)
    .bind(&patch.position_title)
    .bind(&patch.description)
    .bind(patch.start_date)
    .bind(patch.end_date)
    .bind(patch.current)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("experience entry {entry_id} not found")))
}

pub async fn delete_experience(
    pool: &PgPool,
    user_id: Uuid,
    entry_id: Uuid,
) -> Result<(), AppError> {
    let profile = require_profile(pool, user_id).await?;

    let result = sqlx::query("DELETE FROM experience_entries WHERE id = $1 AND profile_id = $2")
        .bind(entry_id)
        .bind(profile.id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("experience entry {entry_id} not found")));
    }
    Ok(())
}

// ── Resume ──────────────────────────────────────────────────────────────────

/// Replaces the profile's single retained resume.
///
/// Order matters: the old object is deleted first (best-effort, a failure
/// only orphans a blob), then the new object is stored (failure aborts with
/// nothing persisted), then the row is replaced atomically via upsert on
/// the `profile_id` UNIQUE constraint.
pub async fn upload_resume(
    pool: &PgPool,
    store: &dyn ObjectStore,
    user_id: Uuid,
    file_name: &str,
    bytes: Bytes,
) -> Result<ResumeRow, AppError> {
    let profile = require_profile(pool, user_id).await?;

    let existing = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM applicant_resumes WHERE profile_id = $1",
    )
    .bind(profile.id)
    .fetch_optional(pool)
    .await?;

    if let Some(old) = &existing {
        if let Err(e) = store.delete(&old.storage_key).await {
            warn!("Failed to delete previous resume '{}': {e}", old.storage_key);
        }
    }

    let key = object_key("resumes", profile.id, file_name);
    let stored = store.put(&key, bytes, content_type_for(file_name)).await?;

    let row = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO applicant_resumes (id, profile_id, file_name, url, storage_key)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (profile_id) DO UPDATE
        SET id = EXCLUDED.id,
            file_name = EXCLUDED.file_name,
            url = EXCLUDED.url,
            storage_key = EXCLUDED.storage_key,
            uploaded_at = now()
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(profile.id)
    .bind(file_name)
    .bind(&stored.url)
    .bind(&stored.key)
    .fetch_one(pool)
    .await?;

    info!("Stored resume {} for profile {}", row.id, profile.id);
    Ok(row)
}

/// Deletes the resume entry and its stored object. Unlike the replace path,
/// an object-store failure here aborts the operation.
pub async fn delete_resume(
    pool: &PgPool,
    store: &dyn ObjectStore,
    user_id: Uuid,
    resume_id: Uuid,
) -> Result<(), AppError> {
    let profile = require_profile(pool, user_id).await?;

    let resume = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM applicant_resumes WHERE id = $1 AND profile_id = $2",
    )
    .bind(resume_id)
    .bind(profile.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("resume {resume_id} not found")))?;

    store.delete(&resume.storage_key).await?;

    sqlx::query("DELETE FROM applicant_resumes WHERE id = $1")
        .bind(resume.id)
        .execute(pool)
        .await?;

    Ok(())
}
