//! The application workflow engine: the one place where multiple
//! independently-owned aggregates are read and mutated together.
//!
//! Uniqueness of (job, applicant) is the UNIQUE constraint on
//! `job_applications`; the insert and the `total_applicants` increment run
//! in one transaction so the counter cannot drift from the rows it counts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::application::{ApplicationStatus, JobApplicationRow};
use crate::models::job::{JobPostingRow, JobStatus};
use crate::models::profile::ResumeRow;
use crate::profiles::store::require_profile;

#[derive(Debug, Deserialize)]
pub struct ApplyRequest {
    pub resume_id: Uuid,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

/// Employer view of one application, with the applicant projected in.
#[derive(Debug, Serialize, FromRow)]
pub struct JobApplicantRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub profile_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub first_name: String,
    pub last_name: String,
    pub skills: Vec<String>,
    pub latest_position: Option<String>,
    pub resume_file_name: Option<String>,
    pub resume_url: Option<String>,
}

/// Applicant view of one application, with job and company summaries.
#[derive(Debug, Serialize, FromRow)]
pub struct MyApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub status: ApplicationStatus,
    pub cover_letter: Option<String>,
    pub created_at: DateTime<Utc>,
    pub job_title: String,
    pub job_location: String,
    pub job_status: JobStatus,
    pub company_name: Option<String>,
    pub company_logo_url: Option<String>,
}

/// Creates an application: applicant profile required, posting must exist
/// and be open, the resume must belong to the caller's own profile. The
/// employer and company are denormalized from the posting as a
/// point-in-time snapshot. A second application to the same posting fails
/// with `Conflict` off the storage-level uniqueness constraint, so two
/// concurrent identical applies produce exactly one success.
pub async fn apply(
    pool: &PgPool,
    applicant_user_id: Uuid,
    job_id: Uuid,
    req: ApplyRequest,
) -> Result<JobApplicationRow, AppError> {
    let profile = require_profile(pool, applicant_user_id).await?;

    let job = sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job posting {job_id} not found")))?;

    if job.status != JobStatus::Open {
        return Err(AppError::InvalidState("job posting is closed".into()));
    }

    // Resume lookup is scoped to the caller's own profile; someone else's
    // resume id resolves to NotFound.
    let resume = sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM applicant_resumes WHERE id = $1 AND profile_id = $2",
    )
    .bind(req.resume_id)
    .bind(profile.id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("resume {} not found", req.resume_id)))?;

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, JobApplicationRow>(
        r#"
        INSERT INTO job_applications
            (id, job_id, profile_id, employer_id, company_id, resume_id, cover_letter)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(job.id)
    .bind(profile.id)
    .bind(job.employer_id)
    .bind(job.company_id)
    .bind(resume.id)
    .bind(&req.cover_letter)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| AppError::conflict_on_unique(e, "already applied to this job"))?;

    sqlx::query(
        "UPDATE company_profiles SET total_applicants = total_applicants + 1, updated_at = now() \
         WHERE id = $1",
    )
    .bind(job.company_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        "Application {} created: profile {} -> job {}",
        row.id, profile.id, job.id
    );
    Ok(row)
}

/// Employer triage: validates ownership, then the requested transition
/// against the state machine, then persists. The legality check lives here
/// so no caller can set an arbitrary status.
pub async fn update_status(
    pool: &PgPool,
    application_id: Uuid,
    employer_id: Uuid,
    new_status: ApplicationStatus,
) -> Result<JobApplicationRow, AppError> {
    let application = sqlx::query_as::<_, JobApplicationRow>(
        "SELECT * FROM job_applications WHERE id = $1",
    )
    .bind(application_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("application {application_id} not found")))?;

    if application.employer_id != employer_id {
        return Err(AppError::Forbidden);
    }

    if !application.status.can_transition_to(new_status) {
        return Err(AppError::InvalidTransition(format!(
            "cannot move application from '{}' to '{}'",
            application.status.as_str(),
            new_status.as_str()
        )));
    }

    let row = sqlx::query_as::<_, JobApplicationRow>(
        "UPDATE job_applications SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(application.id)
    .bind(new_status)
    .fetch_one(pool)
    .await?;

    info!(
        "Application {} moved from '{}' to '{}'",
        row.id,
        application.status.as_str(),
        row.status.as_str()
    );
    Ok(row)
}

/// Employer view of a posting's applicants, newest first.
///
/// The posting is resolved scoped to `{id, employer}` in one lookup: a
/// posting that does not exist and a posting owned by someone else are both
/// `Forbidden`, so the endpoint never reveals which posting ids exist.
pub async fn list_applicants_for_job(
    pool: &PgPool,
    job_id: Uuid,
    employer_id: Uuid,
) -> Result<Vec<JobApplicantRow>, AppError> {
    let owned: Option<(Uuid,)> = sqlx::query_as(
        "SELECT id FROM job_postings WHERE id = $1 AND employer_id = $2",
    )
    .bind(job_id)
    .bind(employer_id)
    .fetch_optional(pool)
    .await?;

    if owned.is_none() {
        return Err(AppError::Forbidden);
    }

    Ok(sqlx::query_as::<_, JobApplicantRow>(
        r#"
        SELECT a.id, a.job_id, a.profile_id, a.status, a.cover_letter, a.created_at,
               p.first_name, p.last_name, p.skills,
               (SELECT e.position_title FROM experience_entries e
                WHERE e.profile_id = p.id
                ORDER BY e.current DESC, e.start_date DESC
                LIMIT 1) AS latest_position,
               r.file_name AS resume_file_name,
               r.url AS resume_url
        FROM job_applications a
        JOIN applicant_profiles p ON p.id = a.profile_id
        LEFT JOIN applicant_resumes r ON r.id = a.resume_id
        WHERE a.job_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(job_id)
    .fetch_all(pool)
    .await?)
}

/// Applicant view of their own applications, newest first. The company
/// summary is joined through the denormalized snapshot id and may be absent
/// if the company profile has since been deleted.
pub async fn list_my_applications(
    pool: &PgPool,
    applicant_user_id: Uuid,
) -> Result<Vec<MyApplicationRow>, AppError> {
    let profile = require_profile(pool, applicant_user_id).await?;

    Ok(sqlx::query_as::<_, MyApplicationRow>(
        r#"
        SELECT a.id, a.job_id, a.status, a.cover_letter, a.created_at,
               j.title AS job_title,
               j.location AS job_location,
               j.status AS job_status,
               c.company_name,
               c.logo_url AS company_logo_url
        FROM job_applications a
        JOIN job_postings j ON j.id = a.job_id
        LEFT JOIN company_profiles c ON c.id = a.company_id
        WHERE a.profile_id = $1
        ORDER BY a.created_at DESC
        "#,
    )
    .bind(profile.id)
    .fetch_all(pool)
    .await?)
}
