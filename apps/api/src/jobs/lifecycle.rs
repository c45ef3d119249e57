use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::companies::store::require_company;
use crate::errors::AppError;
use crate::models::job::{EmploymentType, JobPostingRow, JobStatus};
use crate::pagination::{PageMeta, PageParams};

#[derive(Debug, Deserialize)]
pub struct JobInput {
    pub title: String,
    pub description: String,
    pub employment_type: EmploymentType,
    pub location: String,
    #[serde(default)]
    pub remote: bool,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    #[serde(default)]
    pub required_skills: Vec<String>,
    pub years_of_experience: Option<i32>,
    pub education_level: Option<String>,
}

/// Whitelisted patch for the general update path. `status`, `employer_id`
/// and `company_id` have no field here, so client-supplied values for them
/// are stripped during deserialization no matter what the payload carries.
#[derive(Debug, Default, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub location: Option<String>,
    pub remote: Option<bool>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub required_skills: Option<Vec<String>>,
    pub years_of_experience: Option<i32>,
    pub education_level: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct JobFilters {
    pub employment_types: Vec<EmploymentType>,
    pub remote: Option<bool>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct JobsPage {
    pub jobs: Vec<JobPostingRow>,
    pub pagination: PageMeta,
}

fn validate_salary_range(min: Option<i64>, max: Option<i64>) -> Result<(), AppError> {
    if let (Some(min), Some(max)) = (min, max) {
        if min > max {
            return Err(AppError::Validation(
                "salary_min must not exceed salary_max".into(),
            ));
        }
    }
    Ok(())
}

/// Creates a posting for the employer's company. The posting opens
/// immediately; `job_posts_count` and `active_jobs_count` move with it in
/// the same transaction.
pub async fn create_job(
    pool: &PgPool,
    employer_id: Uuid,
    input: JobInput,
) -> Result<JobPostingRow, AppError> {
    if input.title.trim().is_empty() || input.description.trim().is_empty() {
        return Err(AppError::Validation("title and description are required".into()));
    }
    validate_salary_range(input.salary_min, input.salary_max)?;

    let company = require_company(pool, employer_id).await?;

    let mut tx = pool.begin().await?;

    let row = sqlx::query_as::<_, JobPostingRow>(
        r#"
        INSERT INTO job_postings
            (id, employer_id, company_id, title, description, employment_type, location,
             remote, salary_min, salary_max, salary_currency, required_skills,
             years_of_experience, education_level)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(employer_id)
    .bind(company.id)
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.employment_type)
    .bind(&input.location)
    .bind(input.remote)
    .bind(input.salary_min)
    .bind(input.salary_max)
    .bind(&input.salary_currency)
    .bind(&input.required_skills)
    .bind(input.years_of_experience)
    .bind(&input.education_level)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE company_profiles
        SET job_posts_count = job_posts_count + 1,
            active_jobs_count = active_jobs_count + 1,
            updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(company.id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!("Created job posting {} for company {}", row.id, company.id);
    Ok(row)
}

/// Applies a whitelisted patch to an owned posting.
pub async fn update_job(
    pool: &PgPool,
    job_id: Uuid,
    employer_id: Uuid,
    patch: JobPatch,
) -> Result<JobPostingRow, AppError> {
    let job = fetch_job(pool, job_id).await?;
    if job.employer_id != employer_id {
        return Err(AppError::Forbidden);
    }

    validate_salary_range(
        patch.salary_min.or(job.salary_min),
        patch.salary_max.or(job.salary_max),
    )?;

    let row = sqlx::query_as::<_, JobPostingRow>(
        r#"
        UPDATE job_postings
        SET title = COALESCE($2, title),
            description = COALESCE($3, description),
            employment_type = COALESCE($4, employment_type),
            location = COALESCE($5, location),
            remote = COALESCE($6, remote),
            salary_min = COALESCE($7, salary_min),
            salary_max = COALESCE($8, salary_max),
            salary_currency = COALESCE($9, salary_currency),
            required_skills = COALESCE($10, required_skills),
            years_of_experience = COALESCE($11, years_of_experience),
            education_level = COALESCE($12, education_level),
            updated_at = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(job.id)
    .bind(&patch.title)
    .bind(&patch.description)
    .bind(patch.employment_type)
    .bind(&patch.location)
    .bind(patch.remote)
    .bind(patch.salary_min)
    .bind(patch.salary_max)
    .bind(&patch.salary_currency)
    .bind(&patch.required_skills)
    .bind(patch.years_of_experience)
    .bind(&patch.education_level)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Ownership-checked open/closed toggle. Setting the current status again is
/// a no-op success; `active_jobs_count` moves only on an actual change.
pub async fn set_job_status(
    pool: &PgPool,
    job_id: Uuid,
    employer_id: Uuid,
    target: JobStatus,
) -> Result<JobPostingRow, AppError> {
    let mut tx = pool.begin().await?;

    let job = sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
        .bind(job_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job posting {job_id} not found")))?;

    if job.employer_id != employer_id {
        return Err(AppError::Forbidden);
    }
    if job.status == target {
        return Ok(job);
    }

    let row = sqlx::query_as::<_, JobPostingRow>(
        "UPDATE job_postings SET status = $2, updated_at = now() WHERE id = $1 RETURNING *",
    )
    .bind(job.id)
    .bind(target)
    .fetch_one(&mut *tx)
    .await?;

    let delta: i32 = if target == JobStatus::Open { 1 } else { -1 };
    sqlx::query(
        r#"
        UPDATE company_profiles
        SET active_jobs_count = GREATEST(active_jobs_count + $2, 0), updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(job.company_id)
    .bind(delta)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!("Job posting {} is now {:?}", row.id, row.status);
    Ok(row)
}

async fn fetch_job(pool: &PgPool, job_id: Uuid) -> Result<JobPostingRow, AppError> {
    sqlx::query_as::<_, JobPostingRow>("SELECT * FROM job_postings WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("job posting {job_id} not found")))
}

/// Public read path: open postings only. Closed postings are invisible here
/// even to their owner, who reads them via `list_employer_jobs`.
pub async fn get_open_job(pool: &PgPool, job_id: Uuid) -> Result<JobPostingRow, AppError> {
    sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE id = $1 AND status = 'open'",
    )
    .bind(job_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("job posting {job_id} not found")))
}

/// Builds the WHERE clause for the public listing, returning the clause and
/// the number of bind placeholders it references. Binds are applied in the
/// same fixed order: employment types, remote, salary_min, salary_max.
fn filter_clause(filters: &JobFilters) -> (String, usize) {
    let mut conditions = vec!["status = 'open'".to_string()];
    let mut n = 0;

    if !filters.employment_types.is_empty() {
        n += 1;
        conditions.push(format!("employment_type = ANY(${n})"));
    }
    if filters.remote.is_some() {
        n += 1;
        conditions.push(format!("remote = ${n}"));
    }
    if filters.salary_min.is_some() {
        n += 1;
        conditions.push(format!("salary_min >= ${n}"));
    }
    if filters.salary_max.is_some() {
        n += 1;
        conditions.push(format!("salary_max <= ${n}"));
    }

    (conditions.join(" AND "), n)
}

/// Public filtered listing over open postings, newest first.
pub async fn list_jobs(
    pool: &PgPool,
    filters: &JobFilters,
    page: &PageParams,
) -> Result<JobsPage, AppError> {
    let (where_clause, n) = filter_clause(filters);

    let count_sql = format!("SELECT count(*) FROM job_postings WHERE {where_clause}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    if !filters.employment_types.is_empty() {
        count_query = count_query.bind(&filters.employment_types);
    }
    if let Some(remote) = filters.remote {
        count_query = count_query.bind(remote);
    }
    if let Some(min) = filters.salary_min {
        count_query = count_query.bind(min);
    }
    if let Some(max) = filters.salary_max {
        count_query = count_query.bind(max);
    }
    let total_items = count_query.fetch_one(pool).await?;

    let page_sql = format!(
        "SELECT * FROM job_postings WHERE {where_clause} \
         ORDER BY created_at DESC LIMIT ${} OFFSET ${}",
        n + 1,
        n + 2
    );
    let mut page_query = sqlx::query_as::<_, JobPostingRow>(&page_sql);
    if !filters.employment_types.is_empty() {
        page_query = page_query.bind(&filters.employment_types);
    }
    if let Some(remote) = filters.remote {
        page_query = page_query.bind(remote);
    }
    if let Some(min) = filters.salary_min {
        page_query = page_query.bind(min);
    }
    if let Some(max) = filters.salary_max {
        page_query = page_query.bind(max);
    }
    let jobs = page_query
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(pool)
        .await?;

    Ok(JobsPage {
        jobs,
        pagination: PageMeta::new(page, total_items),
    })
}

/// Owner view: all of the employer's postings regardless of status.
pub async fn list_employer_jobs(
    pool: &PgPool,
    employer_id: Uuid,
) -> Result<Vec<JobPostingRow>, AppError> {
    Ok(sqlx::query_as::<_, JobPostingRow>(
        "SELECT * FROM job_postings WHERE employer_id = $1 ORDER BY created_at DESC",
    )
    .bind(employer_id)
    .fetch_all(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_clause_without_filters() {
        let (clause, n) = filter_clause(&JobFilters::default());
        assert_eq!(clause, "status = 'open'");
        assert_eq!(n, 0);
    }

    #[test]
    fn test_filter_clause_with_all_filters() {
        let filters = JobFilters {
            employment_types: vec![EmploymentType::FullTime, EmploymentType::Contract],
            remote: Some(true),
            salary_min: Some(50_000),
            salary_max: Some(90_000),
        };
        let (clause, n) = filter_clause(&filters);
        assert_eq!(
            clause,
            "status = 'open' AND employment_type = ANY($1) AND remote = $2 \
             AND salary_min >= $3 AND salary_max <= $4"
        );
        assert_eq!(n, 4);
    }

    #[test]
    fn test_filter_clause_placeholders_stay_contiguous() {
        // Skipping a filter must renumber the rest, or binds go to the
        // wrong placeholder.
        let filters = JobFilters {
            employment_types: vec![],
            remote: None,
            salary_min: Some(10),
            salary_max: Some(20),
        };
        let (clause, n) = filter_clause(&filters);
        assert_eq!(clause, "status = 'open' AND salary_min >= $1 AND salary_max <= $2");
        assert_eq!(n, 2);
    }

    #[test]
    fn test_job_patch_strips_protected_fields() {
        let patch: JobPatch = serde_json::from_value(serde_json::json!({
            "title": "Senior Anvil Engineer",
            "status": "closed",
            "employer_id": "11111111-1111-1111-1111-111111111111",
            "company_id": "22222222-2222-2222-2222-222222222222"
        }))
        .expect("unknown fields must be ignored, not rejected");

        assert_eq!(patch.title.as_deref(), Some("Senior Anvil Engineer"));
        // No way to express status/employer/company through the patch type.
    }

    #[test]
    fn test_salary_range_validation() {
        assert!(validate_salary_range(Some(10), Some(20)).is_ok());
        assert!(validate_salary_range(Some(20), Some(20)).is_ok());
        assert!(validate_salary_range(None, Some(20)).is_ok());
        assert!(matches!(
            validate_salary_range(Some(30), Some(20)),
            Err(AppError::Validation(_))
        ));
    }
}
