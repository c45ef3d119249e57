use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One applicant profile per user account, enforced by a UNIQUE constraint
/// on `user_id`. Nested collections live in their own tables, always looked
/// up scoped to the owning profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicantProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EducationRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub school: String,
    pub degree: String,
    pub field: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExperienceRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub company: String,
    pub position_title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub current: bool,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

/// The single retained resume for a profile. `UNIQUE (profile_id)` makes the
/// at-most-one cardinality a storage-level guarantee; uploads replace the row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub profile_id: Uuid,
    pub file_name: String,
    pub url: String,
    pub storage_key: String,
    pub uploaded_at: DateTime<Utc>,
}
