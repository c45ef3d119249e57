use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One company profile per employer account (UNIQUE on `user_id`).
///
/// `credibility_score` is a pure function of the descriptive fields,
/// recomputed and persisted on every create/update. The three counters are
/// denormalized from postings/applications and maintained transactionally
/// by the operations that change the underlying facts; `recount` repairs
/// them from source-of-truth tables.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CompanyProfileRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company_name: String,
    pub description: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    pub logo_url: Option<String>,
    pub logo_key: Option<String>,
    pub credibility_score: i32,
    pub job_posts_count: i32,
    pub active_jobs_count: i32,
    pub total_applicants: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
