use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "employment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
}

impl sqlx::postgres::PgHasArrayType for EmploymentType {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_employment_type")
    }
}

impl std::str::FromStr for EmploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full_time" => Ok(EmploymentType::FullTime),
            "part_time" => Ok(EmploymentType::PartTime),
            "contract" => Ok(EmploymentType::Contract),
            "internship" => Ok(EmploymentType::Internship),
            other => Err(format!("unknown employment type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Open,
    Closed,
}

#[cfg(test)]
mod tests {
    use super::EmploymentType;

    #[test]
    fn test_employment_type_round_trips_wire_names() {
        for (name, expected) in [
            ("full_time", EmploymentType::FullTime),
            ("part_time", EmploymentType::PartTime),
            ("contract", EmploymentType::Contract),
            ("internship", EmploymentType::Internship),
        ] {
            assert_eq!(name.parse::<EmploymentType>(), Ok(expected));
        }
        assert!("freelance".parse::<EmploymentType>().is_err());
    }
}

/// A job posting, always resolved against exactly one company profile owned
/// by the creating employer. `employer_id` and `company_id` are set
/// server-side and never client-settable.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobPostingRow {
    pub id: Uuid,
    pub employer_id: Uuid,
    pub company_id: Uuid,
    pub title: String,
    pub description: String,
    pub employment_type: EmploymentType,
    pub location: String,
    pub remote: bool,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub required_skills: Vec<String>,
    pub years_of_experience: Option<i32>,
    pub education_level: Option<String>,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
