use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Application triage status.
///
/// Legal walks: `pending → reviewed → {accepted, rejected}`, plus the direct
/// shortcuts `pending → accepted` and `pending → rejected`. `accepted` and
/// `rejected` are terminal. The matrix lives here, in the authoritative
/// service layer, so no caller can set an arbitrary status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "application_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    /// The set of states legally reachable from `self` in one transition.
    pub fn legal_next(self) -> &'static [ApplicationStatus] {
        use ApplicationStatus::*;
        match self {
            Pending => &[Reviewed, Accepted, Rejected],
            Reviewed => &[Accepted, Rejected],
            Accepted | Rejected => &[],
        }
    }

    pub fn can_transition_to(self, next: ApplicationStatus) -> bool {
        self.legal_next().contains(&next)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Reviewed => "reviewed",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

/// The join entity linking an applicant, a posting, and the employer/company
/// resolved from the posting at apply time. `UNIQUE (job_id, profile_id)`
/// caps applications at one per applicant per posting.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub profile_id: Uuid,
    pub employer_id: Uuid,
    pub company_id: Uuid,
    pub resume_id: Uuid,
    pub cover_letter: Option<String>,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::ApplicationStatus::*;

    #[test]
    fn test_pending_reaches_all_other_states() {
        assert!(Pending.can_transition_to(Reviewed));
        assert!(Pending.can_transition_to(Accepted));
        assert!(Pending.can_transition_to(Rejected));
    }

    #[test]
    fn test_reviewed_only_reaches_terminals() {
        assert!(Reviewed.can_transition_to(Accepted));
        assert!(Reviewed.can_transition_to(Rejected));
        assert!(!Reviewed.can_transition_to(Pending));
        assert!(!Reviewed.can_transition_to(Reviewed));
    }

    #[test]
    fn test_no_state_transitions_to_itself() {
        for s in [Pending, Reviewed, Accepted, Rejected] {
            assert!(!s.can_transition_to(s), "{s:?} must not self-transition");
        }
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for terminal in [Accepted, Rejected] {
            assert!(terminal.legal_next().is_empty());
            for next in [Pending, Reviewed, Accepted, Rejected] {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal:?} -> {next:?} must be illegal"
                );
            }
        }
    }

    #[test]
    fn test_pending_cannot_be_reentered() {
        for s in [Pending, Reviewed, Accepted, Rejected] {
            assert!(!s.can_transition_to(Pending));
        }
    }
}
