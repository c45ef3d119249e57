//! Inbound identity. Authentication happens upstream (gateway/session layer);
//! this service trusts the `X-User-Id` / `X-User-Role` headers it injects and
//! uses them only for ownership checks.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Applicant,
    Employer,
}

/// The already-authenticated actor for the current request.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
}

impl Actor {
    /// Returns the acting user id if the actor is an applicant, `Forbidden` otherwise.
    pub fn require_applicant(&self) -> Result<Uuid, AppError> {
        match self.role {
            Role::Applicant => Ok(self.user_id),
            Role::Employer => Err(AppError::Forbidden),
        }
    }

    /// Returns the acting user id if the actor is an employer, `Forbidden` otherwise.
    pub fn require_employer(&self) -> Result<Uuid, AppError> {
        match self.role {
            Role::Employer => Ok(self.user_id),
            Role::Applicant => Err(AppError::Forbidden),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or(AppError::Unauthorized)?;

        let role = match parts
            .headers
            .get("x-user-role")
            .and_then(|v| v.to_str().ok())
        {
            Some("applicant") => Role::Applicant,
            Some("employer") => Role::Employer,
            _ => return Err(AppError::Unauthorized),
        };

        Ok(Actor { user_id, role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applicant_cannot_act_as_employer() {
        let actor = Actor {
            user_id: Uuid::new_v4(),
            role: Role::Applicant,
        };
        assert!(actor.require_applicant().is_ok());
        assert!(matches!(
            actor.require_employer(),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn test_employer_cannot_act_as_applicant() {
        let actor = Actor {
            user_id: Uuid::new_v4(),
            role: Role::Employer,
        };
        assert!(actor.require_employer().is_ok());
        assert!(matches!(
            actor.require_applicant(),
            Err(AppError::Forbidden)
        ));
    }
}
