//! Typed path parameter helpers.

use orghub_core::error::AppError;
use orghub_core::types::{ClientId, OrganizationId, SubjectId};

/// Parses an organization id from a path segment.
pub fn organization_id(s: &str) -> Result<OrganizationId, AppError> {
    s.parse::<OrganizationId>()
        .map_err(|_| AppError::validation(format!("Invalid organization id: {s}")))
}

/// Parses a user (subject) id from a path segment.
pub fn subject_id(s: &str) -> Result<SubjectId, AppError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AppError::validation("User id cannot be empty"));
    }
    Ok(SubjectId::new(s))
}

/// Parses a machine client id from a path segment.
pub fn client_id(s: &str) -> Result<ClientId, AppError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(AppError::validation("Client id cannot be empty"));
    }
    Ok(ClientId::new(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orghub_core::ErrorKind;

    #[test]
    fn test_organization_id_rejects_garbage() {
        let err = organization_id("not-a-uuid").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[test]
    fn test_organization_id_accepts_uuid() {
        let id = organization_id("0192a4c8-6e1b-7c3d-8f00-1234567890ab").unwrap();
        assert_eq!(id.to_string(), "0192a4c8-6e1b-7c3d-8f00-1234567890ab");
    }
}
