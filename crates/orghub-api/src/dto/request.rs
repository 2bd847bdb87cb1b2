//! Request DTOs with validation.
//!
//! Role and organization type arrive as strings so that unknown values
//! surface as `INVALID_ROLE` / `INVALID_ORG_TYPE` rather than as generic
//! parse errors.

use serde::{Deserialize, Serialize};
use validator::Validate;

use orghub_core::result::AppResult;
use orghub_entity::membership::MemberRole;
use orghub_entity::organization::OrganizationType;
use orghub_entity::user::UpdateProfile;
use orghub_service::client::CreateClientRequest;
use orghub_service::organization::{
    AddMemberRequest, CreateOrganizationRequest, UpdateOrganizationRequest,
};

/// Create organization request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrganizationBody {
    /// Organization name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    /// Organization type.
    #[serde(rename = "type", alias = "org_type")]
    pub org_type: String,
    /// Optional description.
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// Optional metadata object.
    pub metadata: Option<serde_json::Value>,
}

impl CreateOrganizationBody {
    /// Convert into the service request, parsing the type.
    pub fn into_request(self) -> AppResult<CreateOrganizationRequest> {
        Ok(CreateOrganizationRequest {
            org_type: self.org_type.parse::<OrganizationType>()?,
            name: self.name,
            description: self.description,
            metadata: self.metadata,
        })
    }
}

/// Update organization request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateOrganizationBody {
    /// New name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,
    /// New description.
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
    /// New type.
    #[serde(default, rename = "type", alias = "org_type")]
    pub org_type: Option<String>,
    /// Replacement metadata object.
    pub metadata: Option<serde_json::Value>,
}

impl UpdateOrganizationBody {
    /// Convert into the service request, parsing the type when present.
    pub fn into_request(self) -> AppResult<UpdateOrganizationRequest> {
        Ok(UpdateOrganizationRequest {
            name: self.name,
            description: self.description,
            org_type: self
                .org_type
                .map(|t| t.parse::<OrganizationType>())
                .transpose()?,
            metadata: self.metadata,
        })
    }
}

/// Invite member request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddMemberBody {
    /// Email the invitee registered with.
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    /// Role to grant.
    #[serde(default = "default_member_role")]
    pub role: String,
}

fn default_member_role() -> String {
    MemberRole::Member.as_str().to_string()
}

impl AddMemberBody {
    /// Convert into the service request. The role is parsed by the service
    /// once the caller has been authorized.
    pub fn into_request(self) -> AddMemberRequest {
        AddMemberRequest {
            role: self.role,
            email: self.email,
        }
    }
}

/// Change role request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRoleBody {
    /// Target role.
    pub role: String,
}

/// Update profile request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProfileBody {
    /// New display name.
    #[validate(length(min = 1, max = 255, message = "Display name must be 1-255 characters"))]
    pub display_name: Option<String>,
    /// New locale.
    #[validate(length(max = 35))]
    pub locale: Option<String>,
    /// New IANA timezone.
    #[validate(length(max = 64))]
    pub timezone: Option<String>,
    /// New UI theme.
    #[validate(length(max = 32))]
    pub theme: Option<String>,
}

impl From<UpdateProfileBody> for UpdateProfile {
    fn from(body: UpdateProfileBody) -> Self {
        Self {
            display_name: body.display_name,
            locale: body.locale,
            timezone: body.timezone,
            theme: body.theme,
        }
    }
}

/// Register machine client request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateClientBody {
    /// Client name.
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,
    /// Requested scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl From<CreateClientBody> for CreateClientRequest {
    fn from(body: CreateClientBody) -> Self {
        Self {
            name: body.name,
            scopes: body.scopes,
        }
    }
}

/// Token introspection request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct IntrospectBody {
    /// The access token to check.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use orghub_core::ErrorKind;

    #[test]
    fn test_unknown_org_type_is_invalid_org_type() {
        let body: CreateOrganizationBody =
            serde_json::from_value(serde_json::json!({"name": "Acme", "type": "guild"})).unwrap();
        let err = body.into_request().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOrgType);
    }

    #[test]
    fn test_member_is_the_default_role() {
        let body: AddMemberBody =
            serde_json::from_value(serde_json::json!({"email": "b@example.com"})).unwrap();
        assert_eq!(body.into_request().role, "member");
    }

    #[test]
    fn test_bad_email_fails_validation() {
        let body = AddMemberBody {
            email: "not-an-email".to_string(),
            role: "member".to_string(),
        };
        assert!(body.validate().is_err());
    }
}
