//! Organization entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orghub_core::types::{OrganizationId, SubjectId};

use super::kind::OrganizationType;
use crate::membership::MemberRole;

/// An organization row.
///
/// `owner_id` always names the user holding the single `owner` membership;
/// only the store's transactional create/transfer paths write it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: OrganizationId,
    /// Organization type.
    pub org_type: OrganizationType,
    /// Unique display name.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// Free-form JSON metadata.
    pub metadata: serde_json::Value,
    /// Current owner.
    pub owner_id: Option<SubjectId>,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
    /// When the organization was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An organization together with the caller's role in it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrganizationWithRole {
    /// The organization.
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub organization: Organization,
    /// The caller's role.
    pub role: MemberRole,
}

/// Data required to create an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganization {
    /// Organization type.
    pub org_type: OrganizationType,
    /// Unique name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Metadata object.
    pub metadata: serde_json::Value,
}

/// Mutable organization fields. `None` leaves the field unchanged.
///
/// Ownership is changed only through an ownership transfer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizationChanges {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New type.
    pub org_type: Option<OrganizationType>,
    /// Replacement metadata.
    pub metadata: Option<serde_json::Value>,
}

impl OrganizationChanges {
    /// Whether no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.org_type.is_none()
            && self.metadata.is_none()
    }
}
