//! Membership entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orghub_core::types::{OrganizationId, SubjectId};

use super::role::MemberRole;

/// A row of `user_organization_links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Membership {
    /// Member's subject id.
    pub user_id: SubjectId,
    /// Organization.
    pub organization_id: OrganizationId,
    /// Role within the organization.
    pub role: MemberRole,
    /// When the member joined (refreshed on re-invite).
    pub joined_at: DateTime<Utc>,
}

/// A member together with their cached profile, for member listings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MemberProfile {
    /// Member's subject id.
    pub user_id: SubjectId,
    /// Cached email.
    pub email: Option<String>,
    /// Cached display name.
    pub display_name: Option<String>,
    /// Role within the organization.
    pub role: MemberRole,
    /// When the member joined.
    pub joined_at: DateTime<Utc>,
}
