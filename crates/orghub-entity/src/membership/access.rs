//! Point-in-time view of a user's standing in an organization.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orghub_core::types::SubjectId;

use super::role::MemberRole;

/// The two facts every authorization decision needs, read in one lookup:
/// the organization's `owner_id` and the caller's membership role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AccessSnapshot {
    /// The organization's `owner_id` column.
    pub owner_id: Option<SubjectId>,
    /// The caller's role, if they have a membership row.
    pub role: Option<MemberRole>,
}

impl AccessSnapshot {
    /// Whether `user` is named as the organization's owner.
    fn is_named_owner(&self, user: &SubjectId) -> bool {
        self.owner_id.as_ref() == Some(user)
    }

    /// Member of the organization in any role.
    pub fn is_member(&self, user: &SubjectId) -> bool {
        self.role.is_some() || self.is_named_owner(user)
    }

    /// Admin or owner. The `owner_id` column is consulted as well as the
    /// role so that a lagging membership row never locks the owner out.
    pub fn is_admin(&self, user: &SubjectId) -> bool {
        matches!(self.role, Some(MemberRole::Admin | MemberRole::Owner)) || self.is_named_owner(user)
    }

    /// Owner of the organization.
    pub fn is_owner(&self, user: &SubjectId) -> bool {
        matches!(self.role, Some(MemberRole::Owner)) || self.is_named_owner(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str) -> SubjectId {
        SubjectId::new(id)
    }

    #[test]
    fn test_member_role_is_member_only() {
        let snap = AccessSnapshot {
            owner_id: Some(subject("alice")),
            role: Some(MemberRole::Member),
        };
        let bob = subject("bob");
        assert!(snap.is_member(&bob));
        assert!(!snap.is_admin(&bob));
        assert!(!snap.is_owner(&bob));
    }

    #[test]
    fn test_admin_role_is_not_owner() {
        let snap = AccessSnapshot {
            owner_id: Some(subject("alice")),
            role: Some(MemberRole::Admin),
        };
        let bob = subject("bob");
        assert!(snap.is_admin(&bob));
        assert!(!snap.is_owner(&bob));
    }

    #[test]
    fn test_owner_id_alone_grants_admin() {
        let snap = AccessSnapshot {
            owner_id: Some(subject("alice")),
            role: None,
        };
        let alice = subject("alice");
        assert!(snap.is_member(&alice));
        assert!(snap.is_admin(&alice));
        assert!(snap.is_owner(&alice));
    }

    #[test]
    fn test_outsider_has_nothing() {
        let snap = AccessSnapshot {
            owner_id: Some(subject("alice")),
            role: None,
        };
        let eve = subject("eve");
        assert!(!snap.is_member(&eve));
        assert!(!snap.is_admin(&eve));
        assert!(!snap.is_owner(&eve));
    }
}
