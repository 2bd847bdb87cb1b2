//! Membership role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use orghub_core::error::{AppError, ErrorKind};

/// Roles a user can hold within an organization.
///
/// Ordered by privilege: Owner > Admin > Member. Exactly one member of an
/// organization holds `Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Regular member: read access to the organization.
    Member,
    /// Manages settings and members.
    Admin,
    /// The single owner: may delete the organization and name a successor.
    Owner,
}

impl MemberRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Admin => 2,
            Self::Member => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &MemberRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is the owner role.
    pub fn is_owner(&self) -> bool {
        matches!(self, Self::Owner)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(AppError::new(
                ErrorKind::InvalidRole,
                format!("Invalid role: '{s}'. Expected one of: member, admin, owner"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(MemberRole::Owner.has_at_least(&MemberRole::Admin));
        assert!(MemberRole::Admin.has_at_least(&MemberRole::Admin));
        assert!(!MemberRole::Member.has_at_least(&MemberRole::Admin));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("admin".parse::<MemberRole>().unwrap(), MemberRole::Admin);
        assert_eq!("OWNER".parse::<MemberRole>().unwrap(), MemberRole::Owner);
        let err = "superuser".parse::<MemberRole>().unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidRole);
    }

    #[test]
    fn test_unknown_role_rejected_by_serde() {
        assert!(serde_json::from_str::<MemberRole>("\"editor\"").is_err());
        assert_eq!(
            serde_json::from_str::<MemberRole>("\"member\"").unwrap(),
            MemberRole::Member
        );
    }
}
