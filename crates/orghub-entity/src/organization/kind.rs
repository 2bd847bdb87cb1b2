//! Organization type enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use orghub_core::error::{AppError, ErrorKind};

/// The closed set of organization types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "organization_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrganizationType {
    /// A single person's workspace.
    Personal,
    /// A small team.
    Team,
    /// A company-wide organization.
    Enterprise,
}

impl OrganizationType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "personal",
            Self::Team => "team",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OrganizationType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "personal" => Ok(Self::Personal),
            "team" => Ok(Self::Team),
            "enterprise" => Ok(Self::Enterprise),
            _ => Err(AppError::new(
                ErrorKind::InvalidOrgType,
                format!(
                    "Invalid organization type: '{s}'. Expected one of: personal, team, enterprise"
                ),
            )),
        }
    }
}
