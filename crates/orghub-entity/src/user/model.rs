//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orghub_core::types::SubjectId;

/// A user known to OrgHub, keyed by the identity provider's subject id.
///
/// Profile fields are a cache of the provider's identity traits and are
/// refreshed on every registration/login event.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Identity-provider subject id.
    pub id: SubjectId,
    /// Primary email address.
    pub email: Option<String>,
    /// Human-readable display name.
    pub display_name: Option<String>,
    /// Preferred locale (e.g. `en-US`).
    pub locale: Option<String>,
    /// Preferred IANA timezone.
    pub timezone: Option<String>,
    /// UI theme preference.
    pub theme: Option<String>,
    /// Whether the user may create organizations.
    pub can_create_organizations: bool,
    /// When the user was first synced.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
    /// Last login reported by the identity provider.
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Profile fields pushed by the identity provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpsert {
    /// Subject id.
    pub id: SubjectId,
    /// Email address.
    pub email: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Locale.
    pub locale: Option<String>,
    /// Timezone.
    pub timezone: Option<String>,
}

impl ProfileUpsert {
    /// Minimal profile for a subject known only by id and email.
    pub fn stub(id: SubjectId, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email,
            display_name,
            locale: None,
            timezone: None,
        }
    }
}

/// User-editable profile fields. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfile {
    /// New display name.
    pub display_name: Option<String>,
    /// New locale.
    pub locale: Option<String>,
    /// New timezone.
    pub timezone: Option<String>,
    /// New UI theme.
    pub theme: Option<String>,
}
