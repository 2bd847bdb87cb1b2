//! Machine client entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use orghub_core::types::{ClientId, OrganizationId, SubjectId};

/// Local record of an OAuth2 client registered at the authorization server
/// on behalf of an organization. The secret is never stored.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MachineClient {
    /// Client id assigned by the authorization server.
    pub client_id: ClientId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Human-readable name.
    pub name: String,
    /// Granted scopes.
    pub scopes: Vec<String>,
    /// Admin who registered the client.
    pub created_by: SubjectId,
    /// When the client was registered.
    pub created_at: DateTime<Utc>,
}
