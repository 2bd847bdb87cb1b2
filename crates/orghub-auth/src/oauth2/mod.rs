//! Authorization server contract for machine (OAuth2) clients.

pub mod hydra;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use orghub_core::result::AppResult;
use orghub_core::types::{ClientId, OrganizationId};

pub use hydra::HydraClient;

/// A client to register on behalf of an organization.
#[derive(Debug, Clone, Serialize)]
pub struct ClientRegistration {
    /// Human-readable name.
    pub name: String,
    /// Requested scopes.
    pub scopes: Vec<String>,
    /// Organization the client acts for, stored as client metadata.
    pub organization_id: OrganizationId,
}

/// Credentials returned by the authorization server on registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredClient {
    /// Assigned client id.
    pub client_id: ClientId,
    /// One-time client secret.
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// RFC 7662 token introspection result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenIntrospection {
    /// Whether the token is currently active.
    pub active: bool,
    /// Client the token was issued to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Space-separated scopes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    /// Token subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Expiry as a unix timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenIntrospection {
    /// An inactive result with no claims.
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Operations OrgHub needs from the authorization server's admin API.
#[async_trait]
pub trait AuthorizationServer: Send + Sync + std::fmt::Debug + 'static {
    /// Register a `client_credentials` client.
    async fn create_client(&self, registration: &ClientRegistration) -> AppResult<RegisteredClient>;

    /// Delete a client. Deleting an unknown client succeeds.
    async fn delete_client(&self, client_id: &ClientId) -> AppResult<()>;

    /// Introspect an access token.
    async fn introspect(&self, token: &str) -> AppResult<TokenIntrospection>;
}
