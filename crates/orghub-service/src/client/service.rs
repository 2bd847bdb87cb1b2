//! Registers, lists and revokes OAuth2 clients owned by organizations.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use orghub_auth::AccessGate;
use orghub_auth::oauth2::{AuthorizationServer, ClientRegistration, TokenIntrospection};
use orghub_core::error::AppError;
use orghub_core::result::AppResult;
use orghub_core::types::{ClientId, OrganizationId};
use orghub_database::OrganizationStore;
use orghub_entity::client::MachineClient;

use crate::context::RequestContext;
use crate::validate;

/// Data for registering a machine client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClientRequest {
    /// Client name.
    pub name: String,
    /// Requested scopes; empty means the configured defaults.
    #[serde(default)]
    pub scopes: Vec<String>,
}

/// A freshly registered client with its one-time secret.
#[derive(Debug, Clone, Serialize)]
pub struct CreatedClient {
    /// The stored record.
    #[serde(flatten)]
    pub client: MachineClient,
    /// Secret shown once; not stored by OrgHub.
    pub client_secret: Option<String>,
}

/// Machine client registry.
#[derive(Debug, Clone)]
pub struct ClientService {
    store: Arc<dyn OrganizationStore>,
    gate: Arc<AccessGate>,
    authorization: Arc<dyn AuthorizationServer>,
    default_scopes: Vec<String>,
}

impl ClientService {
    /// Creates a new client service.
    pub fn new(
        store: Arc<dyn OrganizationStore>,
        gate: Arc<AccessGate>,
        authorization: Arc<dyn AuthorizationServer>,
        default_scopes: Vec<String>,
    ) -> Self {
        Self {
            store,
            gate,
            authorization,
            default_scopes,
        }
    }

    /// Register a client for `org`. Requires admin.
    #[instrument(skip(self, ctx, req), fields(user_id = %ctx.user_id))]
    pub async fn create_client(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
        req: CreateClientRequest,
    ) -> AppResult<CreatedClient> {
        self.gate.require_admin(&ctx.user_id, org).await?;

        let name = validate::name("Client name", &req.name)?;
        let scopes = if req.scopes.is_empty() {
            self.default_scopes.clone()
        } else {
            req.scopes
        };
        if scopes.iter().any(|s| s.trim().is_empty() || s.contains(' ')) {
            return Err(AppError::validation("Scopes must be non-empty and contain no spaces"));
        }

        let registered = self
            .authorization
            .create_client(&ClientRegistration {
                name: name.clone(),
                scopes: scopes.clone(),
                organization_id: *org,
            })
            .await?;

        let record = MachineClient {
            client_id: registered.client_id.clone(),
            organization_id: *org,
            name,
            scopes,
            created_by: ctx.user_id.clone(),
            created_at: Utc::now(),
        };

        let client = match self.store.insert_client(&record).await {
            Ok(client) => client,
            Err(e) => {
                error!(client_id = %record.client_id, error = %e, "Failed to persist machine client; revoking");
                if let Err(revoke) = self.authorization.delete_client(&record.client_id).await {
                    error!(client_id = %record.client_id, error = %revoke, "Failed to revoke orphaned machine client");
                }
                return Err(e);
            }
        };

        info!(client_id = %client.client_id, org_id = %org, actor = %ctx.user_id, "Machine client created");
        Ok(CreatedClient {
            client,
            client_secret: registered.client_secret,
        })
    }

    /// Clients of `org`. Requires membership.
    pub async fn list_clients(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
    ) -> AppResult<Vec<MachineClient>> {
        self.gate.require_member(&ctx.user_id, org).await?;
        self.store.list_clients(org).await
    }

    /// Revoke a client of `org`. Requires admin.
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn delete_client(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
        client_id: &ClientId,
    ) -> AppResult<()> {
        self.gate.require_admin(&ctx.user_id, org).await?;

        if self.store.find_client(org, client_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Client {client_id} not found in organization {org}"
            )));
        }

        self.authorization.delete_client(client_id).await?;
        self.store.delete_client(org, client_id).await?;
        info!(client_id = %client_id, org_id = %org, actor = %ctx.user_id, "Machine client deleted");
        Ok(())
    }

    /// Introspect a token on behalf of `org`. Requires membership.
    ///
    /// Tokens issued to clients of other organizations are reported
    /// inactive.
    pub async fn introspect(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
        token: &str,
    ) -> AppResult<TokenIntrospection> {
        self.gate.require_member(&ctx.user_id, org).await?;

        if token.trim().is_empty() {
            return Err(AppError::validation("Token cannot be empty"));
        }

        let result = self.authorization.introspect(token).await?;
        if !result.active {
            return Ok(TokenIntrospection::inactive());
        }

        let Some(client_id) = result.client_id.as_deref() else {
            return Ok(TokenIntrospection::inactive());
        };
        let owned = self
            .store
            .find_client(org, &ClientId::new(client_id))
            .await?
            .is_some();

        Ok(if owned {
            result
        } else {
            TokenIntrospection::inactive()
        })
    }
}
