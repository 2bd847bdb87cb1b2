//! Organization lifecycle: create, read, update, delete, and membership
//! administration short of role changes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use orghub_auth::{AccessGate, AuthorizationServer, IdentityProvider};
use orghub_core::config::OrganizationsConfig;
use orghub_core::error::{AppError, ErrorKind};
use orghub_core::result::AppResult;
use orghub_core::types::{OrganizationId, SubjectId};
use orghub_database::OrganizationStore;
use orghub_entity::membership::{MemberProfile, MemberRole, Membership};
use orghub_entity::organization::{
    NewOrganization, Organization, OrganizationChanges, OrganizationType, OrganizationWithRole,
};
use orghub_entity::user::ProfileUpsert;

use crate::context::RequestContext;
use crate::validate;

/// Data for creating an organization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    /// Organization name.
    pub name: String,
    /// Organization type.
    pub org_type: OrganizationType,
    /// Optional description.
    pub description: Option<String>,
    /// Optional metadata object.
    pub metadata: Option<serde_json::Value>,
}

/// Data for updating an organization. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganizationRequest {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New type.
    pub org_type: Option<OrganizationType>,
    /// Replacement metadata object.
    pub metadata: Option<serde_json::Value>,
}

/// Data for inviting a member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMemberRequest {
    /// Email the invitee is registered with at the identity provider.
    pub email: String,
    /// Role to grant, as requested; never `owner`.
    pub role: String,
}

/// Organization lifecycle operations.
#[derive(Debug, Clone)]
pub struct OrganizationService {
    store: Arc<dyn OrganizationStore>,
    gate: Arc<AccessGate>,
    identity: Arc<dyn IdentityProvider>,
    authorization: Arc<dyn AuthorizationServer>,
    config: OrganizationsConfig,
}

impl OrganizationService {
    /// Creates a new organization service.
    pub fn new(
        store: Arc<dyn OrganizationStore>,
        gate: Arc<AccessGate>,
        identity: Arc<dyn IdentityProvider>,
        authorization: Arc<dyn AuthorizationServer>,
        config: OrganizationsConfig,
    ) -> Self {
        Self {
            store,
            gate,
            identity,
            authorization,
            config,
        }
    }

    /// Create an organization owned by the caller.
    #[instrument(skip(self, ctx, req), fields(user_id = %ctx.user_id))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateOrganizationRequest,
    ) -> AppResult<Organization> {
        let allowed = self
            .store
            .find_user(&ctx.user_id)
            .await?
            .is_some_and(|u| u.can_create_organizations);
        if !allowed {
            return Err(AppError::new(
                ErrorKind::ForbiddenOrganizationCreation,
                "You are not allowed to create organizations",
            ));
        }

        let new = NewOrganization {
            org_type: req.org_type,
            name: validate::name("Organization name", &req.name)?,
            description: req.description,
            metadata: metadata_object(req.metadata)?.unwrap_or_else(|| serde_json::json!({})),
        };

        let org = self.store.create_organization(&ctx.user_id, &new).await?;
        info!(org_id = %org.id, name = %org.name, owner = %ctx.user_id, "Organization created");
        Ok(org)
    }

    /// Organizations the caller belongs to, with the caller's role.
    pub async fn list(&self, ctx: &RequestContext) -> AppResult<Vec<OrganizationWithRole>> {
        self.store.list_organizations_for(&ctx.user_id).await
    }

    /// Fetch one organization. Requires membership.
    pub async fn get(&self, ctx: &RequestContext, org: &OrganizationId) -> AppResult<Organization> {
        self.gate.require_member(&ctx.user_id, org).await?;
        self.find(org).await
    }

    /// Update name, description, type or metadata. Requires admin.
    #[instrument(skip(self, ctx, req), fields(user_id = %ctx.user_id))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
        req: UpdateOrganizationRequest,
    ) -> AppResult<Organization> {
        self.gate.require_admin(&ctx.user_id, org).await?;

        let changes = OrganizationChanges {
            name: req
                .name
                .map(|n| validate::name("Organization name", &n))
                .transpose()?,
            description: req.description,
            org_type: req.org_type,
            metadata: metadata_object(req.metadata)?,
        };

        if changes.is_empty() {
            return self.find(org).await;
        }

        let updated = self.store.update_organization(org, &changes).await?;
        info!(org_id = %org, actor = %ctx.user_id, "Organization updated");
        Ok(updated)
    }

    /// Delete an organization. Requires ownership; irreversible.
    ///
    /// The organization's machine clients are revoked at the authorization
    /// server first; a revocation failure is logged and does not block the
    /// deletion.
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn delete(&self, ctx: &RequestContext, org: &OrganizationId) -> AppResult<()> {
        self.gate.require_owner(&ctx.user_id, org).await?;

        for client in self.store.list_clients(org).await? {
            if let Err(e) = self.authorization.delete_client(&client.client_id).await {
                warn!(client_id = %client.client_id, org_id = %org, error = %e, "Failed to revoke machine client");
            }
        }

        if !self.store.delete_organization(org).await? {
            return Err(AppError::organization_not_found(format!(
                "Organization {org} not found"
            )));
        }
        info!(org_id = %org, actor = %ctx.user_id, "Organization deleted");
        Ok(())
    }

    /// Members with their cached profiles. Requires membership.
    pub async fn list_members(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
    ) -> AppResult<Vec<MemberProfile>> {
        self.gate.require_member(&ctx.user_id, org).await?;
        self.store.list_members(org).await
    }

    /// Invite a registered identity by email. Requires admin.
    #[instrument(skip(self, ctx, req), fields(user_id = %ctx.user_id, role = %req.role))]
    pub async fn add_member(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
        req: AddMemberRequest,
    ) -> AppResult<Membership> {
        self.gate.require_admin(&ctx.user_id, org).await?;

        let role: MemberRole = req.role.parse()?;
        if role.is_owner() {
            return Err(AppError::new(
                ErrorKind::InvalidRole,
                "Ownership can only be granted by transferring it",
            ));
        }

        let email = req.email.trim();
        if email.is_empty() {
            return Err(AppError::validation("Email cannot be empty"));
        }

        let identity = self
            .identity
            .find_identity_by_email(email)
            .await?
            .ok_or_else(|| AppError::user_not_found(format!("No user registered with {email}")))?;

        let stub = ProfileUpsert::stub(
            SubjectId::new(identity.id.clone()),
            identity.traits.email.clone().or_else(|| Some(email.to_string())),
            identity.traits.display_name(),
        );
        let user = self
            .store
            .ensure_user(&stub, self.config.default_can_create)
            .await?;

        let membership = self
            .store
            .upsert_membership(org, &user.id, role, self.config.reinvite_policy)
            .await?;

        info!(org_id = %org, member = %user.id, role = %membership.role, actor = %ctx.user_id, "Member added");
        Ok(membership)
    }

    /// Remove a non-owner member. Requires admin.
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn remove_member(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
        target: &SubjectId,
    ) -> AppResult<()> {
        self.gate.require_admin(&ctx.user_id, org).await?;
        self.store.remove_membership(org, target).await?;
        info!(org_id = %org, member = %target, actor = %ctx.user_id, "Member removed");
        Ok(())
    }

    async fn find(&self, org: &OrganizationId) -> AppResult<Organization> {
        self.store
            .find_organization(org)
            .await?
            .ok_or_else(|| AppError::organization_not_found(format!("Organization {org} not found")))
    }
}

/// Metadata must be a JSON object when given.
fn metadata_object(metadata: Option<serde_json::Value>) -> AppResult<Option<serde_json::Value>> {
    match metadata {
        Some(value) if !value.is_object() => {
            Err(AppError::validation("Metadata must be a JSON object"))
        }
        other => Ok(other),
    }
}
