//! PostgreSQL-backed [`OrganizationStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use orghub_core::config::ReinvitePolicy;
use orghub_core::error::AppError;
use orghub_core::result::AppResult;
use orghub_core::types::{ClientId, OrganizationId, SubjectId};
use orghub_entity::client::MachineClient;
use orghub_entity::membership::{AccessSnapshot, MemberProfile, MemberRole, Membership};
use orghub_entity::organization::{
    NewOrganization, Organization, OrganizationChanges, OrganizationWithRole,
};
use orghub_entity::user::{ProfileUpsert, UpdateProfile, User};

use super::{OrganizationStore, Registration};
use crate::repositories::{
    MachineClientRepository, MembershipRepository, OrganizationRepository, UserRepository,
};

/// Store that delegates to the per-table repositories.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
    users: UserRepository,
    organizations: OrganizationRepository,
    memberships: MembershipRepository,
    clients: MachineClientRepository,
}

impl PgStore {
    /// Build the store and its repositories over one pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            organizations: OrganizationRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            clients: MachineClientRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl OrganizationStore for PgStore {
    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage("Database health check failed", e))?;
        Ok(())
    }

    async fn find_user(&self, id: &SubjectId) -> AppResult<Option<User>> {
        self.users.find_by_id(id).await
    }

    async fn upsert_profile(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
        mark_login: bool,
    ) -> AppResult<User> {
        self.users
            .upsert_profile(profile, default_can_create, mark_login)
            .await
    }

    async fn ensure_user(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
    ) -> AppResult<User> {
        self.users.ensure_exists(profile, default_can_create).await
    }

    async fn register_user(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
        bootstrap: &NewOrganization,
    ) -> AppResult<Registration> {
        self.users
            .register(profile, default_can_create, bootstrap)
            .await
    }

    async fn update_profile(&self, id: &SubjectId, changes: &UpdateProfile) -> AppResult<User> {
        self.users.update_profile(id, changes).await
    }

    async fn create_organization(
        &self,
        owner: &SubjectId,
        new: &NewOrganization,
    ) -> AppResult<Organization> {
        self.organizations.create_with_owner(owner, new).await
    }

    async fn find_organization(&self, id: &OrganizationId) -> AppResult<Option<Organization>> {
        self.organizations.find_by_id(id).await
    }

    async fn list_organizations_for(
        &self,
        user: &SubjectId,
    ) -> AppResult<Vec<OrganizationWithRole>> {
        self.organizations.find_for_user(user).await
    }

    async fn update_organization(
        &self,
        id: &OrganizationId,
        changes: &OrganizationChanges,
    ) -> AppResult<Organization> {
        self.organizations.update(id, changes).await
    }

    async fn delete_organization(&self, id: &OrganizationId) -> AppResult<bool> {
        self.organizations.delete(id).await
    }

    async fn transfer_ownership(
        &self,
        id: &OrganizationId,
        current_owner: &SubjectId,
        new_owner: &SubjectId,
    ) -> AppResult<Organization> {
        self.organizations
            .transfer_ownership(id, current_owner, new_owner)
            .await
    }

    async fn access_snapshot(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
    ) -> AppResult<Option<AccessSnapshot>> {
        self.memberships.access_snapshot(org, user).await
    }

    async fn find_membership(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
    ) -> AppResult<Option<Membership>> {
        self.memberships.find(org, user).await
    }

    async fn list_members(&self, org: &OrganizationId) -> AppResult<Vec<MemberProfile>> {
        self.memberships.find_members(org).await
    }

    async fn upsert_membership(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        role: MemberRole,
        policy: ReinvitePolicy,
    ) -> AppResult<Membership> {
        self.memberships.upsert(org, user, role, policy).await
    }

    async fn update_member_role(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        role: MemberRole,
    ) -> AppResult<Membership> {
        self.memberships.update_role(org, user, role).await
    }

    async fn remove_membership(&self, org: &OrganizationId, user: &SubjectId) -> AppResult<()> {
        self.memberships.remove(org, user).await
    }

    async fn insert_client(&self, client: &MachineClient) -> AppResult<MachineClient> {
        self.clients.create(client).await
    }

    async fn list_clients(&self, org: &OrganizationId) -> AppResult<Vec<MachineClient>> {
        self.clients.find_by_organization(org).await
    }

    async fn find_client(
        &self,
        org: &OrganizationId,
        client_id: &ClientId,
    ) -> AppResult<Option<MachineClient>> {
        self.clients.find(org, client_id).await
    }

    async fn delete_client(&self, org: &OrganizationId, client_id: &ClientId) -> AppResult<bool> {
        self.clients.delete(org, client_id).await
    }
}
