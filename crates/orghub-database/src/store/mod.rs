//! The organization store abstraction.
//!
//! Every mutation that touches more than one row (organization creation,
//! ownership transfer, first-user bootstrap) is a single store call so that
//! each implementation can make it atomic. Owner rows and `owner_id` are
//! written only by those calls; the plain membership operations refuse to
//! touch them.

#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use orghub_core::config::ReinvitePolicy;
use orghub_core::result::AppResult;
use orghub_core::types::{ClientId, OrganizationId, SubjectId};
use orghub_entity::client::MachineClient;
use orghub_entity::membership::{AccessSnapshot, MemberProfile, MemberRole, Membership};
use orghub_entity::organization::{
    NewOrganization, Organization, OrganizationChanges, OrganizationWithRole,
};
use orghub_entity::user::{ProfileUpsert, UpdateProfile, User};

/// Result of syncing a newly registered identity.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Registration {
    /// The user row after the upsert.
    pub user: User,
    /// The bootstrap organization, when this was the first user and the
    /// bootstrap name was still free.
    pub bootstrap_organization: Option<Organization>,
}

/// Persistence for users, organizations, memberships and machine clients.
#[async_trait]
pub trait OrganizationStore: Send + Sync + std::fmt::Debug + 'static {
    /// Check that the backing store answers.
    async fn health_check(&self) -> AppResult<()>;

    // -- users --

    /// Find a user by subject id.
    async fn find_user(&self, id: &SubjectId) -> AppResult<Option<User>>;

    /// Insert or refresh a user's cached profile. New rows get
    /// `default_can_create`; existing rows keep their flag. When `mark_login`
    /// is set, `last_login_at` becomes now.
    async fn upsert_profile(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
        mark_login: bool,
    ) -> AppResult<User>;

    /// Insert a user row if none exists. Existing rows are left untouched.
    async fn ensure_user(&self, profile: &ProfileUpsert, default_can_create: bool)
    -> AppResult<User>;

    /// Sync a registration. If no user existed before this call, the user is
    /// granted organization creation and `bootstrap` is created with them as
    /// owner, all in one transaction.
    async fn register_user(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
        bootstrap: &NewOrganization,
    ) -> AppResult<Registration>;

    /// Apply user-editable profile changes.
    async fn update_profile(&self, id: &SubjectId, changes: &UpdateProfile) -> AppResult<User>;

    // -- organizations --

    /// Create an organization owned by `owner`, together with the owner's
    /// membership row.
    async fn create_organization(
        &self,
        owner: &SubjectId,
        new: &NewOrganization,
    ) -> AppResult<Organization>;

    /// Find an organization by id.
    async fn find_organization(&self, id: &OrganizationId) -> AppResult<Option<Organization>>;

    /// All organizations `user` belongs to, with their role, ordered by name.
    async fn list_organizations_for(&self, user: &SubjectId)
    -> AppResult<Vec<OrganizationWithRole>>;

    /// Update mutable organization fields.
    async fn update_organization(
        &self,
        id: &OrganizationId,
        changes: &OrganizationChanges,
    ) -> AppResult<Organization>;

    /// Delete an organization with its memberships and clients. Returns
    /// whether a row was deleted.
    async fn delete_organization(&self, id: &OrganizationId) -> AppResult<bool>;

    /// Atomically make `new_owner` the owner. Fails with `ForbiddenNotOwner`
    /// if `current_owner` no longer owns the organization when the row is
    /// locked, and with `MemberNotFound` if `new_owner` is not a member.
    async fn transfer_ownership(
        &self,
        id: &OrganizationId,
        current_owner: &SubjectId,
        new_owner: &SubjectId,
    ) -> AppResult<Organization>;

    // -- memberships --

    /// The organization's owner and the user's role, in one read. `None`
    /// when the organization does not exist.
    async fn access_snapshot(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
    ) -> AppResult<Option<AccessSnapshot>>;

    /// Find a single membership row.
    async fn find_membership(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
    ) -> AppResult<Option<Membership>>;

    /// Members of an organization with their cached profiles, oldest first.
    async fn list_members(&self, org: &OrganizationId) -> AppResult<Vec<MemberProfile>>;

    /// Add `user` with a non-owner `role`. An existing row is updated or
    /// rejected according to `policy`; an existing owner row is never
    /// touched.
    async fn upsert_membership(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        role: MemberRole,
        policy: ReinvitePolicy,
    ) -> AppResult<Membership>;

    /// Change a non-owner member to another non-owner role.
    async fn update_member_role(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        role: MemberRole,
    ) -> AppResult<Membership>;

    /// Remove a non-owner member.
    async fn remove_membership(&self, org: &OrganizationId, user: &SubjectId) -> AppResult<()>;

    // -- machine clients --

    /// Record a machine client registered with the authorization server.
    async fn insert_client(&self, client: &MachineClient) -> AppResult<MachineClient>;

    /// Machine clients belonging to an organization, newest first.
    async fn list_clients(&self, org: &OrganizationId) -> AppResult<Vec<MachineClient>>;

    /// Find a machine client within an organization.
    async fn find_client(
        &self,
        org: &OrganizationId,
        client_id: &ClientId,
    ) -> AppResult<Option<MachineClient>>;

    /// Delete a machine client record. Returns whether a row was deleted.
    async fn delete_client(&self, org: &OrganizationId, client_id: &ClientId) -> AppResult<bool>;
}
