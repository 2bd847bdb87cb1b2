//! In-memory [`OrganizationStore`] for tests and single-process experiments.
//!
//! Multi-row operations stage their writes on a copy of the state and swap
//! it in only when every step succeeded, so an injected fault between steps
//! leaves no partial rows behind.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use orghub_core::config::ReinvitePolicy;
use orghub_core::error::{AppError, ErrorKind};
use orghub_core::result::AppResult;
use orghub_core::types::{ClientId, OrganizationId, SubjectId};
use orghub_entity::client::MachineClient;
use orghub_entity::membership::{AccessSnapshot, MemberProfile, MemberRole, Membership};
use orghub_entity::organization::{
    NewOrganization, Organization, OrganizationChanges, OrganizationWithRole,
};
use orghub_entity::user::{ProfileUpsert, UpdateProfile, User};

use super::{OrganizationStore, Registration};

#[derive(Debug, Clone, Default)]
struct InnerState {
    users: HashMap<SubjectId, User>,
    organizations: HashMap<OrganizationId, Organization>,
    memberships: HashMap<(OrganizationId, SubjectId), Membership>,
    clients: HashMap<ClientId, MachineClient>,
}

impl InnerState {
    fn name_taken(&self, name: &str, except: Option<&OrganizationId>) -> bool {
        self.organizations
            .values()
            .any(|o| o.name == name && Some(&o.id) != except)
    }

    fn upsert_user(
        &mut self,
        profile: &ProfileUpsert,
        can_create: bool,
        mark_login: bool,
    ) -> User {
        let now = Utc::now();
        let user = self
            .users
            .entry(profile.id.clone())
            .and_modify(|u| {
                if profile.email.is_some() {
                    u.email = profile.email.clone();
                }
                if profile.display_name.is_some() {
                    u.display_name = profile.display_name.clone();
                }
                if profile.locale.is_some() {
                    u.locale = profile.locale.clone();
                }
                if profile.timezone.is_some() {
                    u.timezone = profile.timezone.clone();
                }
                if mark_login {
                    u.last_login_at = Some(now);
                }
                u.updated_at = now;
            })
            .or_insert_with(|| User {
                id: profile.id.clone(),
                email: profile.email.clone(),
                display_name: profile.display_name.clone(),
                locale: profile.locale.clone(),
                timezone: profile.timezone.clone(),
                theme: None,
                can_create_organizations: can_create,
                created_at: now,
                updated_at: now,
                last_login_at: mark_login.then_some(now),
            });
        user.clone()
    }

    fn insert_organization(&mut self, owner: &SubjectId, new: &NewOrganization) -> Organization {
        let now = Utc::now();
        let org = Organization {
            id: OrganizationId::new(),
            org_type: new.org_type,
            name: new.name.clone(),
            description: new.description.clone(),
            metadata: new.metadata.clone(),
            owner_id: Some(owner.clone()),
            created_at: now,
            updated_at: now,
        };
        self.organizations.insert(org.id, org.clone());
        org
    }

    fn insert_owner_link(&mut self, org: &OrganizationId, owner: &SubjectId) {
        self.memberships.insert(
            (*org, owner.clone()),
            Membership {
                user_id: owner.clone(),
                organization_id: *org,
                role: MemberRole::Owner,
                joined_at: Utc::now(),
            },
        );
    }

    fn untouched_error(&self, org: &OrganizationId, user: &SubjectId, owner_kind: ErrorKind) -> AppError {
        match self.memberships.get(&(*org, user.clone())) {
            Some(_) => AppError::new(owner_kind, "The organization owner cannot be modified"),
            None => AppError::member_not_found(format!(
                "User {user} is not a member of organization {org}"
            )),
        }
    }
}

/// Mutex-guarded in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<InnerState>>,
    fail_next_create: Arc<AtomicBool>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next organization creation fail after the organization row
    /// was staged but before the owner membership was written.
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    /// Make every call fail with `StorageFailure` until reset.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of organizations currently stored.
    pub async fn organization_count(&self) -> usize {
        self.state.lock().await.organizations.len()
    }

    /// Number of membership rows currently stored.
    pub async fn membership_count(&self) -> usize {
        self.state.lock().await.memberships.len()
    }

    /// Check the ownership invariants over the whole state: each
    /// organization has at most one owner row, that row belongs to the user
    /// named by `owner_id`, and every row references existing records.
    pub async fn verify_invariants(&self) -> Result<(), String> {
        let state = self.state.lock().await;

        for org in state.organizations.values() {
            let owners: Vec<&SubjectId> = state
                .memberships
                .values()
                .filter(|m| m.organization_id == org.id && m.role.is_owner())
                .map(|m| &m.user_id)
                .collect();

            match (&org.owner_id, owners.as_slice()) {
                (None, []) => {}
                (Some(owner), [row_owner]) if owner == *row_owner => {}
                (owner, rows) => {
                    return Err(format!(
                        "organization {} has owner_id {:?} but owner rows {:?}",
                        org.id, owner, rows
                    ));
                }
            }
        }

        for m in state.memberships.values() {
            if !state.organizations.contains_key(&m.organization_id) {
                return Err(format!("membership references missing organization {}", m.organization_id));
            }
            if !state.users.contains_key(&m.user_id) {
                return Err(format!("membership references missing user {}", m.user_id));
            }
        }

        for c in state.clients.values() {
            if !state.organizations.contains_key(&c.organization_id) {
                return Err(format!("client {} references missing organization", c.client_id));
            }
        }

        Ok(())
    }

    fn check_available(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage(
                "Store is unavailable",
                std::io::Error::other("memory store marked unavailable"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl OrganizationStore for MemoryStore {
    async fn health_check(&self) -> AppResult<()> {
        self.check_available()
    }

    async fn find_user(&self, id: &SubjectId) -> AppResult<Option<User>> {
        self.check_available()?;
        Ok(self.state.lock().await.users.get(id).cloned())
    }

    async fn upsert_profile(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
        mark_login: bool,
    ) -> AppResult<User> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        Ok(state.upsert_user(profile, default_can_create, mark_login))
    }

    async fn ensure_user(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
    ) -> AppResult<User> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get(&profile.id) {
            return Ok(user.clone());
        }
        Ok(state.upsert_user(profile, default_can_create, false))
    }

    async fn register_user(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
        bootstrap: &NewOrganization,
    ) -> AppResult<Registration> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let mut staged = state.clone();

        let first_user = staged.users.is_empty();
        let user = staged.upsert_user(profile, default_can_create || first_user, false);

        let bootstrap_organization = if first_user {
            if staged.name_taken(&bootstrap.name, None) {
                warn!(name = %bootstrap.name, "Bootstrap organization name already taken; skipping");
                None
            } else {
                let org = staged.insert_organization(&user.id, bootstrap);
                staged.insert_owner_link(&org.id, &user.id);
                info!(user_id = %user.id, org_id = %org.id, "Bootstrapped first organization");
                Some(org)
            }
        } else {
            None
        };

        *state = staged;
        Ok(Registration {
            user,
            bootstrap_organization,
        })
    }

    async fn update_profile(&self, id: &SubjectId, changes: &UpdateProfile) -> AppResult<User> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let user = state
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::user_not_found(format!("User {id} not found")))?;

        if let Some(name) = &changes.display_name {
            user.display_name = Some(name.clone());
        }
        if let Some(locale) = &changes.locale {
            user.locale = Some(locale.clone());
        }
        if let Some(timezone) = &changes.timezone {
            user.timezone = Some(timezone.clone());
        }
        if let Some(theme) = &changes.theme {
            user.theme = Some(theme.clone());
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn create_organization(
        &self,
        owner: &SubjectId,
        new: &NewOrganization,
    ) -> AppResult<Organization> {
        self.check_available()?;
        let mut state = self.state.lock().await;

        if state.name_taken(&new.name, None) {
            return Err(AppError::conflict(format!(
                "Organization name '{}' already exists",
                new.name
            )));
        }

        let mut staged = state.clone();
        let org = staged.insert_organization(owner, new);

        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(AppError::storage(
                "Failed to insert owner membership",
                std::io::Error::other("injected failure"),
            ));
        }

        staged.insert_owner_link(&org.id, owner);
        *state = staged;
        Ok(org)
    }

    async fn find_organization(&self, id: &OrganizationId) -> AppResult<Option<Organization>> {
        self.check_available()?;
        Ok(self.state.lock().await.organizations.get(id).cloned())
    }

    async fn list_organizations_for(
        &self,
        user: &SubjectId,
    ) -> AppResult<Vec<OrganizationWithRole>> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut orgs: Vec<OrganizationWithRole> = state
            .memberships
            .values()
            .filter(|m| &m.user_id == user)
            .filter_map(|m| {
                state
                    .organizations
                    .get(&m.organization_id)
                    .map(|o| OrganizationWithRole {
                        organization: o.clone(),
                        role: m.role,
                    })
            })
            .collect();
        orgs.sort_by(|a, b| a.organization.name.cmp(&b.organization.name));
        Ok(orgs)
    }

    async fn update_organization(
        &self,
        id: &OrganizationId,
        changes: &OrganizationChanges,
    ) -> AppResult<Organization> {
        self.check_available()?;
        let mut state = self.state.lock().await;

        if let Some(name) = &changes.name {
            if state.name_taken(name, Some(id)) {
                return Err(AppError::conflict(format!(
                    "Organization name '{name}' already exists"
                )));
            }
        }

        let org = state
            .organizations
            .get_mut(id)
            .ok_or_else(|| AppError::organization_not_found(format!("Organization {id} not found")))?;

        if let Some(name) = &changes.name {
            org.name = name.clone();
        }
        if let Some(description) = &changes.description {
            org.description = Some(description.clone());
        }
        if let Some(org_type) = changes.org_type {
            org.org_type = org_type;
        }
        if let Some(metadata) = &changes.metadata {
            org.metadata = metadata.clone();
        }
        org.updated_at = Utc::now();
        Ok(org.clone())
    }

    async fn delete_organization(&self, id: &OrganizationId) -> AppResult<bool> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if state.organizations.remove(id).is_none() {
            return Ok(false);
        }
        state.memberships.retain(|(org, _), _| org != id);
        state.clients.retain(|_, c| &c.organization_id != id);
        Ok(true)
    }

    async fn transfer_ownership(
        &self,
        id: &OrganizationId,
        current_owner: &SubjectId,
        new_owner: &SubjectId,
    ) -> AppResult<Organization> {
        self.check_available()?;
        let mut state = self.state.lock().await;

        let org = state
            .organizations
            .get(id)
            .ok_or_else(|| AppError::organization_not_found(format!("Organization {id} not found")))?;
        if org.owner_id.as_ref() != Some(current_owner) {
            return Err(AppError::new(
                ErrorKind::ForbiddenNotOwner,
                "Only the current owner can transfer ownership",
            ));
        }
        if !state.memberships.contains_key(&(*id, new_owner.clone())) {
            return Err(AppError::member_not_found(format!(
                "User {new_owner} is not a member of organization {id}"
            )));
        }

        let mut staged = state.clone();
        let now = Utc::now();

        for m in staged.memberships.values_mut() {
            if &m.organization_id == id && m.role.is_owner() {
                m.role = MemberRole::Admin;
            }
        }
        staged
            .memberships
            .entry((*id, current_owner.clone()))
            .and_modify(|m| m.role = MemberRole::Admin)
            .or_insert_with(|| Membership {
                user_id: current_owner.clone(),
                organization_id: *id,
                role: MemberRole::Admin,
                joined_at: now,
            });
        if let Some(m) = staged.memberships.get_mut(&(*id, new_owner.clone())) {
            m.role = MemberRole::Owner;
        }

        let org = match staged.organizations.get_mut(id) {
            Some(org) => {
                org.owner_id = Some(new_owner.clone());
                org.updated_at = now;
                org.clone()
            }
            None => return Err(AppError::internal("Organization vanished during transfer")),
        };

        *state = staged;
        Ok(org)
    }

    async fn access_snapshot(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
    ) -> AppResult<Option<AccessSnapshot>> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.organizations.get(org).map(|o| AccessSnapshot {
            owner_id: o.owner_id.clone(),
            role: state.memberships.get(&(*org, user.clone())).map(|m| m.role),
        }))
    }

    async fn find_membership(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
    ) -> AppResult<Option<Membership>> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .memberships
            .get(&(*org, user.clone()))
            .cloned())
    }

    async fn list_members(&self, org: &OrganizationId) -> AppResult<Vec<MemberProfile>> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut members: Vec<MemberProfile> = state
            .memberships
            .values()
            .filter(|m| &m.organization_id == org)
            .map(|m| {
                let user = state.users.get(&m.user_id);
                MemberProfile {
                    user_id: m.user_id.clone(),
                    email: user.and_then(|u| u.email.clone()),
                    display_name: user.and_then(|u| u.display_name.clone()),
                    role: m.role,
                    joined_at: m.joined_at,
                }
            })
            .collect();
        members.sort_by(|a, b| {
            a.joined_at
                .cmp(&b.joined_at)
                .then_with(|| a.user_id.cmp(&b.user_id))
        });
        Ok(members)
    }

    async fn upsert_membership(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        role: MemberRole,
        policy: ReinvitePolicy,
    ) -> AppResult<Membership> {
        self.check_available()?;
        if role.is_owner() {
            return Err(AppError::new(
                ErrorKind::InvalidRole,
                "The owner role can only be assigned through an ownership transfer",
            ));
        }

        let mut state = self.state.lock().await;
        if !state.organizations.contains_key(org) {
            return Err(AppError::organization_not_found(format!(
                "Organization {org} not found"
            )));
        }

        let key = (*org, user.clone());
        match state.memberships.get(&key).map(|m| m.role) {
            Some(MemberRole::Owner) => {
                return Err(AppError::new(
                    ErrorKind::ForbiddenOwnerDemotion,
                    "The owner's membership cannot be changed by an invite",
                ));
            }
            Some(_) if policy == ReinvitePolicy::Reject => {
                return Err(AppError::new(
                    ErrorKind::AlreadyMember,
                    format!("User {user} is already a member"),
                ));
            }
            _ => {}
        }

        let membership = Membership {
            user_id: user.clone(),
            organization_id: *org,
            role,
            joined_at: Utc::now(),
        };
        state.memberships.insert(key, membership.clone());
        Ok(membership)
    }

    async fn update_member_role(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        role: MemberRole,
    ) -> AppResult<Membership> {
        self.check_available()?;
        if role.is_owner() {
            return Err(AppError::new(
                ErrorKind::InvalidRole,
                "The owner role can only be assigned through an ownership transfer",
            ));
        }

        let mut state = self.state.lock().await;
        match state.memberships.get_mut(&(*org, user.clone())) {
            Some(m) if !m.role.is_owner() => {
                m.role = role;
                Ok(m.clone())
            }
            _ => Err(state.untouched_error(org, user, ErrorKind::ForbiddenOwnerDemotion)),
        }
    }

    async fn remove_membership(&self, org: &OrganizationId, user: &SubjectId) -> AppResult<()> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let key = (*org, user.clone());
        match state.memberships.get(&key) {
            Some(m) if !m.role.is_owner() => {
                state.memberships.remove(&key);
                Ok(())
            }
            _ => Err(state.untouched_error(org, user, ErrorKind::ForbiddenOwnerRemoval)),
        }
    }

    async fn insert_client(&self, client: &MachineClient) -> AppResult<MachineClient> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        if state.clients.contains_key(&client.client_id) {
            return Err(AppError::conflict(format!(
                "Client {} is already registered",
                client.client_id
            )));
        }
        if !state.organizations.contains_key(&client.organization_id) {
            return Err(AppError::organization_not_found(format!(
                "Organization {} not found",
                client.organization_id
            )));
        }
        state.clients.insert(client.client_id.clone(), client.clone());
        Ok(client.clone())
    }

    async fn list_clients(&self, org: &OrganizationId) -> AppResult<Vec<MachineClient>> {
        self.check_available()?;
        let state = self.state.lock().await;
        let mut clients: Vec<MachineClient> = state
            .clients
            .values()
            .filter(|c| &c.organization_id == org)
            .cloned()
            .collect();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(clients)
    }

    async fn find_client(
        &self,
        org: &OrganizationId,
        client_id: &ClientId,
    ) -> AppResult<Option<MachineClient>> {
        self.check_available()?;
        Ok(self
            .state
            .lock()
            .await
            .clients
            .get(client_id)
            .filter(|c| &c.organization_id == org)
            .cloned())
    }

    async fn delete_client(&self, org: &OrganizationId, client_id: &ClientId) -> AppResult<bool> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let owned = state
            .clients
            .get(client_id)
            .is_some_and(|c| &c.organization_id == org);
        if owned {
            state.clients.remove(client_id);
        }
        Ok(owned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orghub_entity::organization::OrganizationType;

    fn subject(id: &str) -> SubjectId {
        SubjectId::new(id)
    }

    fn new_org(name: &str) -> NewOrganization {
        NewOrganization {
            org_type: OrganizationType::Team,
            name: name.to_string(),
            description: None,
            metadata: serde_json::json!({}),
        }
    }

    async fn seeded() -> (MemoryStore, OrganizationId) {
        let store = MemoryStore::new();
        for id in ["alice", "bob", "carol"] {
            store
                .ensure_user(&ProfileUpsert::stub(subject(id), None, None), true)
                .await
                .unwrap();
        }
        let org = store
            .create_organization(&subject("alice"), &new_org("Acme"))
            .await
            .unwrap();
        (store, org.id)
    }

    #[tokio::test]
    async fn test_create_writes_owner_row_and_owner_id() {
        let (store, org) = seeded().await;
        let m = store
            .find_membership(&org, &subject("alice"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(m.role, MemberRole::Owner);
        store.verify_invariants().await.unwrap();
    }

    #[tokio::test]
    async fn test_injected_create_failure_leaves_nothing() {
        let (store, _) = seeded().await;
        store.fail_next_create();
        let err = store
            .create_organization(&subject("bob"), &new_org("Widgets"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageFailure);
        assert_eq!(store.organization_count().await, 1);
        assert_eq!(store.membership_count().await, 1);
        store.verify_invariants().await.unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let (store, _) = seeded().await;
        let err = store
            .create_organization(&subject("bob"), &new_org("Acme"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_owner_row_is_protected() {
        let (store, org) = seeded().await;
        let err = store
            .remove_membership(&org, &subject("alice"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ForbiddenOwnerRemoval);

        let err = store
            .update_member_role(&org, &subject("alice"), MemberRole::Member)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ForbiddenOwnerDemotion);

        let err = store
            .upsert_membership(&org, &subject("alice"), MemberRole::Admin, ReinvitePolicy::UpdateRole)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::ForbiddenOwnerDemotion);
    }

    #[tokio::test]
    async fn test_reinvite_policy() {
        let (store, org) = seeded().await;
        store
            .upsert_membership(&org, &subject("bob"), MemberRole::Member, ReinvitePolicy::UpdateRole)
            .await
            .unwrap();
        let updated = store
            .upsert_membership(&org, &subject("bob"), MemberRole::Admin, ReinvitePolicy::UpdateRole)
            .await
            .unwrap();
        assert_eq!(updated.role, MemberRole::Admin);

        let err = store
            .upsert_membership(&org, &subject("bob"), MemberRole::Member, ReinvitePolicy::Reject)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::AlreadyMember);
    }

    #[tokio::test]
    async fn test_transfer_moves_both_records() {
        let (store, org) = seeded().await;
        store
            .upsert_membership(&org, &subject("bob"), MemberRole::Member, ReinvitePolicy::UpdateRole)
            .await
            .unwrap();

        let updated = store
            .transfer_ownership(&org, &subject("alice"), &subject("bob"))
            .await
            .unwrap();
        assert_eq!(updated.owner_id, Some(subject("bob")));

        let alice = store.find_membership(&org, &subject("alice")).await.unwrap().unwrap();
        let bob = store.find_membership(&org, &subject("bob")).await.unwrap().unwrap();
        assert_eq!(alice.role, MemberRole::Admin);
        assert_eq!(bob.role, MemberRole::Owner);
        store.verify_invariants().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_transfers_have_one_winner() {
        let (store, org) = seeded().await;
        for id in ["bob", "carol"] {
            store
                .upsert_membership(&org, &subject(id), MemberRole::Admin, ReinvitePolicy::UpdateRole)
                .await
                .unwrap();
        }

        let alice = subject("alice");
        let bob = subject("bob");
        let carol = subject("carol");
        let (a, b) = futures::join!(
            store.transfer_ownership(&org, &alice, &bob),
            store.transfer_ownership(&org, &alice, &carol),
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        let loser = outcomes.iter().find_map(|r| r.as_ref().err()).unwrap();
        assert_eq!(loser.kind, ErrorKind::ForbiddenNotOwner);
        store.verify_invariants().await.unwrap();
    }

    #[tokio::test]
    async fn test_register_bootstraps_only_first_user() {
        let store = MemoryStore::new();
        let first = store
            .register_user(
                &ProfileUpsert::stub(subject("alice"), None, Some("Alice".into())),
                false,
                &new_org("Alice's Organization"),
            )
            .await
            .unwrap();
        assert!(first.user.can_create_organizations);
        let org = first.bootstrap_organization.unwrap();
        assert_eq!(org.owner_id, Some(subject("alice")));

        let second = store
            .register_user(
                &ProfileUpsert::stub(subject("bob"), None, Some("Bob".into())),
                false,
                &new_org("Bob's Organization"),
            )
            .await
            .unwrap();
        assert!(!second.user.can_create_organizations);
        assert!(second.bootstrap_organization.is_none());
        assert_eq!(store.organization_count().await, 1);
        store.verify_invariants().await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let (store, org) = seeded().await;
        store
            .upsert_membership(&org, &subject("bob"), MemberRole::Member, ReinvitePolicy::UpdateRole)
            .await
            .unwrap();
        assert!(store.delete_organization(&org).await.unwrap());
        assert_eq!(store.membership_count().await, 0);
        assert!(store.access_snapshot(&org, &subject("bob")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_with_storage_error() {
        let (store, org) = seeded().await;
        store.set_unavailable(true);
        let err = store.find_organization(&org).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::StorageFailure);
    }
}
