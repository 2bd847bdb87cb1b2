//! Membership-based access checks.
//!
//! Each check reads the organization's owner and the caller's role in one
//! store call. Results are never cached.

use std::sync::Arc;

use tracing::debug;

use orghub_core::error::{AppError, ErrorKind};
use orghub_core::result::AppResult;
use orghub_core::types::{OrganizationId, SubjectId};
use orghub_database::OrganizationStore;
use orghub_entity::membership::AccessSnapshot;

/// Answers "may this user act on this organization" questions.
#[derive(Debug, Clone)]
pub struct AccessGate {
    store: Arc<dyn OrganizationStore>,
}

impl AccessGate {
    /// Creates a new gate over the given store.
    pub fn new(store: Arc<dyn OrganizationStore>) -> Self {
        Self { store }
    }

    async fn snapshot(&self, org: &OrganizationId, user: &SubjectId) -> AppResult<AccessSnapshot> {
        self.store
            .access_snapshot(org, user)
            .await?
            .ok_or_else(|| AppError::organization_not_found(format!("Organization {org} not found")))
    }

    /// Whether `user` belongs to `org` in any role.
    pub async fn is_member(&self, user: &SubjectId, org: &OrganizationId) -> AppResult<bool> {
        Ok(self.snapshot(org, user).await?.is_member(user))
    }

    /// Whether `user` is an admin or the owner of `org`.
    pub async fn is_admin(&self, user: &SubjectId, org: &OrganizationId) -> AppResult<bool> {
        Ok(self.snapshot(org, user).await?.is_admin(user))
    }

    /// Whether `user` owns `org`.
    pub async fn is_owner(&self, user: &SubjectId, org: &OrganizationId) -> AppResult<bool> {
        Ok(self.snapshot(org, user).await?.is_owner(user))
    }

    /// Require membership; returns the snapshot for further decisions.
    pub async fn require_member(
        &self,
        user: &SubjectId,
        org: &OrganizationId,
    ) -> AppResult<AccessSnapshot> {
        let snap = self.snapshot(org, user).await?;
        if !snap.is_member(user) {
            debug!(user_id = %user, org_id = %org, "Denied: not a member");
            return Err(AppError::new(
                ErrorKind::ForbiddenNotMember,
                "You are not a member of this organization",
            ));
        }
        Ok(snap)
    }

    /// Require admin or owner.
    pub async fn require_admin(
        &self,
        user: &SubjectId,
        org: &OrganizationId,
    ) -> AppResult<AccessSnapshot> {
        let snap = self.snapshot(org, user).await?;
        if !snap.is_admin(user) {
            debug!(user_id = %user, org_id = %org, "Denied: not an admin");
            return Err(AppError::new(
                ErrorKind::ForbiddenNotAdmin,
                "Administrator role required",
            ));
        }
        Ok(snap)
    }

    /// Require ownership.
    pub async fn require_owner(
        &self,
        user: &SubjectId,
        org: &OrganizationId,
    ) -> AppResult<AccessSnapshot> {
        let snap = self.snapshot(org, user).await?;
        if !snap.is_owner(user) {
            debug!(user_id = %user, org_id = %org, "Denied: not the owner");
            return Err(AppError::new(
                ErrorKind::ForbiddenNotOwner,
                "Only the organization owner can do this",
            ));
        }
        Ok(snap)
    }
}
