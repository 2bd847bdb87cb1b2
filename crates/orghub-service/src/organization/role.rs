//! Role transitions, including ownership transfer.
//!
//! This is the only path that moves the `owner` role. Plain role changes go
//! through the store's guarded update, which refuses owner rows and the
//! owner role; a change *to* owner becomes a transactional transfer.

use std::sync::Arc;

use tracing::{info, instrument};

use orghub_auth::AccessGate;
use orghub_core::error::{AppError, ErrorKind};
use orghub_core::result::AppResult;
use orghub_core::types::{OrganizationId, SubjectId};
use orghub_database::OrganizationStore;
use orghub_entity::membership::{MemberRole, Membership};

use crate::context::RequestContext;

/// Changes members' roles.
#[derive(Debug, Clone)]
pub struct RoleService {
    store: Arc<dyn OrganizationStore>,
    gate: Arc<AccessGate>,
}

impl RoleService {
    /// Creates a new role service.
    pub fn new(store: Arc<dyn OrganizationStore>, gate: Arc<AccessGate>) -> Self {
        Self { store, gate }
    }

    /// Set `target`'s role in `org`.
    ///
    /// Setting `owner` transfers ownership from the caller, who must be the
    /// current owner and becomes an admin. The current owner cannot be given
    /// any other role. `new_role` is parsed only once the caller has passed
    /// the admin check.
    #[instrument(skip(self, ctx), fields(user_id = %ctx.user_id))]
    pub async fn set_role(
        &self,
        ctx: &RequestContext,
        org: &OrganizationId,
        target: &SubjectId,
        new_role: &str,
    ) -> AppResult<Membership> {
        let actor = &ctx.user_id;
        let snapshot = self.gate.require_admin(actor, org).await?;
        let new_role: MemberRole = new_role.parse()?;

        let current = self
            .store
            .find_membership(org, target)
            .await?
            .ok_or_else(|| {
                AppError::member_not_found(format!(
                    "User {target} is not a member of organization {org}"
                ))
            })?;

        let target_is_owner =
            current.role.is_owner() || snapshot.owner_id.as_ref() == Some(target);

        match (target_is_owner, new_role) {
            (true, MemberRole::Owner) => Ok(current),
            (true, _) => Err(AppError::new(
                ErrorKind::ForbiddenOwnerDemotion,
                "The owner can only be changed by transferring ownership to another member",
            )),
            (false, MemberRole::Owner) => {
                if !snapshot.is_owner(actor) {
                    return Err(AppError::new(
                        ErrorKind::ForbiddenNotOwner,
                        "Only the owner can transfer ownership",
                    ));
                }
                self.store.transfer_ownership(org, actor, target).await?;
                info!(org_id = %org, from = %actor, to = %target, "Ownership transferred");
                self.store
                    .find_membership(org, target)
                    .await?
                    .ok_or_else(|| AppError::internal("Membership vanished after transfer"))
            }
            (false, role) => {
                let updated = self.store.update_member_role(org, target, role).await?;
                info!(org_id = %org, member = %target, role = %role, actor = %actor, "Member role changed");
                Ok(updated)
            }
        }
    }
}
