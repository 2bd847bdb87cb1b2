//! Membership repository implementation.

use sqlx::PgPool;

use orghub_core::config::ReinvitePolicy;
use orghub_core::error::{AppError, ErrorKind};
use orghub_core::result::AppResult;
use orghub_core::types::{OrganizationId, SubjectId};
use orghub_entity::membership::{AccessSnapshot, MemberProfile, MemberRole, Membership};

/// Repository for `user_organization_links`.
///
/// None of these methods write the `owner` role; they reject owner targets.
#[derive(Debug, Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    /// Create a new membership repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Read `owner_id` and the user's role with a single joined query.
    pub async fn access_snapshot(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
    ) -> AppResult<Option<AccessSnapshot>> {
        sqlx::query_as::<_, AccessSnapshot>(
            r#"
            SELECT o.owner_id, l.role
            FROM organizations o
            LEFT JOIN user_organization_links l
                   ON l.organization_id = o.id AND l.user_id = $2
            WHERE o.id = $1
            "#,
        )
        .bind(org)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to read access snapshot", e))
    }

    /// Find a membership row.
    pub async fn find(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
    ) -> AppResult<Option<Membership>> {
        sqlx::query_as::<_, Membership>(
            "SELECT * FROM user_organization_links WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(org)
        .bind(user)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to find membership", e))
    }

    /// List members with their cached profile.
    pub async fn find_members(&self, org: &OrganizationId) -> AppResult<Vec<MemberProfile>> {
        sqlx::query_as::<_, MemberProfile>(
            r#"
            SELECT l.user_id, u.email, u.display_name, l.role, l.joined_at
            FROM user_organization_links l
            JOIN users u ON u.id = l.user_id
            WHERE l.organization_id = $1
            ORDER BY l.joined_at, l.user_id
            "#,
        )
        .bind(org)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to list members", e))
    }

    /// Insert a membership or apply `policy` to an existing one.
    pub async fn upsert(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        role: MemberRole,
        policy: ReinvitePolicy,
    ) -> AppResult<Membership> {
        reject_owner_role(role)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::storage("Failed to begin transaction", e))?;

        let existing: Option<MemberRole> = sqlx::query_scalar(
            "SELECT role FROM user_organization_links \
             WHERE organization_id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(org)
        .bind(user)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::storage("Failed to read membership", e))?;

        match existing {
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

        let membership = sqlx::query_as::<_, Membership>(
            r#"
            INSERT INTO user_organization_links (user_id, organization_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, organization_id) DO UPDATE
                SET role = EXCLUDED.role, joined_at = NOW()
                WHERE user_organization_links.role <> 'owner'
            RETURNING *
            "#,
        )
        .bind(user)
        .bind(org)
        .bind(role)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::organization_not_found(format!("Organization {org} not found"))
            }
            other => AppError::storage("Failed to upsert membership", other),
        })?
        .ok_or_else(|| {
            AppError::new(
                ErrorKind::ForbiddenOwnerDemotion,
                "The owner's membership cannot be changed by an invite",
            )
        })?;

        tx.commit()
            .await
            .map_err(|e| AppError::storage("Failed to commit membership", e))?;

        Ok(membership)
    }

    /// Change a non-owner member's role.
    pub async fn update_role(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        role: MemberRole,
    ) -> AppResult<Membership> {
        reject_owner_role(role)?;

        let updated = sqlx::query_as::<_, Membership>(
            "UPDATE user_organization_links SET role = $3 \
             WHERE organization_id = $1 AND user_id = $2 AND role <> 'owner' \
             RETURNING *",
        )
        .bind(org)
        .bind(user)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to update member role", e))?;

        match updated {
            Some(membership) => Ok(membership),
            None => Err(self.explain_untouched(org, user, ErrorKind::ForbiddenOwnerDemotion).await),
        }
    }

    /// Delete a non-owner membership.
    pub async fn remove(&self, org: &OrganizationId, user: &SubjectId) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM user_organization_links \
             WHERE organization_id = $1 AND user_id = $2 AND role <> 'owner'",
        )
        .bind(org)
        .bind(user)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to remove member", e))?;

        if result.rows_affected() > 0 {
            Ok(())
        } else {
            Err(self.explain_untouched(org, user, ErrorKind::ForbiddenOwnerRemoval).await)
        }
    }

    /// A guarded write matched no row: either there is no membership, or it
    /// is the owner's.
    async fn explain_untouched(
        &self,
        org: &OrganizationId,
        user: &SubjectId,
        owner_kind: ErrorKind,
    ) -> AppError {
        match self.find(org, user).await {
            Ok(Some(_)) => AppError::new(owner_kind, "The organization owner cannot be modified"),
            Ok(None) => AppError::member_not_found(format!(
                "User {user} is not a member of organization {org}"
            )),
            Err(e) => e,
        }
    }
}

fn reject_owner_role(role: MemberRole) -> AppResult<()> {
    if role.is_owner() {
        return Err(AppError::new(
            ErrorKind::InvalidRole,
            "The owner role can only be assigned through an ownership transfer",
        ));
    }
    Ok(())
}
