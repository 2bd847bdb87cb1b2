//! Organization repository implementation.

use sqlx::{PgConnection, PgPool};
use tracing::info;

use orghub_core::error::{AppError, ErrorKind};
use orghub_core::result::AppResult;
use orghub_core::types::{OrganizationId, SubjectId};
use orghub_entity::membership::MemberRole;
use orghub_entity::organization::{
    NewOrganization, Organization, OrganizationChanges, OrganizationWithRole,
};

const NAME_CONSTRAINT: &str = "organizations_name_key";

/// Repository for the `organizations` table and the transactional paths
/// that keep `owner_id` in step with the owner membership row.
#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    /// Create a new organization repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an organization and its owner membership in one transaction.
    pub async fn create_with_owner(
        &self,
        owner: &SubjectId,
        new: &NewOrganization,
    ) -> AppResult<Organization> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::storage("Failed to begin transaction", e))?;

        let org = insert_organization(&mut tx, owner, new)
            .await?
            .ok_or_else(|| {
                AppError::conflict(format!("Organization name '{}' already exists", new.name))
            })?;
        insert_owner_link(&mut tx, &org.id, owner).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::storage("Failed to commit organization creation", e))?;

        Ok(org)
    }

    /// Find an organization by id.
    pub async fn find_by_id(&self, id: &OrganizationId) -> AppResult<Option<Organization>> {
        sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::storage("Failed to find organization", e))
    }

    /// List organizations a user belongs to, with the user's role.
    pub async fn find_for_user(&self, user: &SubjectId) -> AppResult<Vec<OrganizationWithRole>> {
        sqlx::query_as::<_, OrganizationWithRole>(
            r#"
            SELECT o.*, l.role
            FROM organizations o
            JOIN user_organization_links l ON l.organization_id = o.id
            WHERE l.user_id = $1
            ORDER BY o.name
            "#,
        )
        .bind(user)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to list organizations for user", e))
    }

    /// Update mutable fields. `owner_id` is not among them.
    pub async fn update(
        &self,
        id: &OrganizationId,
        changes: &OrganizationChanges,
    ) -> AppResult<Organization> {
        sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations SET
                name        = COALESCE($2, name),
                description = COALESCE($3, description),
                org_type    = COALESCE($4, org_type),
                metadata    = COALESCE($5, metadata),
                updated_at  = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.org_type)
        .bind(&changes.metadata)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_name_conflict(e, changes.name.as_deref().unwrap_or_default()))?
        .ok_or_else(|| AppError::organization_not_found(format!("Organization {id} not found")))
    }

    /// Delete an organization. Memberships and client records cascade.
    pub async fn delete(&self, id: &OrganizationId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::storage("Failed to delete organization", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Move ownership from `current_owner` to `new_owner`.
    ///
    /// The organization row is locked first and `current_owner` re-checked
    /// under the lock, so of two concurrent transfers only one succeeds.
    /// The previous owner row is demoted before the successor is promoted,
    /// which keeps the single-owner index satisfied at every statement.
    pub async fn transfer_ownership(
        &self,
        id: &OrganizationId,
        current_owner: &SubjectId,
        new_owner: &SubjectId,
    ) -> AppResult<Organization> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::storage("Failed to begin transaction", e))?;

        let locked: Option<Option<SubjectId>> =
            sqlx::query_scalar("SELECT owner_id FROM organizations WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| AppError::storage("Failed to lock organization", e))?;

        let Some(owner_id) = locked else {
            return Err(AppError::organization_not_found(format!(
                "Organization {id} not found"
            )));
        };
        if owner_id.as_ref() != Some(current_owner) {
            return Err(AppError::new(
                ErrorKind::ForbiddenNotOwner,
                "Only the current owner can transfer ownership",
            ));
        }

        let target: Option<MemberRole> = sqlx::query_scalar(
            "SELECT role FROM user_organization_links \
             WHERE organization_id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(new_owner)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::storage("Failed to read target membership", e))?;

        if target.is_none() {
            return Err(AppError::member_not_found(format!(
                "User {new_owner} is not a member of organization {id}"
            )));
        }

        sqlx::query(
            "UPDATE user_organization_links SET role = 'admin' \
             WHERE organization_id = $1 AND role = 'owner'",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::storage("Failed to demote previous owner", e))?;

        sqlx::query(
            "INSERT INTO user_organization_links (user_id, organization_id, role) \
             VALUES ($1, $2, 'admin') \
             ON CONFLICT (user_id, organization_id) DO UPDATE SET role = 'admin'",
        )
        .bind(current_owner)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::storage("Failed to demote previous owner", e))?;

        sqlx::query(
            "UPDATE user_organization_links SET role = 'owner' \
             WHERE organization_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(new_owner)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::storage("Failed to promote new owner", e))?;

        let org = sqlx::query_as::<_, Organization>(
            "UPDATE organizations SET owner_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_owner)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::storage("Failed to update organization owner", e))?;

        tx.commit()
            .await
            .map_err(|e| AppError::storage("Failed to commit ownership transfer", e))?;

        info!(org_id = %id, from = %current_owner, to = %new_owner, "Ownership transferred");
        Ok(org)
    }
}

/// Insert an organization row. Returns `None` when the name is taken.
pub(crate) async fn insert_organization(
    conn: &mut PgConnection,
    owner: &SubjectId,
    new: &NewOrganization,
) -> AppResult<Option<Organization>> {
    sqlx::query_as::<_, Organization>(
        r#"
        INSERT INTO organizations (id, org_type, name, description, metadata, owner_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT ON CONSTRAINT organizations_name_key DO NOTHING
        RETURNING *
        "#,
    )
    .bind(OrganizationId::new())
    .bind(new.org_type)
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.metadata)
    .bind(owner)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::storage("Failed to insert organization", e))
}

/// Insert the owner membership row for a new organization.
pub(crate) async fn insert_owner_link(
    conn: &mut PgConnection,
    org: &OrganizationId,
    owner: &SubjectId,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO user_organization_links (user_id, organization_id, role) \
         VALUES ($1, $2, 'owner')",
    )
    .bind(owner)
    .bind(org)
    .execute(&mut *conn)
    .await
    .map_err(|e| AppError::storage("Failed to insert owner membership", e))?;
    Ok(())
}

fn map_name_conflict(err: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.constraint() == Some(NAME_CONSTRAINT) {
            return AppError::conflict(format!("Organization name '{name}' already exists"));
        }
    }
    AppError::storage("Failed to update organization", err)
}
