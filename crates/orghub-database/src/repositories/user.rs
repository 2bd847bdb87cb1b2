//! User repository implementation.

use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};

use orghub_core::error::AppError;
use orghub_core::result::AppResult;
use orghub_core::types::SubjectId;
use orghub_entity::organization::NewOrganization;
use orghub_entity::user::{ProfileUpsert, UpdateProfile, User};

use super::organization::{insert_organization, insert_owner_link};
use crate::store::Registration;

const UPSERT_PROFILE: &str = r#"
    INSERT INTO users (id, email, display_name, locale, timezone,
                       can_create_organizations, last_login_at)
    VALUES ($1, $2, $3, $4, $5, $6, CASE WHEN $7 THEN NOW() ELSE NULL END)
    ON CONFLICT (id) DO UPDATE SET
        email         = COALESCE(EXCLUDED.email, users.email),
        display_name  = COALESCE(EXCLUDED.display_name, users.display_name),
        locale        = COALESCE(EXCLUDED.locale, users.locale),
        timezone      = COALESCE(EXCLUDED.timezone, users.timezone),
        last_login_at = CASE WHEN $7 THEN NOW() ELSE users.last_login_at END,
        updated_at    = NOW()
    RETURNING *
"#;

/// Repository for the `users` table.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by subject id.
    pub async fn find_by_id(&self, id: &SubjectId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::storage("Failed to find user by id", e))
    }

    /// Insert or refresh the cached profile.
    pub async fn upsert_profile(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
        mark_login: bool,
    ) -> AppResult<User> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::storage("Failed to acquire connection", e))?;
        upsert(&mut conn, profile, default_can_create, mark_login).await
    }

    /// Insert a stub row if the subject is unknown.
    pub async fn ensure_exists(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
    ) -> AppResult<User> {
        sqlx::query(
            "INSERT INTO users (id, email, display_name, can_create_organizations) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (id) DO NOTHING",
        )
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(default_can_create)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to insert user stub", e))?;

        self.find_by_id(&profile.id)
            .await?
            .ok_or_else(|| AppError::user_not_found(format!("User {} not found", profile.id)))
    }

    /// Upsert a freshly registered user and, when the table was empty,
    /// bootstrap their organization in the same transaction.
    pub async fn register(
        &self,
        profile: &ProfileUpsert,
        default_can_create: bool,
        bootstrap: &NewOrganization,
    ) -> AppResult<Registration> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::storage("Failed to begin transaction", e))?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::storage("Failed to count users", e))?;
        let first_user = existing == 0;

        let user = upsert(&mut tx, profile, default_can_create || first_user, false).await?;

        let bootstrap_organization = if first_user {
            match insert_organization(&mut tx, &user.id, bootstrap).await? {
                Some(org) => {
                    insert_owner_link(&mut tx, &org.id, &user.id).await?;
                    info!(user_id = %user.id, org_id = %org.id, name = %org.name, "Bootstrapped first organization");
                    Some(org)
                }
                None => {
                    warn!(name = %bootstrap.name, "Bootstrap organization name already taken; skipping");
                    None
                }
            }
        } else {
            None
        };

        tx.commit()
            .await
            .map_err(|e| AppError::storage("Failed to commit registration", e))?;

        Ok(Registration {
            user,
            bootstrap_organization,
        })
    }

    /// Apply user-editable profile changes.
    pub async fn update_profile(&self, id: &SubjectId, changes: &UpdateProfile) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                display_name = COALESCE($2, display_name),
                locale       = COALESCE($3, locale),
                timezone     = COALESCE($4, timezone),
                theme        = COALESCE($5, theme),
                updated_at   = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.display_name)
        .bind(&changes.locale)
        .bind(&changes.timezone)
        .bind(&changes.theme)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to update user profile", e))?
        .ok_or_else(|| AppError::user_not_found(format!("User {id} not found")))
    }
}

async fn upsert(
    conn: &mut PgConnection,
    profile: &ProfileUpsert,
    can_create: bool,
    mark_login: bool,
) -> AppResult<User> {
    sqlx::query_as::<_, User>(UPSERT_PROFILE)
        .bind(&profile.id)
        .bind(&profile.email)
        .bind(&profile.display_name)
        .bind(&profile.locale)
        .bind(&profile.timezone)
        .bind(can_create)
        .bind(mark_login)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::storage("Failed to upsert user profile", e))
}
