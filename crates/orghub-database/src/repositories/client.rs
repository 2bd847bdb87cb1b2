//! Machine client repository implementation.

use sqlx::PgPool;

use orghub_core::error::AppError;
use orghub_core::result::AppResult;
use orghub_core::types::{ClientId, OrganizationId};
use orghub_entity::client::MachineClient;

/// Repository for the `oauth2_clients` table.
#[derive(Debug, Clone)]
pub struct MachineClientRepository {
    pool: PgPool,
}

impl MachineClientRepository {
    /// Create a new machine client repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record a registered client.
    pub async fn create(&self, client: &MachineClient) -> AppResult<MachineClient> {
        sqlx::query_as::<_, MachineClient>(
            r#"
            INSERT INTO oauth2_clients (client_id, organization_id, name, scopes, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(&client.client_id)
        .bind(client.organization_id)
        .bind(&client.name)
        .bind(&client.scopes)
        .bind(&client.created_by)
        .bind(client.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::conflict(format!("Client {} is already registered", client.client_id))
            }
            other => AppError::storage("Failed to insert machine client", other),
        })
    }

    /// List an organization's clients, newest first.
    pub async fn find_by_organization(&self, org: &OrganizationId) -> AppResult<Vec<MachineClient>> {
        sqlx::query_as::<_, MachineClient>(
            "SELECT * FROM oauth2_clients WHERE organization_id = $1 ORDER BY created_at DESC",
        )
        .bind(org)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to list machine clients", e))
    }

    /// Find a client scoped to its organization.
    pub async fn find(
        &self,
        org: &OrganizationId,
        client_id: &ClientId,
    ) -> AppResult<Option<MachineClient>> {
        sqlx::query_as::<_, MachineClient>(
            "SELECT * FROM oauth2_clients WHERE organization_id = $1 AND client_id = $2",
        )
        .bind(org)
        .bind(client_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::storage("Failed to find machine client", e))
    }

    /// Delete a client record scoped to its organization.
    pub async fn delete(&self, org: &OrganizationId, client_id: &ClientId) -> AppResult<bool> {
        let result =
            sqlx::query("DELETE FROM oauth2_clients WHERE organization_id = $1 AND client_id = $2")
                .bind(org)
                .bind(client_id)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::storage("Failed to delete machine client", e))?;
        Ok(result.rows_affected() > 0)
    }
}
