//! User self-service operations: viewing and editing the cached profile.

use std::sync::Arc;

use tracing::info;

use orghub_core::error::AppError;
use orghub_core::result::AppResult;
use orghub_database::OrganizationStore;
use orghub_entity::user::{UpdateProfile, User};

use crate::context::RequestContext;
use crate::validate;

/// Handles user self-service operations.
#[derive(Debug, Clone)]
pub struct UserService {
    store: Arc<dyn OrganizationStore>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(store: Arc<dyn OrganizationStore>) -> Self {
        Self { store }
    }

    /// Gets the caller's profile.
    pub async fn get_profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.store
            .find_user(&ctx.user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found("User has not been synced yet"))
    }

    /// Updates the caller's editable profile fields.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        mut changes: UpdateProfile,
    ) -> AppResult<User> {
        if let Some(name) = changes.display_name.take() {
            changes.display_name = Some(validate::name("Display name", &name)?);
        }

        let user = self.store.update_profile(&ctx.user_id, &changes).await?;
        info!(user_id = %ctx.user_id, "Profile updated");
        Ok(user)
    }
}
