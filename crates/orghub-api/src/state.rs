//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Duration;

use orghub_auth::{AccessGate, AuthorizationServer, IdentityProvider, SessionResolver};
use orghub_core::config::AppConfig;
use orghub_core::result::AppResult;
use orghub_database::OrganizationStore;
use orghub_service::{
    ClientService, IdentitySyncService, OrganizationService, RoleService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Persistence for users, organizations, memberships and clients
    pub store: Arc<dyn OrganizationStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// Turns presented credentials into a subject
    pub resolver: Arc<SessionResolver>,

    // ── Services ─────────────────────────────────────────────
    /// Organization lifecycle and membership administration
    pub organization_service: Arc<OrganizationService>,
    /// Role changes and ownership transfer
    pub role_service: Arc<RoleService>,
    /// Identity provider webhook handling
    pub sync_service: Arc<IdentitySyncService>,
    /// Caller profile
    pub user_service: Arc<UserService>,
    /// Machine client registry
    pub client_service: Arc<ClientService>,
}

impl AppState {
    /// Wire every service over the given store and external collaborators.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn OrganizationStore>,
        identity: Arc<dyn IdentityProvider>,
        authorization: Arc<dyn AuthorizationServer>,
    ) -> AppResult<Self> {
        let gate = Arc::new(AccessGate::new(Arc::clone(&store)));

        let resolver = Arc::new(SessionResolver::new(
            Arc::clone(&identity),
            Duration::from_millis(config.identity.session_timeout_ms),
        ));

        let organization_service = Arc::new(OrganizationService::new(
            Arc::clone(&store),
            Arc::clone(&gate),
            Arc::clone(&identity),
            Arc::clone(&authorization),
            config.organizations.clone(),
        ));
        let role_service = Arc::new(RoleService::new(Arc::clone(&store), Arc::clone(&gate)));
        let sync_service = Arc::new(IdentitySyncService::new(
            Arc::clone(&store),
            config.organizations.clone(),
            config.identity.webhook_api_key.clone(),
        )?);
        let user_service = Arc::new(UserService::new(Arc::clone(&store)));
        let client_service = Arc::new(ClientService::new(
            Arc::clone(&store),
            gate,
            authorization,
            config.authorization_server.default_scopes.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            store,
            resolver,
            organization_service,
            role_service,
            sync_service,
            user_service,
            client_service,
        })
    }
}
