//! Fakes and a wired-up service graph for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use orghub_auth::AccessGate;
use orghub_auth::oauth2::{
    AuthorizationServer, ClientRegistration, RegisteredClient, TokenIntrospection,
};
use orghub_auth::provider::{
    IdentityProvider, IdentityTraits, IntrospectionError, ProviderIdentity, ProviderSession,
    Transport,
};
use orghub_core::config::OrganizationsConfig;
use orghub_core::result::AppResult;
use orghub_core::types::{ClientId, OrganizationId, SubjectId};
use orghub_database::{MemoryStore, OrganizationStore};
use orghub_entity::membership::MemberRole;
use orghub_entity::organization::{NewOrganization, OrganizationType};
use orghub_entity::user::{ProfileUpsert, User};

use crate::{
    ClientService, IdentitySyncService, OrganizationService, RequestContext, RoleService,
    UserService,
};

/// Identity directory keyed by email. Sessions are never valid.
#[derive(Debug, Default)]
pub(crate) struct FakeDirectory {
    identities: Mutex<HashMap<String, ProviderIdentity>>,
}

#[async_trait]
impl IdentityProvider for FakeDirectory {
    async fn whoami(
        &self,
        _token: &str,
        _transport: Transport,
    ) -> Result<ProviderSession, IntrospectionError> {
        Err(IntrospectionError::Rejected)
    }

    async fn find_identity_by_email(&self, email: &str) -> AppResult<Option<ProviderIdentity>> {
        Ok(self.identities.lock().unwrap().get(email).cloned())
    }
}

#[derive(Debug, Default)]
struct FakeAuthState {
    issued: u32,
    last: Option<ClientId>,
    repeat_last: bool,
    deleted: Vec<ClientId>,
    tokens: HashMap<String, ClientId>,
}

/// Authorization server that hands out sequential client ids.
#[derive(Debug, Default)]
pub(crate) struct FakeAuthorizationServer {
    state: Mutex<FakeAuthState>,
}

impl FakeAuthorizationServer {
    /// Make the next registration reuse the previous client id.
    pub(crate) fn repeat_last_id(&self) {
        self.state.lock().unwrap().repeat_last = true;
    }

    pub(crate) fn issue_token(&self, token: &str, client: &ClientId) {
        self.state
            .lock()
            .unwrap()
            .tokens
            .insert(token.to_string(), client.clone());
    }

    pub(crate) fn was_deleted(&self, client: &ClientId) -> bool {
        self.state.lock().unwrap().deleted.contains(client)
    }

    pub(crate) fn deleted_count(&self) -> usize {
        self.state.lock().unwrap().deleted.len()
    }
}

#[async_trait]
impl AuthorizationServer for FakeAuthorizationServer {
    async fn create_client(&self, _registration: &ClientRegistration) -> AppResult<RegisteredClient> {
        let mut state = self.state.lock().unwrap();
        let client_id = match (state.repeat_last, state.last.clone()) {
            (true, Some(last)) => {
                state.repeat_last = false;
                last
            }
            _ => {
                state.issued += 1;
                ClientId::new(format!("client-{}", state.issued))
            }
        };
        state.last = Some(client_id.clone());
        Ok(RegisteredClient {
            client_id,
            client_secret: Some("secret".into()),
        })
    }

    async fn delete_client(&self, client_id: &ClientId) -> AppResult<()> {
        self.state.lock().unwrap().deleted.push(client_id.clone());
        Ok(())
    }

    async fn introspect(&self, token: &str) -> AppResult<TokenIntrospection> {
        let state = self.state.lock().unwrap();
        Ok(match state.tokens.get(token) {
            Some(client) => TokenIntrospection {
                active: true,
                client_id: Some(client.to_string()),
                scope: Some("api".into()),
                ..Default::default()
            },
            None => TokenIntrospection::inactive(),
        })
    }
}

/// All services wired over one in-memory store.
pub(crate) struct Harness {
    pub store: Arc<MemoryStore>,
    pub identity: Arc<FakeDirectory>,
    pub authorization: Arc<FakeAuthorizationServer>,
    pub organizations: OrganizationService,
    pub roles: RoleService,
    pub sync: IdentitySyncService,
    pub users: UserService,
    pub clients: ClientService,
}

impl Harness {
    pub(crate) async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(FakeDirectory::default());
        let authorization = Arc::new(FakeAuthorizationServer::default());
        let dyn_store: Arc<dyn OrganizationStore> = store.clone();
        let gate = Arc::new(AccessGate::new(dyn_store.clone()));
        let config = OrganizationsConfig::default();

        Self {
            organizations: OrganizationService::new(
                dyn_store.clone(),
                gate.clone(),
                identity.clone(),
                authorization.clone(),
                config.clone(),
            ),
            roles: RoleService::new(dyn_store.clone(), gate.clone()),
            sync: IdentitySyncService::new(dyn_store.clone(), config, None)
                .expect("default config is valid"),
            users: UserService::new(dyn_store.clone()),
            clients: ClientService::new(
                dyn_store,
                gate.clone(),
                authorization.clone(),
                vec!["api".to_string()],
            ),
            store,
            identity,
            authorization,
        }
    }

    pub(crate) fn ctx(&self, id: &str) -> RequestContext {
        RequestContext::for_user(SubjectId::new(id))
    }

    pub(crate) async fn user(&self, id: &str, can_create: bool) -> User {
        self.store
            .ensure_user(
                &ProfileUpsert::stub(SubjectId::new(id), Some(format!("{id}@example.com")), None),
                can_create,
            )
            .await
            .unwrap()
    }

    /// Register `email` in the identity directory under subject `id`.
    pub(crate) fn directory(&self, email: &str, id: &str) {
        self.identity.identities.lock().unwrap().insert(
            email.to_string(),
            ProviderIdentity {
                id: id.to_string(),
                traits: IdentityTraits {
                    email: Some(email.to_string()),
                    ..Default::default()
                },
                verifiable_addresses: Vec::new(),
            },
        );
    }

    pub(crate) async fn org_owned_by(&self, owner: &str, name: &str) -> OrganizationId {
        self.user(owner, true).await;
        self.store
            .create_organization(
                &SubjectId::new(owner),
                &NewOrganization {
                    org_type: OrganizationType::Team,
                    name: name.to_string(),
                    description: None,
                    metadata: serde_json::json!({}),
                },
            )
            .await
            .unwrap()
            .id
    }

    pub(crate) async fn add(&self, id: &str, org: &OrganizationId, role: MemberRole) {
        self.user(id, false).await;
        self.store
            .upsert_membership(org, &SubjectId::new(id), role, Default::default())
            .await
            .unwrap();
    }
}
