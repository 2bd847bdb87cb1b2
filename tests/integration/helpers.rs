//! Shared test helpers for integration tests.
//!
//! The app runs over the in-memory store with a scripted identity provider
//! and authorization server, driven through `tower::ServiceExt::oneshot`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use orghub_auth::oauth2::{
    AuthorizationServer, ClientRegistration, RegisteredClient, TokenIntrospection,
};
use orghub_auth::provider::{
    IdentityProvider, IntrospectionError, ProviderIdentity, ProviderSession, Transport,
};
use orghub_core::config::AppConfig;
use orghub_core::result::AppResult;
use orghub_core::types::ClientId;
use orghub_database::MemoryStore;

/// Webhook key configured for every test app.
pub const WEBHOOK_KEY: &str = "hook-secret";

/// Session cookie name configured for every test app.
pub const COOKIE_NAME: &str = "ory_kratos_session";

/// Identity provider with sessions keyed by token and identities by email.
#[derive(Debug, Default)]
pub struct ScriptedIdentityProvider {
    sessions: Mutex<HashMap<String, ProviderIdentity>>,
    directory: Mutex<HashMap<String, ProviderIdentity>>,
    hang: AtomicBool,
}

impl ScriptedIdentityProvider {
    /// Register an identity reachable by `token` and by its email.
    pub fn add(&self, token: &str, identity: ProviderIdentity) {
        if let Some(email) = identity.traits.email.clone() {
            self.directory.lock().unwrap().insert(email, identity.clone());
        }
        self.sessions
            .lock()
            .unwrap()
            .insert(token.to_string(), identity);
    }

    /// Make every session lookup hang past the resolution budget.
    pub fn hang(&self) {
        self.hang.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn whoami(
        &self,
        token: &str,
        _transport: Transport,
    ) -> Result<ProviderSession, IntrospectionError> {
        if self.hang.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        let identity = self
            .sessions
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(IntrospectionError::Rejected)?;
        Ok(ProviderSession {
            id: Some(format!("session-{token}")),
            active: true,
            identity,
        })
    }

    async fn find_identity_by_email(&self, email: &str) -> AppResult<Option<ProviderIdentity>> {
        Ok(self.directory.lock().unwrap().get(email).cloned())
    }
}

/// Authorization server that issues sequential client ids.
#[derive(Debug, Default)]
pub struct ScriptedAuthorizationServer {
    issued: Mutex<Vec<ClientId>>,
    deleted: Mutex<Vec<ClientId>>,
    tokens: Mutex<HashMap<String, ClientId>>,
}

impl ScriptedAuthorizationServer {
    /// Make `token` introspect as active for `client`.
    pub fn issue_token(&self, token: &str, client: &str) {
        self.tokens
            .lock()
            .unwrap()
            .insert(token.to_string(), ClientId::new(client));
    }

    /// Whether `client` was deleted remotely.
    pub fn was_deleted(&self, client: &str) -> bool {
        self.deleted
            .lock()
            .unwrap()
            .iter()
            .any(|c| c.as_str() == client)
    }
}

#[async_trait]
impl AuthorizationServer for ScriptedAuthorizationServer {
    async fn create_client(&self, _registration: &ClientRegistration) -> AppResult<RegisteredClient> {
        let mut issued = self.issued.lock().unwrap();
        let client_id = ClientId::new(format!("client-{}", issued.len() + 1));
        issued.push(client_id.clone());
        Ok(RegisteredClient {
            client_id,
            client_secret: Some("s3cret".to_string()),
        })
    }

    async fn delete_client(&self, client_id: &ClientId) -> AppResult<()> {
        self.deleted.lock().unwrap().push(client_id.clone());
        Ok(())
    }

    async fn introspect(&self, token: &str) -> AppResult<TokenIntrospection> {
        Ok(match self.tokens.lock().unwrap().get(token) {
            Some(client) => TokenIntrospection {
                active: true,
                client_id: Some(client.to_string()),
                scope: Some("api".to_string()),
                ..Default::default()
            },
            None => TokenIntrospection::inactive(),
        })
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store, for fault injection and invariant checks
    pub store: Arc<MemoryStore>,
    /// Scripted identity provider
    pub identity: Arc<ScriptedIdentityProvider>,
    /// Scripted authorization server
    pub authorization: Arc<ScriptedAuthorizationServer>,
}

impl TestApp {
    /// Create a new test application over empty fakes.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.identity.session_timeout_ms = 300;
        config.identity.session_cookie_name = COOKIE_NAME.to_string();
        config.identity.webhook_api_key = Some(WEBHOOK_KEY.to_string());
        config.authorization_server.default_scopes = vec!["api".to_string()];

        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(ScriptedIdentityProvider::default());
        let authorization = Arc::new(ScriptedAuthorizationServer::default());

        let state = orghub_api::AppState::new(
            config,
            store.clone(),
            identity.clone(),
            authorization.clone(),
        )
        .expect("Failed to build app state");

        Self {
            router: orghub_api::build_app(state),
            store,
            identity,
            authorization,
        }
    }

    /// Token under which `id`'s session is known to the identity provider.
    pub fn token(id: &str) -> String {
        format!("tok-{id}")
    }

    /// Create an identity at the provider without syncing it to OrgHub.
    pub fn create_identity(&self, id: &str, email: &str, name: &str) -> Value {
        let identity = json!({
            "id": id,
            "traits": {"email": email, "name": name},
            "verifiable_addresses": [{"value": email, "verified": true, "via": "email"}],
        });
        self.identity.add(
            &Self::token(id),
            serde_json::from_value(identity.clone()).expect("valid identity"),
        );
        identity
    }

    /// Create an identity and deliver the after-registration webhook.
    pub async fn register(&self, id: &str, email: &str, name: &str) -> TestResponse {
        let identity = self.create_identity(id, email, name);
        self.hook("/api/hooks/after-registration", json!({ "identity": identity }), Some(WEBHOOK_KEY))
            .await
    }

    /// Deliver a webhook with an optional API key.
    pub async fn hook(&self, path: &str, body: Value, key: Option<&str>) -> TestResponse {
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if let Some(key) = key {
            headers.push(("X-Webhook-Key", key.to_string()));
        }
        self.send("POST", path, Some(body.to_string()), &headers).await
    }

    /// Make a JSON request as the holder of `token` (bearer).
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut headers = vec![("Content-Type", "application/json".to_string())];
        if let Some(token) = token {
            headers.push(("Authorization", format!("Bearer {token}")));
        }
        self.send(method, path, body.map(|b| b.to_string()), &headers)
            .await
    }

    /// Make a request with raw headers and body.
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: Option<String>,
        headers: &[(&str, String)],
    ) -> TestResponse {
        let mut req = Request::builder().method(method).uri(path);
        for (name, value) in headers {
            req = req.header(*name, value);
        }

        let req = req
            .body(Body::from(body.unwrap_or_default()))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success body.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }

    /// The stable error code of an error body.
    pub fn error_code(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }

    /// Assert the status and return self for chaining.
    #[track_caller]
    pub fn expect(self, status: StatusCode) -> Self {
        assert_eq!(self.status, status, "unexpected status, body: {}", self.body);
        self
    }
}
