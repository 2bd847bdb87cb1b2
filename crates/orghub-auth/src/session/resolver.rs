//! Session resolver.
//!
//! Candidates are tried bearer first, then cookie. A candidate the provider
//! rejects moves resolution on to the next candidate; a malformed or
//! transient answer is retried once over the alternate transport. All
//! attempts share one deadline.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use orghub_core::error::AppError;
use orghub_core::result::AppResult;
use orghub_core::types::SubjectId;

use super::credential::PresentedCredentials;
use crate::provider::{IdentityProvider, IntrospectionError, ProviderSession};

/// An authenticated principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subject {
    /// Subject id issued by the identity provider.
    pub id: SubjectId,
    /// Primary email.
    pub email: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Verified addresses.
    pub verified_addresses: Vec<String>,
}

impl From<ProviderSession> for Subject {
    fn from(session: ProviderSession) -> Self {
        let identity = session.identity;
        Self {
            id: SubjectId::new(identity.id.clone()),
            email: identity.traits.email.clone(),
            display_name: identity.traits.display_name(),
            verified_addresses: identity.verified_addresses(),
        }
    }
}

/// Validates request credentials against the identity provider.
#[derive(Debug, Clone)]
pub struct SessionResolver {
    provider: Arc<dyn IdentityProvider>,
    budget: Duration,
}

impl SessionResolver {
    /// Create a resolver whose attempts share `budget`.
    pub fn new(provider: Arc<dyn IdentityProvider>, budget: Duration) -> Self {
        Self { provider, budget }
    }

    /// Resolve credentials to a subject.
    ///
    /// Fails with `NoCredential` when nothing was presented,
    /// `ProviderUnreachable` when the budget ran out or any attempt could
    /// not reach the provider, and `InvalidCredential` otherwise.
    pub async fn resolve(&self, credentials: &PresentedCredentials) -> AppResult<Subject> {
        let candidates = credentials.candidates();
        if candidates.is_empty() {
            return Err(AppError::no_credential("No session credential presented"));
        }

        let deadline = Instant::now() + self.budget;
        let mut unreachable = false;

        'candidates: for (source, token) in candidates {
            let mut transport = source.primary_transport();

            for _ in 0..2 {
                debug!(?source, ?transport, "Introspecting session");

                let outcome = match timeout_at(deadline, self.provider.whoami(token, transport)).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        warn!(budget_ms = self.budget.as_millis() as u64, "Session resolution budget exhausted");
                        return Err(AppError::provider_unreachable(
                            "Identity provider did not answer in time",
                        ));
                    }
                };

                match outcome {
                    Ok(session) if session.active => return Ok(Subject::from(session)),
                    Ok(_) | Err(IntrospectionError::Rejected) => {
                        debug!(?source, "Session rejected");
                        continue 'candidates;
                    }
                    Err(IntrospectionError::Malformed(reason)) => {
                        debug!(?source, ?transport, %reason, "Malformed session response");
                    }
                    Err(IntrospectionError::Unreachable(reason)) => {
                        warn!(?source, ?transport, %reason, "Identity provider unreachable");
                        unreachable = true;
                    }
                }

                transport = transport.alternate();
            }
        }

        if unreachable {
            Err(AppError::provider_unreachable("Identity provider is unreachable"))
        } else {
            Err(AppError::invalid_credential("Session is invalid or expired"))
        }
    }
}
