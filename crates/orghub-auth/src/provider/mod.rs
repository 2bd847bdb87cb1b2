//! Identity provider contract.
//!
//! The provider owns login, registration and session issuance. OrgHub only
//! asks it two things: who a session belongs to, and which identity holds a
//! given email address.

pub mod identity;
pub mod kratos;

use async_trait::async_trait;
use thiserror::Error;

use orghub_core::result::AppResult;

pub use identity::{IdentityTraits, PersonName, ProviderIdentity, ProviderSession, VerifiableAddress};
pub use kratos::KratosClient;

/// How a session token is handed to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// `X-Session-Token: <token>`.
    SessionToken,
    /// `Cookie: <cookie name>=<token>`.
    Cookie,
}

impl Transport {
    /// The other representation the provider accepts.
    pub fn alternate(self) -> Self {
        match self {
            Self::SessionToken => Self::Cookie,
            Self::Cookie => Self::SessionToken,
        }
    }
}

/// Why a session introspection did not yield a session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntrospectionError {
    /// The provider answered and does not recognise the session.
    #[error("session rejected by identity provider")]
    Rejected,
    /// The provider answered with something that is not a session.
    #[error("malformed identity provider response: {0}")]
    Malformed(String),
    /// The provider could not be reached or failed server-side.
    #[error("identity provider unreachable: {0}")]
    Unreachable(String),
}

/// Operations OrgHub needs from the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Introspect a session token sent over `transport`.
    async fn whoami(
        &self,
        token: &str,
        transport: Transport,
    ) -> Result<ProviderSession, IntrospectionError>;

    /// Look up the identity registered with `email`, if any.
    async fn find_identity_by_email(&self, email: &str) -> AppResult<Option<ProviderIdentity>>;
}
