//! # orghub-auth
//!
//! Authentication and authorization for OrgHub.
//!
//! ## Modules
//!
//! - `provider`: identity provider contract and the Kratos-compatible client
//! - `session`: credential extraction and the session resolver
//! - `gate`: membership-based access checks for organizations
//! - `oauth2`: authorization server contract and the Hydra-compatible client

pub mod gate;
pub mod oauth2;
pub mod provider;
pub mod session;

pub use gate::AccessGate;
pub use oauth2::{AuthorizationServer, HydraClient};
pub use provider::{IdentityProvider, KratosClient};
pub use session::{PresentedCredentials, SessionResolver, Subject};
