//! # orghub-service
//!
//! Business logic service layer for OrgHub. Services check access through
//! the [`orghub_auth::AccessGate`] before every mutation and talk to
//! storage only through [`orghub_database::OrganizationStore`].
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod client;
pub mod context;
pub mod identity;
pub mod organization;
pub mod user;

mod validate;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ClientService, CreatedClient};
pub use context::RequestContext;
pub use identity::{HookPayload, IdentitySyncService};
pub use organization::{OrganizationService, RoleService};
pub use user::UserService;
