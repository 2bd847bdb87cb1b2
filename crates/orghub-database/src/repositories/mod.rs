//! Repository implementations for all persisted entities.

pub mod client;
pub mod membership;
pub mod organization;
pub mod user;

pub use client::MachineClientRepository;
pub use membership::MembershipRepository;
pub use organization::OrganizationRepository;
pub use user::UserRepository;
