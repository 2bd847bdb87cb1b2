//! Membership domain entities.

pub mod access;
pub mod model;
pub mod role;

pub use access::AccessSnapshot;
pub use model::{MemberProfile, Membership};
pub use role::MemberRole;
