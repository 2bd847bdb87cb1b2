//! Organization lifecycle and role transitions.

pub mod role;
pub mod service;

pub use role::RoleService;
pub use service::{
    AddMemberRequest, CreateOrganizationRequest, OrganizationService, UpdateOrganizationRequest,
};
