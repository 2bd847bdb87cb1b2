//! Organization domain entities.

pub mod kind;
pub mod model;

pub use kind::OrganizationType;
pub use model::{NewOrganization, Organization, OrganizationChanges, OrganizationWithRole};
