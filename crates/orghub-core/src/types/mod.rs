//! Core type definitions used across the OrgHub workspace.

pub mod id;

pub use id::{ClientId, OrganizationId, SubjectId};
