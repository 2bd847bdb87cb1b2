//! # orghub-entity
//!
//! Domain entity models for OrgHub. Every struct in this crate represents a
//! database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`; closed enumerations map to PostgreSQL enum types.

pub mod client;
pub mod membership;
pub mod organization;
pub mod user;
