//! HTTP request handlers grouped by resource.

pub mod client;
pub mod health;
pub mod hook;
pub mod member;
pub mod organization;
pub mod user;
