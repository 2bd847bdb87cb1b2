//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;
pub mod webhook;

pub use auth::AuthUser;
pub use json::{JsonBody, ValidatedJson};
pub use webhook::WebhookKey;
