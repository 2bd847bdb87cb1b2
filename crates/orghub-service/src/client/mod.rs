//! Machine (OAuth2) client registry.

pub mod service;

pub use service::{ClientService, CreateClientRequest, CreatedClient};
