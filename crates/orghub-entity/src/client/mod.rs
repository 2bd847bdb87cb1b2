//! Machine (OAuth2) client entities.

pub mod model;

pub use model::MachineClient;
