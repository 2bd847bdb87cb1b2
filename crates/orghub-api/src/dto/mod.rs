//! Data transfer objects for the HTTP API.

pub mod request;
pub mod response;
