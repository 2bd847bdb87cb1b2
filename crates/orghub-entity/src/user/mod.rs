//! User domain entities.

pub mod model;

pub use model::{ProfileUpsert, UpdateProfile, User};
