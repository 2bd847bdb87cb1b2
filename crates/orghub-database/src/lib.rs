//! # orghub-database
//!
//! PostgreSQL connection management, concrete repositories, and the
//! [`OrganizationStore`] abstraction the service layer is written against.
//! A `MemoryStore` implementation backs tests (`testing` feature).

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
#[cfg(any(test, feature = "testing"))]
pub use store::memory::MemoryStore;
pub use store::postgres::PgStore;
pub use store::{OrganizationStore, Registration};
