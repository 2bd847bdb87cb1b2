//! HTTP-level integration tests over the in-memory store.

mod client_test;
mod helpers;
mod organization_test;
mod session_test;
mod sync_test;
