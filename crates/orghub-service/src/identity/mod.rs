//! Identity provider webhook handling.

pub mod payload;
pub mod sync;

pub use payload::HookPayload;
pub use sync::IdentitySyncService;
