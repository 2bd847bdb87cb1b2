//! Session resolution: turning request credentials into a subject.

pub mod credential;
pub mod resolver;

pub use credential::{CredentialSource, PresentedCredentials};
pub use resolver::{SessionResolver, Subject};
