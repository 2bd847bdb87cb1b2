//! Organization access gate.

pub mod access;

pub use access::AccessGate;
