//! # orghub-api
//!
//! HTTP API layer for OrgHub built on Axum.
//!
//! Provides the REST endpoints, the session-resolving extractor, CORS and
//! access-log middleware, DTOs, and the mapping from [`AppError`] kinds to
//! HTTP statuses.
//!
//! [`AppError`]: orghub_core::AppError

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::AppState;
