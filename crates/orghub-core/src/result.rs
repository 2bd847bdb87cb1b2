//! Convenience result type alias for OrgHub.

use crate::error::AppError;

/// A specialized `Result` type for OrgHub operations.
pub type AppResult<T> = Result<T, AppError>;
