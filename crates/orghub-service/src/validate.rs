//! Field checks shared by the services.

use orghub_core::error::AppError;
use orghub_core::result::AppResult;

/// Longest accepted name, in characters.
pub(crate) const MAX_NAME_LEN: usize = 255;

/// Trim `value` and require it to be non-empty and at most
/// [`MAX_NAME_LEN`] characters.
pub(crate) fn name(field: &str, value: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} cannot be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}
