pub mod patients;
pub mod sql;

use crate::error::AppError;

/// Fallback for every unmatched method and path.
pub async fn not_found() -> AppError {
    AppError::NotFound
}
