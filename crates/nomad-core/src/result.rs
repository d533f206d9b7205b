//! Convenience result type alias for the auth bridge.

use crate::error::AppError;

/// A specialized `Result` type for bridge operations.
pub type AppResult<T> = Result<T, AppError>;
