//! Utility module
//!
//! - [`logger`] - structured logging bootstrap
//! - Re-exports of the unified error types from `shared`

pub mod logger;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
