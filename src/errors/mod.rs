//! Centralized error handling for the poster enrichment run
//!
//! # Error Categories
//!
//! - **Document Errors**: malformed XMLTV input, failed output writes
//! - **Cache Errors**: malformed poster cache JSON, failed cache writes
//! - **Configuration Errors**: unreadable or invalid configuration
//!
//! Upstream lookup failures and downstream refresh failures are not errors:
//! the former become a cached "no result", the latter a logged warning.
//!
//! # Usage
//!
//! ```rust
//! use xmltv_posters::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::configuration("batch_size must be greater than zero"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
