//! Core error type.
//!
//! Sub-crates define their own error enums; `fa-sim` wraps `CoreError` as
//! one variant via `#[from]`.

use thiserror::Error;

/// The error type for `fa-core` and a common base for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fa-core`.
pub type CoreResult<T> = Result<T, CoreError>;
