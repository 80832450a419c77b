//! Global error handling for tokestimate
//!
//! This module provides a centralized error type that can represent errors
//! from all modules in the project.

use std::io;
use thiserror::Error;

use crate::tokenizer::{SourceError, TokenizerError, ValidationError};

/// Global error type for tokestimate operations
#[derive(Error, Debug)]
pub enum EstimatorError {
    /// Caller supplied an invalid model identifier
    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    /// Tokenizer could not be loaded or failed to encode
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    /// Tokenizer source could not be set up
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// No text to estimate
    #[error("No text provided")]
    EmptyText,

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Specialized Result type for tokestimate operations
pub type Result<T> = std::result::Result<T, EstimatorError>;

/// Creates an EstimatorError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::EstimatorError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}
