//! Error types for the tokenizer module

use std::time::Duration;

use thiserror::Error;

use crate::tokenizer::model::ModelId;

/// Boxed error raised by tokenizer backends
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for resolver and estimation operations
pub type TokenizerResult<T> = Result<T, TokenizerError>;

/// Result type for tokenizer source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Caller-side input rejected before any tokenizer is resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Model identifier is empty or whitespace only
    #[error("model identifier must not be empty")]
    EmptyModelId,
}

/// Errors raised while fetching or building a tokenizer definition
#[derive(Error, Debug)]
pub enum SourceError {
    /// Repository or definition file does not exist (or is not public)
    #[error("no tokenizer.json found at {url}")]
    NotFound { url: String },

    /// Registry answered with an unexpected status
    #[error("registry returned HTTP {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// Request did not complete within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Transport level failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Definition was fetched but could not be parsed
    #[error("malformed tokenizer definition: {0}")]
    Malformed(BoxError),

    /// Source does not know this model
    #[error("unsupported model: {0}")]
    UnsupportedModel(String),
}

/// Errors that can occur while resolving a tokenizer or counting tokens
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Tokenizer definition could not be loaded for the model
    #[error("failed to load tokenizer for model '{model}': {source}")]
    Load {
        model: ModelId,
        #[source]
        source: SourceError,
    },

    /// Tokenizer engine failed to encode the text
    #[error("failed to encode text for model '{model}': {source}")]
    Encoding {
        model: ModelId,
        #[source]
        source: BoxError,
    },

    /// Failed to acquire lock on the tokenizer cache
    #[error("Failed to acquire lock on tokenizer cache")]
    CacheLock,
}

impl TokenizerError {
    /// Model the error is attached to, if any
    pub fn model(&self) -> Option<&ModelId> {
        match self {
            Self::Load { model, .. } | Self::Encoding { model, .. } => Some(model),
            Self::CacheLock => None,
        }
    }
}
