//! Tokenizer resolution for token estimation
//!
//! Resolves model identifiers to tokenizers sourced from an external
//! registry (Hugging Face Hub) or bundled encodings (tiktoken), caching
//! one tokenizer per identifier for the life of the resolver.

mod engine;
mod error;
mod model;
mod resolver;
pub mod source;

// Re-exports for public API
pub use engine::{HuggingFaceEngine, TiktokenEngine, TokenizerEngine, TokenizerHandle};
pub use error::{
    BoxError, SourceError, SourceResult, TokenizerError, TokenizerResult, ValidationError,
};
pub use model::{ModelId, EXAMPLE_MODELS};
pub use resolver::{CacheStats, Resolver};
pub use source::{SourceConfig, SourceKind, TokenizerDefinition, TokenizerSource};
