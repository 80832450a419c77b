//! Tokenizer sources: where tokenizer definitions come from

pub mod auto;
pub mod huggingface;
pub mod openai;

use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use strum::{Display, EnumIter, EnumString};
use tiktoken_rs::CoreBPE;
use tokenizers::Tokenizer as HfTokenizer;

use crate::tokenizer::engine::{HuggingFaceEngine, TiktokenEngine, TokenizerEngine};
use crate::tokenizer::error::{SourceError, SourceResult};
use crate::tokenizer::model::ModelId;

pub use auto::AutoSource;
pub use huggingface::HuggingFaceSource;
pub use openai::OpenAiSource;

/// Default Hugging Face Hub endpoint
pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";
/// Default repository revision
pub const DEFAULT_REVISION: &str = "main";
/// Default timeout for fetching a definition, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fetches tokenizer definitions by model identifier
pub trait TokenizerSource: Send + Sync {
    /// Fetch the tokenizer definition for the given model
    fn fetch_definition(&self, model: &ModelId) -> SourceResult<TokenizerDefinition>;
}

/// A fetched tokenizer definition, ready to be turned into an engine
pub enum TokenizerDefinition {
    /// Raw `tokenizer.json` contents
    HuggingFace(Vec<u8>),
    /// A tiktoken BPE encoding
    Tiktoken(CoreBPE),
    /// An engine constructed elsewhere
    Engine(Arc<dyn TokenizerEngine>),
}

impl TokenizerDefinition {
    /// Build the engine described by this definition
    pub fn into_engine(self) -> SourceResult<Arc<dyn TokenizerEngine>> {
        match self {
            Self::HuggingFace(json) => {
                let tokenizer = HfTokenizer::from_bytes(&json).map_err(SourceError::Malformed)?;
                Ok(Arc::new(HuggingFaceEngine::new(tokenizer)))
            }
            Self::Tiktoken(encoding) => Ok(Arc::new(TiktokenEngine::new(encoding))),
            Self::Engine(engine) => Ok(engine),
        }
    }
}

/// Settings shared by the network backed sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Base URL of the model registry
    pub endpoint: String,
    /// Branch, tag or commit to read the definition from
    pub revision: String,
    /// Upper bound for a single definition fetch
    pub timeout: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Which source resolves model identifiers
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    EnumIter,
    EnumString,
    Display,
    ValueEnum,
)]
#[strum(serialize_all = "kebab-case")]
pub enum SourceKind {
    /// OpenAI names via tiktoken, everything else via Hugging Face
    #[default]
    Auto,
    /// Hugging Face Hub `tokenizer.json`
    HuggingFace,
    /// OpenAI model names via tiktoken
    OpenAi,
}

impl SourceKind {
    /// Build the source for this kind
    pub fn build(self, config: &SourceConfig) -> SourceResult<Box<dyn TokenizerSource>> {
        let source: Box<dyn TokenizerSource> = match self {
            Self::Auto => Box::new(AutoSource::new(
                Box::new(OpenAiSource::new()),
                Box::new(HuggingFaceSource::new(config)?),
            )),
            Self::HuggingFace => Box::new(HuggingFaceSource::new(config)?),
            Self::OpenAi => Box::new(OpenAiSource::new()),
        };

        Ok(source)
    }
}
