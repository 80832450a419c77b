//! OpenAI tokenizer source using tiktoken

use super::{TokenizerDefinition, TokenizerSource};
use crate::tokenizer::error::{SourceError, SourceResult};
use crate::tokenizer::model::ModelId;

/// Resolves OpenAI model names to their tiktoken encodings
///
/// Encodings are bundled with tiktoken, so nothing is fetched over the network.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenAiSource;

impl OpenAiSource {
    pub fn new() -> Self {
        Self
    }
}

impl TokenizerSource for OpenAiSource {
    fn fetch_definition(&self, model: &ModelId) -> SourceResult<TokenizerDefinition> {
        let encoding = tiktoken_rs::get_bpe_from_model(model.as_str())
            .map_err(|e| SourceError::UnsupportedModel(format!("{}: {}", model, e)))?;

        Ok(TokenizerDefinition::Tiktoken(encoding))
    }
}
