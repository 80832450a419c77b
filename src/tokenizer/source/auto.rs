//! Source that routes identifiers to the backend that understands them

use tracing::debug;

use super::{TokenizerDefinition, TokenizerSource};
use crate::tokenizer::error::SourceResult;
use crate::tokenizer::model::ModelId;

/// Routes `org/model` identifiers to the registry and tries plain names
/// against tiktoken first
pub struct AutoSource {
    openai: Box<dyn TokenizerSource>,
    huggingface: Box<dyn TokenizerSource>,
}

impl AutoSource {
    pub fn new(openai: Box<dyn TokenizerSource>, huggingface: Box<dyn TokenizerSource>) -> Self {
        Self {
            openai,
            huggingface,
        }
    }
}

impl TokenizerSource for AutoSource {
    fn fetch_definition(&self, model: &ModelId) -> SourceResult<TokenizerDefinition> {
        if model.is_repository() {
            return self.huggingface.fetch_definition(model);
        }

        match self.openai.fetch_definition(model) {
            Ok(definition) => Ok(definition),
            Err(e) => {
                debug!(%model, error = %e, "Not a tiktoken model, trying registry");
                self.huggingface.fetch_definition(model)
            }
        }
    }
}
