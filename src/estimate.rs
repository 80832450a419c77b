/*!
 * Token estimation for a piece of text
 *
 * Lengths are counted in Unicode scalar values (`char`s), not bytes.
 */

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::tokenizer::{ModelId, Resolver, TokenizerError, TokenizerHandle, TokenizerResult};

/// Character stripped from text before tokenization
pub const NEWLINE: char = '\n';

/// Character each newline is replaced with
pub const REPLACEMENT: char = ' ';

const REPLACEMENT_STR: &str = " ";

/// Outcome of estimating a single text under a single model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimationResult {
    /// Model the text was tokenized with
    pub model: ModelId,
    /// Number of tokens in the cleaned text
    pub token_count: usize,
    /// Character count of the text as supplied
    pub original_length: usize,
    /// Character count after newline replacement
    pub cleaned_length: usize,
}

/// Replace every newline with a space, one for one
pub fn clean_text(text: &str) -> String {
    text.replace(NEWLINE, REPLACEMENT_STR)
}

/// Estimate how many tokens `text` consumes under the tokenizer behind `handle`
pub fn estimate(
    handle: &TokenizerHandle,
    model: &ModelId,
    text: &str,
) -> TokenizerResult<EstimationResult> {
    let original_length = text.chars().count();
    let cleaned = clean_text(text);
    let cleaned_length = cleaned.chars().count();

    let token_count = if cleaned.is_empty() {
        0
    } else {
        handle
            .encode(&cleaned)
            .map_err(|source| TokenizerError::Encoding {
                model: model.clone(),
                source,
            })?
            .len()
    };

    debug!(%model, token_count, original_length, "Estimated tokens");

    Ok(EstimationResult {
        model: model.clone(),
        token_count,
        original_length,
        cleaned_length,
    })
}

/// Validates raw caller input and runs resolve + estimate against one resolver
pub struct Estimator {
    resolver: Resolver,
}

impl Estimator {
    /// Create an estimator around a resolver
    pub fn new(resolver: Resolver) -> Self {
        Self { resolver }
    }

    /// Resolver shared by every estimate made through this estimator
    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Estimate `text` under the model named by `model`
    ///
    /// An empty model name fails validation before the resolver is touched.
    pub fn estimate(&self, model: &str, text: &str) -> Result<EstimationResult> {
        let model = ModelId::parse(model)?;
        let handle = self.resolver.resolve(&model)?;
        Ok(estimate(&handle, &model, text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{BoxError, TokenizerEngine};

    struct WordEngine;

    impl TokenizerEngine for WordEngine {
        fn encode(&self, text: &str) -> std::result::Result<Vec<u32>, BoxError> {
            Ok(text.split(' ').map(|w| w.len() as u32).collect())
        }
    }

    struct FailingEngine;

    impl TokenizerEngine for FailingEngine {
        fn encode(&self, _text: &str) -> std::result::Result<Vec<u32>, BoxError> {
            Err("vocabulary exploded".into())
        }
    }

    fn model() -> ModelId {
        ModelId::parse("org/model").unwrap()
    }

    #[test]
    fn test_clean_text_replaces_newlines() {
        assert_eq!(clean_text("a\nb\nc"), "a b c");
        assert_eq!(clean_text("\n\n"), "  ");
        assert_eq!(clean_text("no newline"), "no newline");
    }

    #[test]
    fn test_clean_text_keeps_positions() {
        let text = "línea uno\nlínea dos\n\ttres\r\n";
        let cleaned = clean_text(text);

        assert_eq!(cleaned.chars().count(), text.chars().count());
        for (original, replaced) in text.chars().zip(cleaned.chars()) {
            if original == NEWLINE {
                assert_eq!(replaced, REPLACEMENT);
            } else {
                assert_eq!(replaced, original);
            }
        }
    }

    #[test]
    fn test_empty_text() {
        let handle = TokenizerHandle::new(FailingEngine);
        let result = estimate(&handle, &model(), "").unwrap();

        assert_eq!(result.token_count, 0);
        assert_eq!(result.original_length, 0);
        assert_eq!(result.cleaned_length, 0);
    }

    #[test]
    fn test_lengths_count_characters() {
        let handle = TokenizerHandle::new(WordEngine);
        let result = estimate(&handle, &model(), "héllo\nwörld").unwrap();

        assert_eq!(result.original_length, 11);
        assert_eq!(result.cleaned_length, 11);
        assert_eq!(result.token_count, 2);
    }

    #[test]
    fn test_encoding_error_carries_model() {
        let handle = TokenizerHandle::new(FailingEngine);
        let err = estimate(&handle, &model(), "text").unwrap_err();

        assert_eq!(err.model(), Some(&model()));
        assert!(err.to_string().contains("org/model"));
        assert!(err.to_string().contains("vocabulary exploded"));
    }

    #[test]
    fn test_result_serializes_flat() {
        let result = EstimationResult {
            model: model(),
            token_count: 2,
            original_length: 11,
            cleaned_length: 11,
        };
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "model": "org/model",
                "token_count": 2,
                "original_length": 11,
                "cleaned_length": 11
            })
        );
    }
}
