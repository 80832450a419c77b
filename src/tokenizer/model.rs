//! Model identifiers

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::tokenizer::error::ValidationError;

/// Models known to ship a `tokenizer.json` in their Hugging Face repository
pub const EXAMPLE_MODELS: &[&str] = &[
    "mistralai/Mistral-7B-Instruct-v0.3",
    "deepseek-ai/DeepSeek-Coder-V2-Instruct-0724",
    "Qwen/Qwen2.5-Coder-32B-Instruct",
];

/// Name of a tokenizer definition, e.g. `org/model-name` or `gpt-4o`
///
/// Only non-emptiness is checked; the registry decides whether the name
/// actually resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModelId(String);

impl ModelId {
    /// Parse a model identifier, trimming surrounding whitespace
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyModelId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Identifier as passed to the registry
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier names an `org/model` repository
    pub fn is_repository(&self) -> bool {
        self.0.contains('/')
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ModelId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ModelId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
