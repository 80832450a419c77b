//! Hugging Face Hub tokenizer source

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::debug;

use super::{SourceConfig, TokenizerDefinition, TokenizerSource};
use crate::tokenizer::error::{SourceError, SourceResult};
use crate::tokenizer::model::ModelId;

/// File every supported repository must carry
const DEFINITION_FILE: &str = "tokenizer.json";

/// Downloads `tokenizer.json` from a Hugging Face compatible registry
pub struct HuggingFaceSource {
    client: Client,
    endpoint: String,
    revision: String,
    timeout: Duration,
}

impl HuggingFaceSource {
    /// Create a new source using the given registry settings
    pub fn new(config: &SourceConfig) -> SourceResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("tokestimate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            revision: config.revision.clone(),
            timeout: config.timeout,
        })
    }

    /// URL of the definition file for a model
    pub fn definition_url(&self, model: &ModelId) -> String {
        format!(
            "{}/{}/resolve/{}/{}",
            self.endpoint, model, self.revision, DEFINITION_FILE
        )
    }

    fn request_error(&self, error: reqwest::Error) -> SourceError {
        if error.is_timeout() {
            SourceError::Timeout(self.timeout)
        } else {
            SourceError::Request(error)
        }
    }
}

impl TokenizerSource for HuggingFaceSource {
    fn fetch_definition(&self, model: &ModelId) -> SourceResult<TokenizerDefinition> {
        let url = self.definition_url(model);
        debug!(%url, "Fetching tokenizer definition");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.request_error(e))?;

        // The Hub answers 401 for repositories that do not exist when unauthenticated
        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::UNAUTHORIZED {
            return Err(SourceError::NotFound { url });
        }
        if !status.is_success() {
            return Err(SourceError::Status { status, url });
        }

        let body = response.bytes().map_err(|e| self.request_error(e))?;
        debug!(bytes = body.len(), "Fetched tokenizer definition");

        Ok(TokenizerDefinition::HuggingFace(body.to_vec()))
    }
}
