//! Tokenizer engines and the shared handle around them

use std::fmt;
use std::sync::Arc;

use tiktoken_rs::CoreBPE;
use tokenizers::Tokenizer as HfTokenizer;

use crate::tokenizer::error::BoxError;

/// Anything that turns text into token ids
pub trait TokenizerEngine: Send + Sync {
    /// Encode text into an ordered sequence of token ids
    fn encode(&self, text: &str) -> Result<Vec<u32>, BoxError>;
}

/// Engine backed by a Hugging Face `tokenizer.json`
pub struct HuggingFaceEngine {
    tokenizer: HfTokenizer,
}

impl HuggingFaceEngine {
    pub fn new(tokenizer: HfTokenizer) -> Self {
        Self { tokenizer }
    }
}

impl TokenizerEngine for HuggingFaceEngine {
    fn encode(&self, text: &str) -> Result<Vec<u32>, BoxError> {
        // No BOS/EOS: we estimate prompt content only
        let encoding = self.tokenizer.encode(text, false)?;
        Ok(encoding.get_ids().to_vec())
    }
}

/// Engine backed by a tiktoken BPE encoding
pub struct TiktokenEngine {
    encoding: CoreBPE,
}

impl TiktokenEngine {
    pub fn new(encoding: CoreBPE) -> Self {
        Self { encoding }
    }
}

impl TokenizerEngine for TiktokenEngine {
    fn encode(&self, text: &str) -> Result<Vec<u32>, BoxError> {
        Ok(self.encoding.encode_ordinary(text))
    }
}

/// Shared, immutable reference to a loaded tokenizer
///
/// Cloning is cheap; every clone points at the same engine.
#[derive(Clone)]
pub struct TokenizerHandle {
    engine: Arc<dyn TokenizerEngine>,
}

impl TokenizerHandle {
    /// Wrap an engine in a new handle
    pub fn new<E: TokenizerEngine + 'static>(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Wrap an already shared engine
    pub fn from_arc(engine: Arc<dyn TokenizerEngine>) -> Self {
        Self { engine }
    }

    /// Encode text with the underlying engine
    pub fn encode(&self, text: &str) -> Result<Vec<u32>, BoxError> {
        self.engine.encode(text)
    }

    /// Whether both handles point at the same engine instance
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.engine, &b.engine)
    }
}

impl fmt::Debug for TokenizerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenizerHandle")
            .field("engine", &Arc::as_ptr(&self.engine))
            .finish()
    }
}
