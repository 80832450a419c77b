/*!
 * tokestimate - Estimate LLM token usage before sending a prompt
 *
 * Resolves a tokenizer by model identifier, caches it for reuse, and reports
 * the token count of a text together with its original and cleaned lengths.
 */

pub mod config;
pub mod error;
pub mod estimate;
pub mod report;
pub mod tokenizer;


// Re-export main components for easier access
pub use config::Config;
pub use error::{EstimatorError, Result};
pub use estimate::{clean_text, estimate, EstimationResult, Estimator};
pub use report::{ReportFormat, Reporter};
pub use tokenizer::{ModelId, Resolver, TokenizerHandle};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
