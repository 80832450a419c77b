/*!
 * Reporting functionality for tokestimate
 *
 * Renders estimation results as a console table (using the tabled library)
 * or JSON, and turns errors into the messages shown to the user.
 */

use clap::ValueEnum;
use strum::Display;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::error::{EstimatorError, Result};
use crate::estimate::EstimationResult;
use crate::tokenizer::{CacheStats, TokenizerError};

/// Format of the report output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    /// Console table output
    #[default]
    Table,
    /// Pretty-printed JSON array
    Json,
}

/// Report generator for estimation results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string for the given results
    pub fn render(&self, results: &[EstimationResult]) -> Result<String> {
        match self.format {
            ReportFormat::Table => Ok(self.create_results_table(results)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, results: &[EstimationResult]) -> Result<()> {
        println!("{}", self.render(results)?);
        Ok(())
    }

    /// One-line summary of tokenizer cache usage
    pub fn cache_summary(&self, stats: &CacheStats) -> String {
        let total = stats.hits + stats.misses;
        format!(
            "Tokenizer cache: {:.1}% ({} hits / {} total)",
            stats.hit_rate(),
            stats.hits,
            total
        )
    }

    // Create the results table using the tabled crate
    fn create_results_table(&self, results: &[EstimationResult]) -> String {
        #[derive(Tabled)]
        struct ResultRow {
            #[tabled(rename = "Model")]
            model: String,

            #[tabled(rename = "Estimated Tokens")]
            tokens: usize,

            #[tabled(rename = "Original Length")]
            original: String,

            #[tabled(rename = "Cleaned Length")]
            cleaned: String,
        }

        let rows: Vec<ResultRow> = results
            .iter()
            .map(|result| ResultRow {
                model: result.model.to_string(),
                tokens: result.token_count,
                original: format!("{} characters", result.original_length),
                cleaned: format!("{} characters", result.cleaned_length),
            })
            .collect();

        let mut table = Table::new(rows);
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }
}

/// User-facing message for an error
pub fn error_message(err: &EstimatorError) -> String {
    match err {
        EstimatorError::Validation(_) => "Please enter a model name to proceed.".to_string(),
        EstimatorError::EmptyText => "Please enter some text to count tokens.".to_string(),
        EstimatorError::Tokenizer(TokenizerError::Load { model, source }) => {
            format!("Error loading tokenizer for model '{}': {}", model, source)
        }
        EstimatorError::Tokenizer(TokenizerError::Encoding { model, source }) => {
            format!("Error encoding text for model '{}': {}", model, source)
        }
        other => format!("Error: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{ModelId, SourceError, ValidationError};

    fn sample() -> Vec<EstimationResult> {
        vec![EstimationResult {
            model: ModelId::parse("org/model").unwrap(),
            token_count: 2,
            original_length: 11,
            cleaned_length: 11,
        }]
    }

    #[test]
    fn test_table_report() {
        let report = Reporter::new(ReportFormat::Table).render(&sample()).unwrap();

        assert!(report.contains("Model"));
        assert!(report.contains("Estimated Tokens"));
        assert!(report.contains("org/model"));
        assert!(report.contains("11 characters"));
    }

    #[test]
    fn test_json_report() {
        let report = Reporter::new(ReportFormat::Json).render(&sample()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();

        assert_eq!(parsed[0]["model"], "org/model");
        assert_eq!(parsed[0]["token_count"], 2);
    }

    #[test]
    fn test_cache_summary() {
        let reporter = Reporter::new(ReportFormat::Table);
        let stats = CacheStats { hits: 3, misses: 1 };

        assert_eq!(
            reporter.cache_summary(&stats),
            "Tokenizer cache: 75.0% (3 hits / 4 total)"
        );
    }

    #[test]
    fn test_error_messages() {
        let model = ModelId::parse("nonexistent/model-does-not-exist").unwrap();

        assert_eq!(
            error_message(&ValidationError::EmptyModelId.into()),
            "Please enter a model name to proceed."
        );
        assert_eq!(
            error_message(&EstimatorError::EmptyText),
            "Please enter some text to count tokens."
        );

        let load = EstimatorError::Tokenizer(TokenizerError::Load {
            model,
            source: SourceError::UnsupportedModel("nope".to_string()),
        });
        assert_eq!(
            error_message(&load),
            "Error loading tokenizer for model 'nonexistent/model-does-not-exist': unsupported model: nope"
        );
    }
}
