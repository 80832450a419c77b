/*!
 * Configuration handling for tokestimate
 */

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use clap_complete::Shell;

use crate::ensure;
use crate::error::Result;
use crate::report::ReportFormat;
use crate::tokenizer::source::{DEFAULT_ENDPOINT, DEFAULT_REVISION, DEFAULT_TIMEOUT_SECS};
use crate::tokenizer::{SourceConfig, SourceKind, EXAMPLE_MODELS};

/// Help text listed after the options, built from the known example models
pub fn after_help() -> String {
    let mut help = String::from("Examples:\n");
    for model in EXAMPLE_MODELS {
        help.push_str(&format!("  tokestimate -m {} --file prompt.txt\n", model));
    }
    help.push_str("  tokestimate -m gpt-4o \"How many tokens is this?\"\n\n");
    help.push_str(
        "Any Hugging Face repository with a tokenizer.json works. For quantized or\n\
         re-trained models, point at the original repository. Newlines are replaced\n\
         with spaces before tokenizing.",
    );
    help
}

/// Command-line arguments for tokestimate
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "tokestimate",
    version = env!("CARGO_PKG_VERSION"),
    about = "Estimate how many tokens a prompt will consume under an LLM tokenizer",
    long_about = "Loads the tokenizer for a model (a Hugging Face org/model repository or an OpenAI model name) and reports the token count plus the original and cleaned character lengths of the text.",
    after_help = after_help()
)]
pub struct Args {
    /// Text to estimate (read from --file or stdin when omitted)
    pub text: Option<String>,

    /// Model identifier, e.g. org/model-name; repeat to compare models
    #[clap(short = 'm', long = "model", value_name = "MODEL")]
    pub models: Vec<String>,

    /// Read the text from a file
    #[clap(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Where tokenizer definitions come from
    #[clap(long, value_enum, default_value_t = SourceKind::default())]
    pub source: SourceKind,

    /// Model registry base URL
    #[clap(long, env = "HF_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Repository revision to read tokenizer.json from
    #[clap(long, default_value = DEFAULT_REVISION)]
    pub revision: String,

    /// Timeout for fetching a tokenizer, in seconds
    #[clap(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Output format
    #[clap(long, value_enum, default_value_t = ReportFormat::default())]
    pub format: ReportFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,
}

/// Where the text to estimate comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    /// Passed on the command line
    Inline(String),
    /// Read from a file
    File(PathBuf),
    /// Read from standard input
    Stdin,
}

impl TextInput {
    /// Read the full text
    pub fn read(&self) -> io::Result<String> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => fs::read_to_string(path),
            Self::Stdin => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text)?;
                Ok(text)
            }
        }
    }
}

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Raw model identifiers, validated when estimating
    pub models: Vec<String>,

    /// Text to estimate
    pub input: TextInput,

    /// Source used to resolve model identifiers
    pub source: SourceKind,

    /// Registry settings for network backed sources
    pub source_config: SourceConfig,

    /// Output format
    pub format: ReportFormat,

    /// Log verbosity
    pub verbosity: u8,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args(args: Args) -> Self {
        let input = match (args.text, args.file) {
            (Some(text), _) => TextInput::Inline(text),
            (None, Some(path)) => TextInput::File(path),
            (None, None) => TextInput::Stdin,
        };

        Self {
            models: args.models,
            input,
            source: args.source,
            source_config: SourceConfig {
                endpoint: args.endpoint,
                revision: args.revision,
                timeout: Duration::from_secs(args.timeout),
            },
            format: args.format,
            verbosity: args.verbose,
        }
    }

    /// Validate the configuration
    ///
    /// Model names themselves are checked when each estimate runs.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.source_config.timeout.is_zero(),
            Config,
            "timeout must be greater than zero"
        );
        ensure!(
            !self.source_config.endpoint.trim().is_empty(),
            Config,
            "registry endpoint must not be empty"
        );
        ensure!(
            !self.source_config.revision.trim().is_empty(),
            Config,
            "revision must not be empty"
        );

        if let TextInput::File(path) = &self.input {
            if !path.is_file() {
                return Err(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Input file not found: {}", path.display()),
                )
                .into());
            }
        }

        Ok(())
    }
}
