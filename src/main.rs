/*!
 * Command-line interface for tokestimate
 */

use std::io;
use std::process;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use tokestimate::config::{Args, Config};
use tokestimate::error::{EstimatorError, Result};
use tokestimate::estimate::Estimator;
use tokestimate::report::{self, Reporter};
use tokestimate::tokenizer::Resolver;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut command = Args::command();
        clap_complete::generate(shell, &mut command, "tokestimate", &mut io::stdout());
        return;
    }

    let config = Config::from_args(args);

    init_tracing(config.verbosity);

    if let Err(err) = run(&config) {
        eprintln!("{}", report::error_message(&err));
        process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(config: &Config) -> Result<()> {
    config.validate()?;

    if config.models.is_empty() {
        return Err(tokestimate::tokenizer::ValidationError::EmptyModelId.into());
    }

    let text = config.input.read()?;
    if text.is_empty() {
        return Err(EstimatorError::EmptyText);
    }

    let source = config.source.build(&config.source_config)?;
    let estimator = Estimator::new(Resolver::new(source));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let mut results = Vec::with_capacity(config.models.len());
    for model in &config.models {
        spinner.set_message(format!("Estimating tokens for {}", model.trim()));
        match estimator.estimate(model, &text) {
            Ok(result) => results.push(result),
            Err(err) => {
                spinner.finish_and_clear();
                return Err(err);
            }
        }
    }
    spinner.finish_and_clear();

    let reporter = Reporter::new(config.format);
    reporter.print_report(&results)?;

    debug!("{}", reporter.cache_summary(&estimator.resolver().stats()));

    Ok(())
}
