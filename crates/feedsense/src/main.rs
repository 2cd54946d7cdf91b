// SPDX-FileCopyrightText: 2026 Feedsense Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedsense - incremental LLM sentiment classification of user feedback.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check;
mod classify;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use feedsense_config::{ConfigError, FeedsenseConfig};
use feedsense_config::model::Backend;
use feedsense_core::FeedsenseError;
use tracing::error;

/// Classify new user feedback with an LLM and append the results.
#[derive(Parser, Debug)]
#[command(name = "feedsense", version, about, long_about = None)]
struct Cli {
    /// Config file to load instead of the standard search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify every unprocessed feedback row and append the results.
    Run {
        /// Storage backend, overriding `pipeline.backend`.
        #[arg(long, value_enum)]
        backend: Option<BackendArg>,
        /// Process at most this many rows, overriding `pipeline.limit`.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        limit: Option<u64>,
    },
    /// Validate configuration, resolve secrets and health-check adapters.
    Check,
    /// Classify a single feedback pair and print the result as JSON.
    Classify {
        /// The assistant message the user reacted to.
        #[arg(long)]
        system_message: String,
        /// The user's comment.
        #[arg(long)]
        comment: String,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BackendArg {
    Sqlite,
    Csv,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Sqlite => Backend::Sqlite,
            BackendArg::Csv => Backend::Csv,
        }
    }
}

/// Exit code for configuration and secret failures.
const EXIT_CONFIG: u8 = 2;
/// Exit code for any other fatal run failure.
const EXIT_FAILURE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => feedsense_config::load_and_validate_path(path),
        None => feedsense_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            feedsense_config::render_errors(&errors);
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    init_tracing(&config.pipeline.log_level);

    match dispatch(cli.command, &config).await {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "feedsense failed");
            eprintln!("feedsense: {e}");
            exit_code_for(&e)
        }
    }
}

async fn dispatch(
    command: Commands,
    config: &FeedsenseConfig,
) -> Result<ExitCode, FeedsenseError> {
    match command {
        Commands::Run { backend, limit } => {
            let backend = match run_backend(config, backend) {
                Ok(backend) => backend,
                Err(errors) => {
                    feedsense_config::render_errors(&errors);
                    return Ok(ExitCode::from(EXIT_CONFIG));
                }
            };
            let limit = limit
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX))
                .or(config.pipeline.limit);
            run::run_pipeline(config, backend, limit).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            if check::run_check(config).await? {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(EXIT_FAILURE))
            }
        }
        Commands::Classify {
            system_message,
            comment,
        } => {
            classify::run_classify(config, &system_message, &comment).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// The backend a run uses, checked against the config sections it reads.
fn run_backend(
    config: &FeedsenseConfig,
    arg: Option<BackendArg>,
) -> Result<Backend, Vec<ConfigError>> {
    let backend = arg.map(Backend::from).unwrap_or(config.pipeline.backend);
    feedsense_config::validation::validate_backend(config, backend)?;
    Ok(backend)
}

fn exit_code_for(error: &FeedsenseError) -> ExitCode {
    if error.is_fatal_configuration() {
        ExitCode::from(EXIT_CONFIG)
    } else {
        ExitCode::from(EXIT_FAILURE)
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("feedsense={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
