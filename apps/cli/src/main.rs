mod analysis;
mod cli;
mod config;
mod credentials;
mod errors;
mod extract;
mod history;
mod llm_client;
mod models;
mod parser;
mod prompt;
mod state;
mod ui;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;
use crate::ui::dashboard::render_error;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render_error(&e.user_message()));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = Config::from_env(&cli.overrides())?;

    // Logs go to stderr so stdout stays clean for --json and extract output.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!(
        model = %config.model,
        data_dir = %config.data_dir.display(),
        "Starting PM Match v{}", env!("CARGO_PKG_VERSION")
    );

    let mut state = AppState::new(config)?;
    cli.execute(&mut state).await
}
