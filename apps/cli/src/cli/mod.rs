//! Command-line surface.

pub mod analyze;
pub mod auth;
pub mod extract;
pub mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Overrides;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Parser)]
#[command(
    name = "pm-match",
    version,
    about = "Benchmark a resume against a job description and draft an outreach pitch"
)]
pub struct Cli {
    /// Directory holding saved history and the stored API key
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Model identifier to call
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Debug-level logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one analysis from files, text or saved history
    Analyze(analyze::AnalyzeArgs),

    /// Guided mode: enter inputs, analyze, review results (default)
    Interactive,

    /// Print the plain text extracted from a .txt, .md, .pdf, .doc or .docx file
    Extract(extract::ExtractArgs),

    /// Manage saved resumes and jobs
    History {
        #[command(subcommand)]
        command: history::HistoryCommand,
    },

    /// Manage the stored API key
    Auth {
        #[command(subcommand)]
        command: auth::AuthCommand,
    },
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            data_dir: self.data_dir.clone(),
            model: self.model.clone(),
            verbose: self.verbose,
        }
    }

    pub async fn execute(self, state: &mut AppState) -> Result<(), AppError> {
        match self.command.unwrap_or(Commands::Interactive) {
            Commands::Analyze(args) => analyze::execute(args, state).await,
            Commands::Interactive => crate::ui::interactive::run(state)
                .await
                .map_err(AppError::Internal),
            Commands::Extract(args) => extract::execute(args),
            Commands::History { command } => history::execute(command, state),
            Commands::Auth { command } => auth::execute(command, state),
        }
    }
}
