use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand};
use colored::Colorize;

use crate::errors::AppError;
use crate::extract::extract_file;
use crate::state::AppState;
use crate::ui::history_view::{format_timestamp, render_jobs, render_resumes};

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// Saved resumes, newest first
    Resumes {
        #[command(subcommand)]
        action: ResumeAction,
    },
    /// Saved jobs, newest first
    Jobs {
        #[command(subcommand)]
        action: JobAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ResumeAction {
    List(ListArgs),
    Show { id: String },
    /// Save a resume from a file or literal text
    Save(SaveResumeArgs),
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum JobAction {
    List(ListArgs),
    Show { id: String },
    Delete { id: String },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true)))]
pub struct SaveResumeArgs {
    /// Entry title; blank saves as "My Resume"
    #[arg(long, default_value = "")]
    pub name: String,

    #[arg(long, group = "source")]
    pub file: Option<PathBuf>,

    #[arg(long, group = "source")]
    pub text: Option<String>,
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.into()))
}

pub fn execute(command: HistoryCommand, state: &mut AppState) -> Result<(), AppError> {
    let history = &mut state.history;
    match command {
        HistoryCommand::Resumes { action } => match action {
            ResumeAction::List(args) if args.json => println!("{}", to_json(&history.resumes())?),
            ResumeAction::List(_) => print!("{}", render_resumes(history.resumes())),
            ResumeAction::Show { id } => {
                let resume = history
                    .find_resume(&id)
                    .ok_or_else(|| AppError::NotFound(format!("saved resume {id}")))?;
                println!("{}", resume.name.cyan().bold());
                println!("{}", format_timestamp(resume.timestamp).dimmed());
                println!();
                println!("{}", resume.content);
            }
            ResumeAction::Save(args) => {
                let content = match (&args.file, &args.text) {
                    (Some(path), _) => extract_file(path, None)?,
                    (_, Some(text)) => text.clone(),
                    _ => String::new(),
                };
                match history.save_resume(&args.name, &content)? {
                    Some(saved) => println!(
                        "{} Saved \"{}\" ({})",
                        "✓".green().bold(),
                        saved.name,
                        saved.id
                    ),
                    None => println!("{}", "Nothing to save: the resume is empty.".dimmed()),
                }
            }
            ResumeAction::Delete { id } => {
                if !history.delete_resume(&id)? {
                    return Err(AppError::NotFound(format!("saved resume {id}")));
                }
                println!("{} Deleted", "✓".green().bold());
            }
        },
        HistoryCommand::Jobs { action } => match action {
            JobAction::List(args) if args.json => println!("{}", to_json(&history.jobs())?),
            JobAction::List(_) => print!("{}", render_jobs(history.jobs())),
            JobAction::Show { id } => {
                let job = history
                    .find_job(&id)
                    .ok_or_else(|| AppError::NotFound(format!("saved job {id}")))?;
                println!("{}", job.name.cyan().bold());
                println!("{}", format_timestamp(job.timestamp).dimmed());
                if !job.url.is_empty() {
                    println!("{}", job.url.underline());
                }
                println!();
                println!("{}", job.content);
            }
            JobAction::Delete { id } => {
                if !history.delete_job(&id)? {
                    return Err(AppError::NotFound(format!("saved job {id}")));
                }
                println!("{} Deleted", "✓".green().bold());
            }
        },
    }
    Ok(())
}
