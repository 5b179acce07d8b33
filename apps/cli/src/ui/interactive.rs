//! Interactive mode: the input view as a prompt loop, then the results view.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Confirm, Editor, Input, Select};
use tracing::warn;

use crate::analysis::run_analysis;
use crate::credentials;
use crate::extract::{extract_file, ACCEPTED_EXTENSIONS};
use crate::state::AppState;
use crate::ui::clipboard::copy_to_clipboard;
use crate::ui::dashboard::{render_dashboard, render_error};
use crate::ui::history_view::entry_label;
use crate::ui::loading::LoadingIndicator;
use crate::ui::session::Session;

enum Next {
    Continue,
    Quit,
}

pub async fn run(state: &mut AppState) -> Result<()> {
    let mut session = Session::new(credentials::has_selected_credential(
        state.config.api_key.as_deref(),
    ));

    println!("{}", "PM Match".cyan().bold());
    println!(
        "{}",
        "Benchmark your experience against any role and generate a high-conversion pitch."
            .dimmed()
    );

    loop {
        println!();
        if !session.has_api_key {
            println!("{} {}", "🔑".yellow(), "No API key selected. Choose \"Set API key\" to enable analysis.".yellow());
        }
        if let Some(error) = &session.error {
            println!("{}", render_error(error));
        }
        print_inputs(&session);

        let choice = Select::new()
            .with_prompt("What next?")
            .items(&[
                "Set resume",
                "Set job description",
                "Set job URL",
                "Analyze match",
                "Manage history",
                "Set API key",
                "Quit",
            ])
            .default(3)
            .interact()?;

        let next = match choice {
            0 => {
                resume_menu(state, &mut session)?;
                Next::Continue
            }
            1 => {
                job_menu(state, &mut session)?;
                Next::Continue
            }
            2 => {
                session.job_url = Input::<String>::new()
                    .with_prompt("Job URL (empty to clear)")
                    .with_initial_text(session.job_url.clone())
                    .allow_empty(true)
                    .interact_text()?
                    .trim()
                    .to_string();
                Next::Continue
            }
            3 => analyze(state, &mut session).await?,
            4 => {
                manage_history(state)?;
                Next::Continue
            }
            5 => {
                select_api_key(state, &mut session)?;
                Next::Continue
            }
            _ => Next::Quit,
        };

        if let Next::Quit = next {
            return Ok(());
        }
    }
}

fn print_inputs(session: &Session) {
    let describe = |text: &str| {
        if text.trim().is_empty() {
            "empty".dimmed().to_string()
        } else {
            format!("{} chars", text.chars().count())
        }
    };
    println!("{:<18} {}", "Resume:".bold(), describe(&session.resume));
    println!("{:<18} {}", "Job description:".bold(), describe(&session.job_description));
    println!(
        "{:<18} {}",
        "Job URL:".bold(),
        if session.job_url.is_empty() {
            "none".dimmed().to_string()
        } else {
            session.job_url.clone()
        }
    );
}

async fn analyze(state: &mut AppState, session: &mut Session) -> Result<Next> {
    let request = match session.begin_analysis() {
        Ok(request) => request,
        // The banner is already set on the session.
        Err(_) => return Ok(Next::Continue),
    };

    let indicator = LoadingIndicator::start(true);
    let outcome = run_analysis(
        state.model.as_ref(),
        &state.config.model,
        &mut state.history,
        &request,
    )
    .await;
    indicator.finish();

    match outcome {
        Ok(result) => {
            session.complete(result);
            results_view(session)
        }
        Err(e) => {
            session.fail(e.user_message());
            if e.needs_credential_selection() {
                session.has_api_key = false;
                println!("{}", render_error(&e.user_message()));
                select_api_key(state, session)?;
                if session.has_api_key {
                    session.error = None;
                }
            }
            Ok(Next::Continue)
        }
    }
}

fn results_view(session: &mut Session) -> Result<Next> {
    let Some(result) = session.result().cloned() else {
        return Ok(Next::Continue);
    };

    println!();
    print!("{}", render_dashboard(&result));

    loop {
        let choice = Select::new()
            .items(&["Copy email", "Start new match", "Quit"])
            .default(1)
            .interact()?;
        match choice {
            0 => match copy_to_clipboard(&result.sample_email) {
                Ok(()) => println!("{} Copied", "✓".green().bold()),
                Err(e) => {
                    warn!(error = %e, "clipboard write failed");
                    println!("{}", render_error("Could not copy the email."));
                }
            },
            1 => {
                session.reset();
                return Ok(Next::Continue);
            }
            _ => return Ok(Next::Quit),
        }
    }
}

fn resume_menu(state: &mut AppState, session: &mut Session) -> Result<()> {
    let choice = Select::new()
        .with_prompt("Resume")
        .items(&[
            "Paste or edit text",
            "Load from file",
            "Choose saved resume",
            "Save current resume",
            "Back",
        ])
        .default(0)
        .interact()?;

    match choice {
        0 => {
            if let Some(text) = edit_text(&session.resume)? {
                session.resume = text;
            }
        }
        1 => {
            if let Some(text) = load_file(session)? {
                session.resume = text;
            }
        }
        2 => {
            let resumes = state.history.resumes();
            if resumes.is_empty() {
                println!("{}", "No saved resumes.".dimmed());
                return Ok(());
            }
            let labels: Vec<String> = resumes.iter().map(entry_label).collect();
            let index = Select::new().items(&labels).default(0).interact()?;
            session.resume = resumes[index].content.clone();
        }
        3 => {
            let name = Input::<String>::new()
                .with_prompt("Name this resume")
                .allow_empty(true)
                .interact_text()?;
            match state.history.save_resume(&name, &session.resume) {
                Ok(Some(saved)) => println!("{} Saved \"{}\"", "✓".green().bold(), saved.name),
                Ok(None) => println!("{}", "Nothing to save: the resume is empty.".dimmed()),
                Err(e) => session.error = Some(crate::errors::AppError::from(e).user_message()),
            }
        }
        _ => {}
    }
    Ok(())
}

fn job_menu(state: &mut AppState, session: &mut Session) -> Result<()> {
    let choice = Select::new()
        .with_prompt("Job description")
        .items(&[
            "Paste or edit text",
            "Load from file",
            "Choose saved job",
            "Back",
        ])
        .default(0)
        .interact()?;

    match choice {
        0 => {
            if let Some(text) = edit_text(&session.job_description)? {
                session.job_description = text;
            }
        }
        1 => {
            if let Some(text) = load_file(session)? {
                session.job_description = text;
            }
        }
        2 => {
            let jobs = state.history.jobs();
            if jobs.is_empty() {
                println!("{}", "No saved jobs.".dimmed());
                return Ok(());
            }
            let labels: Vec<String> = jobs.iter().map(entry_label).collect();
            let index = Select::new().items(&labels).default(0).interact()?;
            session.job_description = jobs[index].content.clone();
            session.job_url = jobs[index].url.clone();
        }
        _ => {}
    }
    Ok(())
}

fn edit_text(initial: &str) -> Result<Option<String>> {
    Ok(Editor::new().extension(".txt").edit(initial)?)
}

/// Prompts for a path and extracts its text. Failures land on the banner.
fn load_file(session: &mut Session) -> Result<Option<String>> {
    let path: String = Input::new()
        .with_prompt(format!("Path ({})", ACCEPTED_EXTENSIONS.join(", ")))
        .interact_text()?;

    match extract_file(&PathBuf::from(path.trim()), None) {
        Ok(text) => {
            session.error = None;
            Ok(Some(text))
        }
        Err(e) => {
            session.error = Some(crate::errors::AppError::from(e).user_message());
            Ok(None)
        }
    }
}

fn manage_history(state: &mut AppState) -> Result<()> {
    let list = Select::new()
        .with_prompt("History")
        .items(&["Saved resumes", "Saved jobs", "Back"])
        .default(0)
        .interact()?;

    let (labels, ids): (Vec<String>, Vec<String>) = match list {
        0 => state
            .history
            .resumes()
            .iter()
            .map(|r| (entry_label(r), r.id.clone()))
            .unzip(),
        1 => state
            .history
            .jobs()
            .iter()
            .map(|j| (entry_label(j), j.id.clone()))
            .unzip(),
        _ => return Ok(()),
    };

    if labels.is_empty() {
        println!("{}", "Nothing saved yet.".dimmed());
        return Ok(());
    }

    let index = Select::new()
        .with_prompt("Select an entry to delete")
        .items(&labels)
        .default(0)
        .interact()?;

    if !Confirm::new()
        .with_prompt(format!("Delete {}?", labels[index]))
        .default(false)
        .interact()?
    {
        return Ok(());
    }

    let removed = if list == 0 {
        state.history.delete_resume(&ids[index])?
    } else {
        state.history.delete_job(&ids[index])?
    };
    if removed {
        println!("{} Deleted", "✓".green().bold());
    }
    Ok(())
}

fn select_api_key(state: &mut AppState, session: &mut Session) -> Result<()> {
    if let Some((key, source)) = credentials::select_credential(&state.credentials)? {
        state.set_api_key(key, source)?;
        session.has_api_key = true;
        println!(
            "{} API key saved. Submit the analysis again to continue.",
            "✓".green().bold()
        );
    }
    Ok(())
}
