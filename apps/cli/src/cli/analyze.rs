//! One-shot analysis from the command line.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use tracing::warn;

use crate::analysis::run_analysis;
use crate::credentials;
use crate::errors::AppError;
use crate::extract::extract_file;
use crate::history::HistoryStore;
use crate::prompt::AnalysisRequest;
use crate::state::AppState;
use crate::ui::clipboard::copy_to_clipboard;
use crate::ui::dashboard::render_dashboard;
use crate::ui::loading::LoadingIndicator;

#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Resume file (.txt, .md, .pdf, .doc, .docx)
    #[arg(long, group = "resume_source")]
    pub resume: Option<PathBuf>,

    /// Resume as literal text
    #[arg(long, group = "resume_source")]
    pub resume_text: Option<String>,

    /// Saved resume id (or unique id prefix)
    #[arg(long, group = "resume_source")]
    pub resume_id: Option<String>,

    /// Declared media type of the resume file
    #[arg(long, requires = "resume")]
    pub resume_mime: Option<String>,

    /// Job description file
    #[arg(long, group = "job_source")]
    pub job: Option<PathBuf>,

    /// Job description as literal text
    #[arg(long, group = "job_source")]
    pub job_text: Option<String>,

    /// Saved job id (or unique id prefix); restores its text and URL
    #[arg(long, group = "job_source")]
    pub job_id: Option<String>,

    /// Declared media type of the job file
    #[arg(long, requires = "job")]
    pub job_mime: Option<String>,

    /// Public job posting URL; enables web-search grounding
    #[arg(long)]
    pub job_url: Option<String>,

    /// Save the resume to history under this name before analyzing
    #[arg(long)]
    pub save_resume: Option<String>,

    /// Print the result as JSON instead of the dashboard
    #[arg(long)]
    pub json: bool,

    /// Copy the drafted email to the clipboard
    #[arg(long)]
    pub copy_email: bool,

    /// Hide the loading spinner
    #[arg(long)]
    pub no_progress: bool,
}

/// Resolves every input source into one request. Missing sources become
/// empty strings; validation happens in the pipeline.
pub fn resolve_request(
    args: &AnalyzeArgs,
    history: &HistoryStore,
) -> Result<AnalysisRequest, AppError> {
    let resume = match (&args.resume, &args.resume_text, &args.resume_id) {
        (Some(path), _, _) => extract_file(path, args.resume_mime.as_deref())?,
        (_, Some(text), _) => text.clone(),
        (_, _, Some(id)) => history
            .find_resume(id)
            .map(|r| r.content.clone())
            .ok_or_else(|| AppError::NotFound(format!("saved resume {id}")))?,
        _ => String::new(),
    };

    let mut job_url = args.job_url.clone();
    let job_description = match (&args.job, &args.job_text, &args.job_id) {
        (Some(path), _, _) => extract_file(path, args.job_mime.as_deref())?,
        (_, Some(text), _) => text.clone(),
        (_, _, Some(id)) => {
            let job = history
                .find_job(id)
                .ok_or_else(|| AppError::NotFound(format!("saved job {id}")))?;
            if job_url.is_none() && !job.url.is_empty() {
                job_url = Some(job.url.clone());
            }
            job.content.clone()
        }
        _ => String::new(),
    };

    Ok(AnalysisRequest {
        resume,
        job_description,
        job_url,
    })
}

pub async fn execute(args: AnalyzeArgs, state: &mut AppState) -> Result<(), AppError> {
    let request = resolve_request(&args, &state.history)?;

    if let Some(name) = &args.save_resume {
        if let Some(saved) = state.history.save_resume(name, &request.resume)? {
            eprintln!("{} Saved resume \"{}\" ({})", "✓".green().bold(), saved.name, saved.id);
        }
    }

    let show_progress = !args.no_progress && !args.json && std::io::stderr().is_terminal();
    let indicator = LoadingIndicator::start(show_progress);
    let outcome = run_analysis(
        state.model.as_ref(),
        &state.config.model,
        &mut state.history,
        &request,
    )
    .await;
    indicator.finish();

    let result = match outcome {
        Ok(result) => result,
        Err(e) if e.needs_credential_selection() && std::io::stdin().is_terminal() => {
            eprintln!(
                "{}",
                "The current API key cannot use search grounding.".yellow()
            );
            match credentials::select_credential(&state.credentials) {
                Ok(Some(_)) => eprintln!(
                    "{} API key saved. Run the analysis again to continue.",
                    "✓".green().bold()
                ),
                Ok(None) => {}
                Err(err) => warn!(error = %err, "credential selection failed"),
            }
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| AppError::Internal(e.into()))?;
        println!("{json}");
    } else {
        print!("{}", render_dashboard(&result));
    }

    if args.copy_email {
        match copy_to_clipboard(&result.sample_email) {
            Ok(()) => eprintln!("{} Copied", "✓".green().bold()),
            Err(e) => warn!(error = %e, "clipboard write failed"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::history::kv::{KeyValueStore, MemoryKvStore};

    fn history() -> HistoryStore {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        HistoryStore::load(store)
    }

    #[test]
    fn test_literal_text_sources() {
        let args = AnalyzeArgs {
            resume_text: Some("resume".into()),
            job_text: Some("jd".into()),
            job_url: Some("https://jobs.test".into()),
            ..Default::default()
        };
        let request = resolve_request(&args, &history()).unwrap();
        assert_eq!(request.resume, "resume");
        assert_eq!(request.job_description, "jd");
        assert_eq!(request.job_url(), Some("https://jobs.test"));
    }

    #[test]
    fn test_saved_job_restores_url() {
        let mut history = history();
        let job = history
            .save_job_at("Acme", "jd text", "https://acme.test/1", 0)
            .unwrap()
            .unwrap();
        let args = AnalyzeArgs {
            resume_text: Some("resume".into()),
            job_id: Some(job.id[..8].to_string()),
            ..Default::default()
        };
        let request = resolve_request(&args, &history).unwrap();
        assert_eq!(request.job_description, "jd text");
        assert_eq!(request.job_url(), Some("https://acme.test/1"));
    }

    #[test]
    fn test_unknown_saved_resume_is_not_found() {
        let args = AnalyzeArgs {
            resume_id: Some("missing".into()),
            ..Default::default()
        };
        assert!(matches!(
            resolve_request(&args, &history()),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_resume_file_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.md");
        std::fs::write(&path, "# Jane\nPM").unwrap();
        let args = AnalyzeArgs {
            resume: Some(path),
            ..Default::default()
        };
        let request = resolve_request(&args, &history()).unwrap();
        assert_eq!(request.resume, "# Jane\nPM");
        assert!(request.job_description.is_empty());
    }
}
