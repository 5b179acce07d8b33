//! Analysis pipeline: validate → build prompt → call model → parse → record job.
//!
//! Either a complete `AnalysisResult` comes back or an error does; nothing
//! partial is ever returned.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::history::HistoryStore;
use crate::llm_client::{ModelClient, ModelRequest};
use crate::models::analysis::AnalysisResult;
use crate::parser::parse_analysis;
use crate::prompt::{build_prompt, AnalysisRequest};

pub const MISSING_RESUME_MESSAGE: &str = "Please provide your resume content.";
pub const MISSING_JOB_MESSAGE: &str = "Please provide a job description or a public URL.";

/// Checks the inputs the same way the submit control does.
pub fn validate_request(request: &AnalysisRequest) -> Result<(), AppError> {
    if request.resume.trim().is_empty() {
        return Err(AppError::Validation(MISSING_RESUME_MESSAGE.to_string()));
    }
    if request.job_description.trim().is_empty() && request.job_url().is_none() {
        return Err(AppError::Validation(MISSING_JOB_MESSAGE.to_string()));
    }
    Ok(())
}

/// Runs one analysis. On success the job is saved to history under the
/// company name the model reported; a failed save is logged, not fatal.
pub async fn run_analysis(
    model: &dyn ModelClient,
    model_name: &str,
    history: &mut HistoryStore,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, AppError> {
    validate_request(request)?;

    let built = build_prompt(request);
    info!(
        model = model_name,
        use_search = built.use_search,
        "Starting match analysis"
    );

    let response = model
        .generate(&ModelRequest {
            model: model_name.to_string(),
            prompt: built.prompt,
            system_instruction: built.system_instruction,
            use_search: built.use_search,
        })
        .await?;

    let result = parse_analysis(&response)?;
    info!(
        company = %result.company_name,
        score = result.score,
        sources = result.grounding_sources.as_ref().map_or(0, Vec::len),
        "Analysis complete"
    );

    if let Err(e) = history.save_job(
        &result.company_name,
        &request.job_description,
        request.job_url().unwrap_or_default(),
    ) {
        warn!(error = %e, "Could not record job in history");
    }

    Ok(result)
}
