//! Presentation state for one interactive session.

use crate::analysis::validate_request;
use crate::models::analysis::AnalysisResult;
use crate::prompt::AnalysisRequest;

/// The two mutually exclusive screens, plus the in-flight state between them.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Input,
    Loading,
    Results(Box<AnalysisResult>),
}

#[derive(Debug, Clone)]
pub struct Session {
    pub resume: String,
    pub job_description: String,
    pub job_url: String,
    pub view: View,
    /// Banner shown on the input view after a failure.
    pub error: Option<String>,
    pub has_api_key: bool,
}

impl Session {
    pub fn new(has_api_key: bool) -> Self {
        Self {
            resume: String::new(),
            job_description: String::new(),
            job_url: String::new(),
            view: View::Input,
            error: None,
            has_api_key,
        }
    }

    pub fn request(&self) -> AnalysisRequest {
        AnalysisRequest {
            resume: self.resume.clone(),
            job_description: self.job_description.clone(),
            job_url: Some(self.job_url.clone()).filter(|u| !u.trim().is_empty()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, View::Loading)
    }

    /// Submit. Rejected while a request is already in flight; invalid inputs
    /// stay on the input view with the error banner set.
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, String> {
        if self.is_loading() {
            return Err("An analysis is already running.".to_string());
        }
        let request = self.request();
        if let Err(e) = validate_request(&request) {
            let message = e.user_message();
            self.error = Some(message.clone());
            return Err(message);
        }
        self.error = None;
        self.view = View::Loading;
        Ok(request)
    }

    pub fn complete(&mut self, result: AnalysisResult) {
        self.view = View::Results(Box::new(result));
        self.error = None;
    }

    pub fn fail(&mut self, message: String) {
        self.view = View::Input;
        self.error = Some(message);
    }

    /// Back to the input view with result and error cleared. Inputs are kept
    /// so the user can tweak and resubmit.
    pub fn reset(&mut self) {
        self.view = View::Input;
        self.error = None;
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.view {
            View::Results(result) => Some(result.as_ref()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{MISSING_JOB_MESSAGE, MISSING_RESUME_MESSAGE};

    fn result() -> AnalysisResult {
        AnalysisResult {
            company_name: "Acme".into(),
            score: 64,
            missing_skills: vec![],
            strengths: vec![],
            quick_take: vec![],
            pitch_highlights: vec![],
            sample_email: "Hi".into(),
            grounding_sources: None,
        }
    }

    fn filled() -> Session {
        let mut session = Session::new(true);
        session.resume = "resume".into();
        session.job_description = "jd".into();
        session
    }

    #[test]
    fn test_begin_requires_resume() {
        let mut session = Session::new(true);
        session.job_description = "jd".into();
        assert_eq!(session.begin_analysis().unwrap_err(), MISSING_RESUME_MESSAGE);
        assert_eq!(session.view, View::Input);
        assert_eq!(session.error.as_deref(), Some(MISSING_RESUME_MESSAGE));
    }

    #[test]
    fn test_begin_requires_job_text_or_url() {
        let mut session = Session::new(true);
        session.resume = "resume".into();
        assert_eq!(session.begin_analysis().unwrap_err(), MISSING_JOB_MESSAGE);

        session.job_url = "https://jobs.test/1".into();
        let request = session.begin_analysis().unwrap();
        assert_eq!(request.job_url(), Some("https://jobs.test/1"));
        assert!(session.is_loading());
    }

    #[test]
    fn test_second_submit_while_loading_is_rejected() {
        let mut session = filled();
        session.begin_analysis().unwrap();
        assert!(session.begin_analysis().is_err());
        assert!(session.is_loading());
    }

    #[test]
    fn test_complete_then_reset() {
        let mut session = filled();
        session.begin_analysis().unwrap();
        session.complete(result());
        assert_eq!(session.result().unwrap().company_name, "Acme");

        session.reset();
        assert_eq!(session.view, View::Input);
        assert!(session.result().is_none());
        assert!(session.error.is_none());
        assert_eq!(session.resume, "resume");
    }

    #[test]
    fn test_fail_returns_to_input_with_banner() {
        let mut session = filled();
        session.begin_analysis().unwrap();
        session.fail("Analysis failed: boom.".into());
        assert_eq!(session.view, View::Input);
        assert_eq!(session.error.as_deref(), Some("Analysis failed: boom."));
        assert!(session.begin_analysis().is_ok());
        assert!(session.error.is_none());
    }
}
