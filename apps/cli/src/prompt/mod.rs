//! Prompt assembly. Pure string work: no validation, no I/O.

pub mod prompts;

use prompts::{
    ANALYSIS_PROMPT_INTRO, ANALYSIS_SYSTEM, JOB_DESCRIPTION_HEADING, JOB_URL_SECTION_TEMPLATE,
    MISSING_JOB_TEXT,
};

/// Inputs of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub resume: String,
    pub job_description: String,
    pub job_url: Option<String>,
}

impl AnalysisRequest {
    /// The URL, if one was given and is not blank.
    pub fn job_url(&self) -> Option<&str> {
        self.job_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPrompt {
    pub prompt: String,
    pub system_instruction: String,
    /// Search grounding is requested only when a job URL was supplied.
    pub use_search: bool,
}

pub fn build_prompt(request: &AnalysisRequest) -> BuiltPrompt {
    let job_description = if request.job_description.is_empty() {
        MISSING_JOB_TEXT
    } else {
        request.job_description.as_str()
    };

    // User text is appended as-is, never scanned for placeholders.
    let mut prompt = String::with_capacity(
        ANALYSIS_PROMPT_INTRO.len() + request.resume.len() + job_description.len() + 64,
    );
    prompt.push_str(ANALYSIS_PROMPT_INTRO);
    prompt.push_str(&request.resume);
    prompt.push_str(JOB_DESCRIPTION_HEADING);
    prompt.push_str(job_description);

    let job_url = request.job_url();
    if let Some(url) = job_url {
        prompt.push_str(&JOB_URL_SECTION_TEMPLATE.replace("{job_url}", url));
    }

    BuiltPrompt {
        prompt,
        system_instruction: ANALYSIS_SYSTEM.to_string(),
        use_search: job_url.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(job: &str, url: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            resume: "8 years PM at fintech".to_string(),
            job_description: job.to_string(),
            job_url: url.map(String::from),
        }
    }

    #[test]
    fn test_prompt_embeds_resume_and_job() {
        let built = build_prompt(&request("Lead payments roadmap", None));
        assert!(built.prompt.contains("8 years PM at fintech"));
        assert!(built.prompt.contains("Lead payments roadmap"));
        assert!(!built.prompt.contains("Google Search"));
        assert!(!built.use_search);
    }

    #[test]
    fn test_placeholder_text_in_inputs_is_kept_verbatim() {
        let mut req = request("JOBTEXT {resume}", None);
        req.resume = "Skills: templating with {job_description} tokens".to_string();
        let built = build_prompt(&req);
        assert!(built
            .prompt
            .contains("Skills: templating with {job_description} tokens"));
        assert!(built.prompt.contains("JOBTEXT {resume}"));
        assert_eq!(built.prompt.matches("JOBTEXT").count(), 1);
    }

    #[test]
    fn test_resume_and_job_sections_are_in_order() {
        let built = build_prompt(&request("Lead payments roadmap", None));
        let resume_at = built.prompt.find("RESUME/EXPERIENCE DATA:\n8 years PM").unwrap();
        let job_at = built
            .prompt
            .find("JOB DESCRIPTION DATA:\nLead payments roadmap")
            .unwrap();
        assert!(resume_at < job_at);
    }

    #[test]
    fn test_empty_job_text_uses_placeholder() {
        let built = build_prompt(&request("", Some("https://jobs.example.com/42")));
        assert!(built.prompt.contains(MISSING_JOB_TEXT));
    }

    #[test]
    fn test_url_adds_search_section() {
        let built = build_prompt(&request("jd", Some("https://boards.greenhouse.io/stripe/1")));
        assert!(built.use_search);
        assert!(built
            .prompt
            .contains("A direct Job URL was provided: https://boards.greenhouse.io/stripe/1."));
        assert!(built.prompt.contains("Research the company's current product strategy"));
    }

    #[test]
    fn test_blank_url_is_ignored() {
        let built = build_prompt(&request("jd", Some("   ")));
        assert!(!built.use_search);
        assert!(!built.prompt.contains("CRITICAL"));
    }

    #[test]
    fn test_system_instruction_lists_schema_fields() {
        let built = build_prompt(&request("jd", None));
        for field in [
            "companyName",
            "score",
            "missingSkills",
            "strengths",
            "quickTake",
            "pitchHighlights",
            "sampleEmail",
        ] {
            assert!(built.system_instruction.contains(field), "missing {field}");
        }
        assert!(built.system_instruction.contains("Why I’m a Strong Fit"));
    }
}
