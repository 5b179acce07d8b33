use thiserror::Error;

use crate::extract::ExtractError;
use crate::history::kv::StoreError;
use crate::llm_client::ModelError;
use crate::parser::ParseError;

/// Shown when the provider rejects a search-grounded request for the current key.
pub const ENTITLEMENT_MESSAGE: &str =
    "Your project configuration requires a paid API key for search features. Please select one.";

/// Application-level error type.
/// Every failure of a user action ends here and is turned into one banner line
/// by [`AppError::user_message`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error("Model error: {0}")]
    Model(#[from] ModelError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The single user-facing message for this error. Details that only help
    /// debugging are logged here rather than shown.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => format!("Not found: {msg}"),
            AppError::Extraction(e) => {
                if let ExtractError::Corrupt { reason, .. } = e {
                    tracing::error!("File processing error: {reason}");
                }
                e.to_string()
            }
            AppError::Model(ModelError::EntitlementMismatch(msg)) => {
                tracing::error!("Entitlement mismatch: {msg}");
                ENTITLEMENT_MESSAGE.to_string()
            }
            AppError::Model(e) => {
                tracing::error!("Analysis error: {e}");
                format!("Analysis failed: {e}.")
            }
            AppError::Parse(e) => format!("Analysis failed: {e}"),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                "Could not save your history. Please check the data directory.".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                format!("Something went wrong: {e}")
            }
        }
    }

    /// True when the caller should offer credential selection instead of
    /// treating the failure as final.
    pub fn needs_credential_selection(&self) -> bool {
        matches!(self, AppError::Model(ModelError::EntitlementMismatch(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = AppError::Validation("Please provide your resume content.".into());
        assert_eq!(err.user_message(), "Please provide your resume content.");
        assert!(!err.needs_credential_selection());
    }

    #[test]
    fn test_entitlement_mismatch_asks_for_credential() {
        let err = AppError::from(ModelError::EntitlementMismatch(
            "Requested entity was not found.".into(),
        ));
        assert_eq!(err.user_message(), ENTITLEMENT_MESSAGE);
        assert!(err.needs_credential_selection());
    }

    #[test]
    fn test_model_errors_keep_original_message() {
        let err = AppError::from(ModelError::Api {
            status: 500,
            message: "backend exploded".into(),
        });
        assert_eq!(
            err.user_message(),
            "Analysis failed: API error (status 500): backend exploded."
        );
        assert_eq!(
            AppError::from(ModelError::MissingCredential).user_message(),
            "Analysis failed: API key not configured."
        );
    }

    #[test]
    fn test_parse_error_message() {
        let err = AppError::from(ParseError::MissingFields(vec!["sampleEmail".into()]));
        assert_eq!(
            err.user_message(),
            "Analysis failed: The AI response is missing required fields: sampleEmail"
        );
    }

    #[test]
    fn test_extraction_message() {
        let err = AppError::from(ExtractError::Unsupported {
            extension: "rtf".into(),
        });
        assert_eq!(err.user_message(), "Could not extract text from RTF.");
    }
}
