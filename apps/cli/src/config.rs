use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::credentials::{CredentialSource, CredentialStore};
use crate::llm_client::{DEFAULT_API_BASE, DEFAULT_MODEL};

const APP_DIR_NAME: &str = "pm-match";

/// Application configuration loaded from environment variables (and `.env`).
/// Nothing here is required at startup: a missing API key only fails the
/// analysis that needs it.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_key_source: Option<CredentialSource>,
    pub model: String,
    pub api_base: String,
    pub data_dir: PathBuf,
    pub rust_log: String,
}

/// Command-line values that take precedence over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub data_dir: Option<PathBuf>,
    pub model: Option<String>,
    pub verbose: bool,
}

impl Config {
    pub fn from_env(overrides: &Overrides) -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let data_dir = match &overrides.data_dir {
            Some(dir) => dir.clone(),
            None => match optional_env("PM_MATCH_DATA_DIR") {
                Some(dir) => PathBuf::from(dir),
                None => default_data_dir()?,
            },
        };

        let (api_key, api_key_source) =
            match optional_env("GEMINI_API_KEY").or_else(|| optional_env("API_KEY")) {
                Some(key) => (Some(key), Some(CredentialSource::Environment)),
                None => match CredentialStore::new(&data_dir).load() {
                    Some((key, source)) => (Some(key), Some(source)),
                    None => (None, None),
                },
            };

        let rust_log = if overrides.verbose {
            "debug".to_string()
        } else {
            optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string())
        };

        Ok(Config {
            api_key,
            api_key_source,
            model: overrides
                .model
                .clone()
                .or_else(|| optional_env("PM_MATCH_MODEL"))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: optional_env("PM_MATCH_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            data_dir,
            rust_log,
        })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .context("Could not determine a local data directory; set PM_MATCH_DATA_DIR")
}

/// Reads a variable, treating empty values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_take_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_env(&Overrides {
            data_dir: Some(dir.path().to_path_buf()),
            model: Some("gemini-test".to_string()),
            verbose: true,
        })
        .unwrap();
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.model, "gemini-test");
        assert_eq!(config.rust_log, "debug");
    }
}
