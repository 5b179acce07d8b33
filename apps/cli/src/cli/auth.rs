use clap::Subcommand;
use colored::Colorize;

use crate::credentials::{self, CredentialSource, CredentialStore};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Show whether an API key is selected and where it comes from
    Status,

    /// Select an API key; prompts with hidden input when --key is omitted
    Set {
        #[arg(long)]
        key: Option<String>,
    },

    /// Remove the stored API key
    Clear,
}

/// One-line summary of the active key and where it was found.
pub fn status_line(
    api_key: Option<&str>,
    source: Option<CredentialSource>,
    store: &CredentialStore,
) -> String {
    if !credentials::has_selected_credential(api_key) {
        return format!("{} No API key selected", "✗".red().bold());
    }
    match source {
        Some(CredentialSource::File) => format!(
            "{} API key selected ({} at {})",
            "✓".green().bold(),
            CredentialSource::File,
            store.path().display()
        ),
        Some(source) => format!("{} API key selected ({source})", "✓".green().bold()),
        None => format!("{} API key selected", "✓".green().bold()),
    }
}

pub fn execute(command: AuthCommand, state: &mut AppState) -> Result<(), AppError> {
    match command {
        AuthCommand::Status => {
            println!(
                "{}",
                status_line(
                    state.config.api_key.as_deref(),
                    state.config.api_key_source,
                    &state.credentials,
                )
            );
        }
        AuthCommand::Set { key } => {
            let selected = match key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
                Some(key) => {
                    let source = state.credentials.store(&key)?;
                    Some((key, source))
                }
                None => credentials::select_credential(&state.credentials)?,
            };
            match selected {
                Some((key, source)) => {
                    state.set_api_key(key, source)?;
                    println!("{} API key saved to {source}", "✓".green().bold());
                }
                None => println!("{}", "No key entered; nothing changed.".dimmed()),
            }
        }
        AuthCommand::Clear => {
            if state.credentials.clear()? {
                println!("{} Stored API key removed", "✓".green().bold());
            } else {
                println!("{}", "No stored API key.".dimmed());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());

        assert!(status_line(None, None, &store).contains("No API key selected"));
        assert!(status_line(Some("k"), Some(CredentialSource::Environment), &store)
            .ends_with("(environment)"));
        assert!(status_line(Some("k"), Some(CredentialSource::Keyring), &store)
            .ends_with("(OS keyring)"));
        let file = status_line(Some("k"), Some(CredentialSource::File), &store);
        assert!(file.contains("credentials file at"));
        assert!(file.contains(&store.path().display().to_string()));
    }
}
