//! Credential boundary: where the model API key comes from and how the user
//! selects a new one.
//!
//! A selected key lives in the OS keychain. When the keychain is unavailable
//! (or does not keep what it was given) the key goes to
//! `<data_dir>/credentials`, readable only by the owner.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use dialoguer::Password;
use tracing::{debug, info, warn};

use crate::history::kv::StoreError;

const DEFAULT_KEYRING_SERVICE: &str = "pm-match";
const KEYRING_USER: &str = "gemini-api-key";
const CREDENTIALS_FILE_NAME: &str = "credentials";

/// Keychain service name. `PM_MATCH_KEYRING_SERVICE` overrides it so test
/// runs stay away from the real entry.
fn keyring_service() -> String {
    std::env::var("PM_MATCH_KEYRING_SERVICE")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Where the active key was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    Keyring,
    File,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Keyring => write!(f, "OS keyring"),
            CredentialSource::File => write!(f, "credentials file"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CredentialStore {
    data_dir: PathBuf,
    /// `None` skips the keychain entirely.
    keyring_service: Option<String>,
}

impl CredentialStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            keyring_service: Some(keyring_service()),
        }
    }

    #[cfg(test)]
    fn file_only(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            keyring_service: None,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.data_dir.join(CREDENTIALS_FILE_NAME)
    }

    fn entry(&self) -> Option<keyring::Entry> {
        let service = self.keyring_service.as_deref()?;
        match keyring::Entry::new(service, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                debug!(%error, "keyring unavailable");
                None
            }
        }
    }

    fn keyring_key(&self) -> Option<String> {
        self.entry()
            .and_then(|entry| entry.get_password().ok())
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Loads the stored key. Keychain first, then the file.
    pub fn load(&self) -> Option<(String, CredentialSource)> {
        if let Some(key) = self.keyring_key() {
            return Some((key, CredentialSource::Keyring));
        }
        self.load_file().map(|key| (key, CredentialSource::File))
    }

    /// Stores the key in the keychain, falling back to the file. Returns
    /// where it ended up.
    pub fn store(&self, key: &str) -> Result<CredentialSource, StoreError> {
        let key = key.trim();
        if let Some(entry) = self.entry() {
            match entry.set_password(key) {
                // Some backends accept a write and keep nothing; read it back.
                Ok(()) if self.keyring_key().as_deref() == Some(key) => {
                    info!("API key stored in OS keyring");
                    return Ok(CredentialSource::Keyring);
                }
                Ok(()) => warn!("keyring did not retain the key; falling back to file"),
                Err(error) => warn!(%error, "keyring store failed; falling back to file"),
            }
        }
        self.store_file(key)?;
        Ok(CredentialSource::File)
    }

    /// Removes the key from both places. Returns whether anything was removed.
    pub fn clear(&self) -> Result<bool, StoreError> {
        let from_keyring = self
            .entry()
            .is_some_and(|entry| entry.delete_credential().is_ok());

        let path = self.path();
        let from_file = match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(from_keyring || from_file)
    }

    fn load_file(&self) -> Option<String> {
        let path = self.path();
        match fs::read_to_string(&path) {
            Ok(key) => Some(key.trim().to_string()).filter(|k| !k.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(error) => {
                warn!(%error, path = %path.display(), "could not read stored credential");
                None
            }
        }
    }

    fn store_file(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path();
        let io_err = |source| StoreError::Io {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.data_dir).map_err(io_err)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.data_dir).map_err(io_err)?;
        tmp.write_all(key.as_bytes()).map_err(io_err)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(tmp.path(), fs::Permissions::from_mode(0o600)).map_err(io_err)?;
        }

        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        info!(path = %path.display(), "API key stored in credentials file");
        Ok(())
    }
}

/// True when a non-blank key is available from the environment or the store.
pub fn has_selected_credential(api_key: Option<&str>) -> bool {
    api_key.is_some_and(|k| !k.trim().is_empty())
}

/// Asks for a key with hidden input and stores it. An empty answer keeps the
/// current configuration and returns `None`.
pub fn select_credential(
    store: &CredentialStore,
) -> anyhow::Result<Option<(String, CredentialSource)>> {
    let key: String = Password::new()
        .with_prompt("Gemini API key (leave empty to cancel)")
        .allow_empty_password(true)
        .interact()?;

    let key = key.trim().to_string();
    if key.is_empty() {
        return Ok(None);
    }
    let source = store.store(&key)?;
    Ok(Some((key, source)))
}
