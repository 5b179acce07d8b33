use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::credentials::{CredentialSource, CredentialStore};
use crate::history::kv::{FileKvStore, KeyValueStore};
use crate::history::HistoryStore;
use crate::llm_client::{GeminiClient, ModelClient};

/// Everything a command needs, built once at startup and passed down.
pub struct AppState {
    pub config: Config,
    pub history: HistoryStore,
    pub credentials: CredentialStore,
    /// Pluggable model backend. Default: `GeminiClient`; tests use stubs.
    pub model: Arc<dyn ModelClient>,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::new(&config.data_dir));
        let history = HistoryStore::load(store);
        let credentials = CredentialStore::new(&config.data_dir);
        let model = build_model_client(&config)?;
        Ok(Self {
            config,
            history,
            credentials,
            model,
        })
    }

    /// Swaps in a newly selected API key for subsequent requests.
    pub fn set_api_key(&mut self, api_key: String, source: CredentialSource) -> Result<()> {
        self.config.api_key = Some(api_key);
        self.config.api_key_source = Some(source);
        self.model = build_model_client(&self.config)?;
        Ok(())
    }
}

fn build_model_client(config: &Config) -> Result<Arc<dyn ModelClient>> {
    let client = GeminiClient::new(config.api_key.clone(), config.api_base.clone())?;
    Ok(Arc::new(client))
}
