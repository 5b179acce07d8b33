//! Saved resumes and jobs, kept as two most-recent-first lists.
//!
//! Entries are write-once: they can be saved and deleted, never edited. Every
//! mutation re-persists the whole list under its storage key.

pub mod kv;

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::history::{HistoryEntry, SavedJob, SavedResume};
use kv::{KeyValueStore, StoreError};

pub const RESUME_STORAGE_KEY: &str = "pm_match_resumes";
pub const JOB_STORAGE_KEY: &str = "pm_match_jobs";

/// Title used when a resume is saved without one.
pub const DEFAULT_RESUME_NAME: &str = "My Resume";

/// A job save is skipped if a job with the same name was saved this recently.
pub fn duplicate_window() -> Duration {
    Duration::minutes(5)
}

pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    resumes: Vec<SavedResume>,
    jobs: Vec<SavedJob>,
}

impl HistoryStore {
    /// Reads both lists. Missing or unparseable data starts an empty list;
    /// the problem is logged and never surfaced.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let resumes = load_list(store.as_ref(), RESUME_STORAGE_KEY);
        let jobs = load_list(store.as_ref(), JOB_STORAGE_KEY);
        debug!(
            resumes = resumes.len(),
            jobs = jobs.len(),
            "History loaded"
        );
        Self {
            store,
            resumes,
            jobs,
        }
    }

    pub fn resumes(&self) -> &[SavedResume] {
        &self.resumes
    }

    pub fn jobs(&self) -> &[SavedJob] {
        &self.jobs
    }

    pub fn find_resume(&self, id: &str) -> Option<&SavedResume> {
        find_by_id(&self.resumes, id)
    }

    pub fn find_job(&self, id: &str) -> Option<&SavedJob> {
        find_by_id(&self.jobs, id)
    }

    pub fn save_resume(
        &mut self,
        title: &str,
        content: &str,
    ) -> Result<Option<SavedResume>, StoreError> {
        self.save_resume_at(title, content, Utc::now().timestamp_millis())
    }

    /// Prepends a resume entry. Blank content is a no-op.
    pub fn save_resume_at(
        &mut self,
        title: &str,
        content: &str,
        now_ms: i64,
    ) -> Result<Option<SavedResume>, StoreError> {
        if content.trim().is_empty() {
            return Ok(None);
        }
        let name = match title.trim() {
            "" => DEFAULT_RESUME_NAME.to_string(),
            t => t.to_string(),
        };

        let entry = SavedResume {
            id: Uuid::new_v4().to_string(),
            name,
            content: content.to_string(),
            timestamp: now_ms,
        };
        let updated = prepended(&entry, &self.resumes);
        persist_list(self.store.as_ref(), RESUME_STORAGE_KEY, &updated)?;
        self.resumes = updated;
        info!(id = %entry.id, name = %entry.name, "Resume saved to history");
        Ok(Some(entry))
    }

    pub fn save_job(
        &mut self,
        name: &str,
        content: &str,
        url: &str,
    ) -> Result<Option<SavedJob>, StoreError> {
        self.save_job_at(name, content, url, Utc::now().timestamp_millis())
    }

    /// Prepends a job entry. Skipped when both content and url are blank, or
    /// when a job with the same name (case-insensitive) was saved less than
    /// five minutes before `now_ms`.
    pub fn save_job_at(
        &mut self,
        name: &str,
        content: &str,
        url: &str,
        now_ms: i64,
    ) -> Result<Option<SavedJob>, StoreError> {
        if content.trim().is_empty() && url.trim().is_empty() {
            return Ok(None);
        }

        let window_ms = duplicate_window().num_milliseconds();
        let lowered = name.to_lowercase();
        let is_duplicate = self
            .jobs
            .iter()
            .any(|j| j.name.to_lowercase() == lowered && now_ms - j.timestamp < window_ms);
        if is_duplicate {
            debug!(name, "Skipping job save: same company saved recently");
            return Ok(None);
        }

        let entry = SavedJob {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            content: content.to_string(),
            url: url.to_string(),
            timestamp: now_ms,
        };
        let updated = prepended(&entry, &self.jobs);
        persist_list(self.store.as_ref(), JOB_STORAGE_KEY, &updated)?;
        self.jobs = updated;
        info!(id = %entry.id, name = %entry.name, "Job saved to history");
        Ok(Some(entry))
    }

    // Mutations build the new list and swap it in only after it is persisted,
    // so a failed write leaves memory matching what is on disk.

    /// Removes the resume with exactly this id. Returns whether one was removed.
    pub fn delete_resume(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(updated) = without_id(&self.resumes, id) else {
            return Ok(false);
        };
        persist_list(self.store.as_ref(), RESUME_STORAGE_KEY, &updated)?;
        self.resumes = updated;
        Ok(true)
    }

    /// Removes the job with exactly this id. Returns whether one was removed.
    pub fn delete_job(&mut self, id: &str) -> Result<bool, StoreError> {
        let Some(updated) = without_id(&self.jobs, id) else {
            return Ok(false);
        };
        persist_list(self.store.as_ref(), JOB_STORAGE_KEY, &updated)?;
        self.jobs = updated;
        Ok(true)
    }
}

fn load_list<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Could not read history; starting empty");
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(key, error = %e, "Stored history is not valid JSON; starting empty");
        Vec::new()
    })
}

fn persist_list<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(items)?;
    store.set(key, &raw)
}

/// Exact id match first, then a unique prefix (ids are long to type).
fn find_by_id<'a, T: HistoryEntry>(items: &'a [T], id: &str) -> Option<&'a T> {
    if id.is_empty() {
        return None;
    }
    if let Some(exact) = items.iter().find(|e| e.id() == id) {
        return Some(exact);
    }
    let mut matches = items.iter().filter(|e| e.id().starts_with(id));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Some(only),
        _ => None,
    }
}

fn prepended<T: Clone>(entry: &T, items: &[T]) -> Vec<T> {
    let mut updated = Vec::with_capacity(items.len() + 1);
    updated.push(entry.clone());
    updated.extend_from_slice(items);
    updated
}

/// The list minus entries with this id, or `None` when nothing matches.
fn without_id<T: HistoryEntry + Clone>(items: &[T], id: &str) -> Option<Vec<T>> {
    let updated: Vec<T> = items.iter().filter(|e| e.id() != id).cloned().collect();
    (updated.len() != items.len()).then_some(updated)
}
