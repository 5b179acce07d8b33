use serde::{Deserialize, Serialize};

/// A resume the user saved for reuse across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedResume {
    pub id: String,
    pub name: String,
    pub content: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// A job description (and/or posting URL) saved after an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedJob {
    pub id: String,
    pub name: String,
    pub content: String,
    /// Empty when the job was entered as text only.
    #[serde(default)]
    pub url: String,
    pub timestamp: i64,
}

/// Common view over both history lists, used by lookup and rendering code.
pub trait HistoryEntry {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn timestamp(&self) -> i64;
}

impl HistoryEntry for SavedResume {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

impl HistoryEntry for SavedJob {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
