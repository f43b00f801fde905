//! Filesystem-backed persistence for the quote store.
//!
//! Two durable slots live under the data directory: `quotes.json` (the full
//! sequence as a JSON array of `{text, category}`) and `filter` (the last
//! selected category). One session-scoped slot holds the last-shown quote
//! under a per-process directory beneath the OS temp dir; it is removed by
//! [`clear_session`](Storage::clear_session) at session teardown.
//!
//! Loads fail closed: malformed content yields `None` plus a warning, never
//! an error. Writes are whole-document: a temp file in the target directory
//! followed by a rename.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::Quote;
use crate::select::ALL_CATEGORY;

const QUOTES_FILE: &str = "quotes.json";
const FILTER_FILE: &str = "filter";
const SESSION_FILE: &str = "session.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
    session_dir: PathBuf,
}

impl Storage {
    /// Storage rooted at `<platform data dir>/quotekeeper`, with the session
    /// slot under the OS temp dir keyed by process id so concurrent sessions
    /// do not collide.
    pub fn open_default() -> Option<Self> {
        let data_dir = dirs::data_dir()?.join("quotekeeper");
        Some(Self::with_data_dir(data_dir))
    }

    /// Storage with an explicit data directory and the default session slot.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self::open(data_dir, default_session_dir())
    }

    pub fn open(data_dir: PathBuf, session_dir: PathBuf) -> Self {
        Self {
            data_dir,
            session_dir,
        }
    }

    fn quotes_path(&self) -> PathBuf {
        self.data_dir.join(QUOTES_FILE)
    }

    fn filter_path(&self) -> PathBuf {
        self.data_dir.join(FILTER_FILE)
    }

    fn session_path(&self) -> PathBuf {
        self.session_dir.join(SESSION_FILE)
    }

    /// Read the durable quote sequence. `None` when absent or malformed.
    pub fn load_quotes(&self) -> Option<Vec<Quote>> {
        let content = fs::read_to_string(self.quotes_path()).ok()?;
        match serde_json::from_str(&content) {
            Ok(quotes) => Some(quotes),
            Err(e) => {
                tracing::warn!(error = %e, "malformed durable quotes, falling back");
                None
            }
        }
    }

    /// Write the full quote sequence durably.
    pub fn save_quotes(&self, quotes: &[Quote]) -> Result<(), StorageError> {
        let content = serde_json::to_string_pretty(quotes)?;
        self.write_atomic(&self.quotes_path(), content.as_bytes())
    }

    /// The durably persisted filter value, defaulting to the `"all"`
    /// sentinel when absent.
    pub fn load_filter(&self) -> String {
        fs::read_to_string(self.filter_path())
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| ALL_CATEGORY.to_string())
    }

    /// Persist the filter value, overwriting any previous one.
    pub fn save_filter(&self, value: &str) -> Result<(), StorageError> {
        self.write_atomic(&self.filter_path(), value.as_bytes())
    }

    /// The last-shown quote recorded in this session, if any.
    pub fn load_session(&self) -> Option<Quote> {
        let content = fs::read_to_string(self.session_path()).ok()?;
        match serde_json::from_str(&content) {
            Ok(quote) => Some(quote),
            Err(e) => {
                tracing::warn!(error = %e, "malformed session slot, ignoring");
                None
            }
        }
    }

    /// Record the last-shown quote in the session slot.
    pub fn save_session(&self, quote: &Quote) -> Result<(), StorageError> {
        let content = serde_json::to_string(quote)?;
        self.write_atomic(&self.session_path(), content.as_bytes())
    }

    /// Remove the session slot. Called at session teardown.
    pub fn clear_session(&self) {
        let _ = fs::remove_file(self.session_path());
        let _ = fs::remove_dir(&self.session_dir);
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

fn default_session_dir() -> PathBuf {
    std::env::temp_dir().join(format!("quotekeeper-{}", std::process::id()))
}
