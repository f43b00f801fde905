use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config_file;
pub mod manager;
pub mod notify;
pub mod select;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

// Re-export for convenience
pub use manager::QuoteManager;
pub use notify::{Notice, Notifier};
pub use select::{ALL_CATEGORY, pick_random};
pub use storage::{Storage, StorageError};
pub use store::{MergeOutcome, MergePolicy, QuoteStore, StoreError};
pub use sync::{RemoteError, RemoteSource, SyncEvent, SyncOptions, SyncOutcome};
pub use transfer::{ImportError, export_json, import_json};

/// A single quote record: the text and the category it belongs to.
///
/// Field order is significant: it fixes the key order of exported JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub category: String,
}

impl Quote {
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Identity used for de-duplication during merges: the (text, category)
    /// pair. Equality on text alone is too coarse; the same line can appear
    /// under two categories legitimately.
    pub fn identity(&self) -> (&str, &str) {
        (&self.text, &self.category)
    }
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("store error: {0}")]
    Store(#[from] store::StoreError),
    #[error("storage error: {0}")]
    Storage(#[from] storage::StorageError),
    #[error("import error: {0}")]
    Import(#[from] transfer::ImportError),
    #[error("remote error: {0}")]
    Remote(#[from] sync::RemoteError),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
