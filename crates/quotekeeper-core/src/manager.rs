//! Controller owning the store and its collaborators.
//!
//! The UI surface talks only to [`QuoteManager`]: rendering layers receive
//! snapshots and emit events back in, and never touch storage or the network
//! directly. Every mutation persists the store durably before returning.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::notify::Notifier;
use crate::select;
use crate::storage::Storage;
use crate::store::QuoteStore;
use crate::sync::{self, RemoteSource, SyncOptions, SyncOutcome};
use crate::transfer;
use crate::{CoreError, Quote};

pub struct QuoteManager {
    store: Arc<Mutex<QuoteStore>>,
    storage: Arc<Storage>,
    notifier: Arc<Notifier>,
    options: SyncOptions,
}

impl QuoteManager {
    /// Open the manager: load the durable store, falling back to the seed
    /// set (which is persisted immediately).
    pub fn open(storage: Storage, options: SyncOptions) -> Self {
        let store = QuoteStore::load(&storage);
        tracing::info!(quotes = store.len(), "store loaded");
        Self {
            store: Arc::new(Mutex::new(store)),
            storage: Arc::new(storage),
            notifier: Arc::new(Notifier::new()),
            options,
        }
    }

    fn store(&self) -> MutexGuard<'_, QuoteStore> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Shared store handle for the sync loop.
    pub fn store_handle(&self) -> Arc<Mutex<QuoteStore>> {
        self.store.clone()
    }

    /// Shared storage handle for the sync loop.
    pub fn storage_handle(&self) -> Arc<Storage> {
        self.storage.clone()
    }

    pub fn notifier(&self) -> Arc<Notifier> {
        self.notifier.clone()
    }

    pub fn options(&self) -> &SyncOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.store().len()
    }

    pub fn is_empty(&self) -> bool {
        self.store().is_empty()
    }

    pub fn categories(&self) -> Vec<String> {
        self.store().categories()
    }

    /// Snapshot of the quotes matching `selection`.
    pub fn filtered(&self, selection: &str) -> Vec<Quote> {
        self.store()
            .filtered(selection)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Snapshot of the full sequence.
    pub fn quotes(&self) -> Vec<Quote> {
        self.store().quotes().to_vec()
    }

    /// Validate and append a quote, persisting the store on success.
    pub fn add_quote(&self, text: &str, category: &str) -> Result<(), CoreError> {
        let mut store = self.store();
        store.add(text, category)?;
        self.storage.save_quotes(store.quotes())?;
        Ok(())
    }

    /// Import a raw JSON document, appending all well-formed entries.
    ///
    /// Returns the number appended. A malformed document is rejected
    /// wholesale and the store stays untouched.
    pub fn import_quotes(&self, raw: &str) -> Result<usize, CoreError> {
        let quotes = transfer::import_json(raw)?;
        let count = quotes.len();
        let mut store = self.store();
        store.extend(quotes);
        self.storage.save_quotes(store.quotes())?;
        Ok(count)
    }

    /// Serialize the full store as a pretty-printed JSON document.
    pub fn export_quotes(&self) -> Result<String, CoreError> {
        let store = self.store();
        Ok(transfer::export_json(store.quotes())?)
    }

    /// Pick a random quote from the pool selected by the durably saved
    /// filter, recording it as the session's last-shown quote.
    pub fn show_random(&self) -> Option<Quote> {
        let selection = self.storage.load_filter();
        self.show_random_from(&selection)
    }

    /// Like [`show_random`](Self::show_random) with an explicit selection.
    pub fn show_random_from(&self, selection: &str) -> Option<Quote> {
        let picked = {
            let store = self.store();
            let pool = store.filtered(selection);
            select::pick_random(&pool)?.clone()
        };
        if let Err(e) = self.storage.save_session(&picked) {
            tracing::warn!(error = %e, "failed to record last-shown quote");
        }
        Some(picked)
    }

    /// The quote last shown in this session, if any.
    pub fn last_shown(&self) -> Option<Quote> {
        self.storage.load_session()
    }

    /// Record the filter used by subsequent `show_random` calls.
    pub fn set_filter(&self, value: &str) -> Result<(), CoreError> {
        self.storage.save_filter(value)?;
        Ok(())
    }

    pub fn current_filter(&self) -> String {
        self.storage.load_filter()
    }

    /// Run a single sync tick against `remote`, recording a transient
    /// notice describing what changed.
    pub async fn trigger_sync(&self, remote: &dyn RemoteSource) -> SyncOutcome {
        let client = reqwest::Client::new();
        let outcome =
            sync::sync_once(&self.store, &self.storage, remote, &client, &self.options).await;
        self.notify_outcome(remote.name(), &outcome);
        outcome
    }

    fn notify_outcome(&self, source: &str, outcome: &SyncOutcome) {
        match outcome {
            SyncOutcome::Merged { added } if *added > 0 => self
                .notifier
                .push(format!("{} new quote(s) from {}", added, source)),
            SyncOutcome::Merged { .. } => {}
            SyncOutcome::Replaced { total } => self
                .notifier
                .push(format!("quotes replaced by {} snapshot ({} total)", source, total)),
            SyncOutcome::Failed { error } => self
                .notifier
                .push(format!("sync with {} failed: {}", source, error)),
        }
    }

    /// Best-effort push of a quote to `remote`. Failures are logged and
    /// otherwise ignored.
    pub async fn push_quote(&self, remote: &dyn RemoteSource, quote: &Quote) {
        let client = reqwest::Client::new();
        sync::push_quote(remote, &client, self.options.timeout, quote).await;
    }

    /// Clear session-scoped state. Called at session teardown.
    pub fn teardown(&self) {
        self.storage.clear_session();
    }
}
