//! Periodic reconciliation of the local store against a remote quote source.
//!
//! Each tick is independent: fetch the remote snapshot, apply the configured
//! merge policy, persist on mutation. A failed fetch skips the tick: the
//! store is never touched and there is no immediate retry; the next
//! scheduled tick proceeds on its own. Ticks run start-to-finish inside the
//! loop body, so a new fetch never starts while one is outstanding.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::Quote;
use crate::storage::Storage;
use crate::store::{MergeOutcome, MergePolicy, QuoteStore};

pub mod http;
pub mod mock;

/// Error type for remote fetch/push failures.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response: {0}")]
    Response(String),
}

/// A remote quote source the store can reconcile against.
pub trait RemoteSource: Send + Sync {
    /// The canonical name of this source (e.g. "server").
    fn name(&self) -> &str;

    /// Fetch the remote quote snapshot.
    fn fetch<'a>(
        &'a self,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Quote>, RemoteError>> + Send + 'a>>;

    /// Send one locally added quote to the remote source.
    fn push<'a>(
        &'a self,
        client: &'a reqwest::Client,
        timeout: Duration,
        quote: &'a Quote,
    ) -> Pin<Box<dyn Future<Output = Result<(), RemoteError>> + Send + 'a>>;
}

/// Configuration for the sync policy.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Merge stance applied on every tick. Chosen once, never mixed.
    pub policy: MergePolicy,
    /// Period between ticks.
    pub interval: Duration,
    /// Bounded per-request timeout so a hung remote cannot block the next
    /// tick indefinitely.
    pub timeout: Duration,
    /// Best-effort push of newly added quotes to the remote source.
    pub push: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            policy: MergePolicy::Append,
            interval: Duration::from_secs(15),
            timeout: Duration::from_secs(8),
            push: false,
        }
    }
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Append policy: number of previously unseen quotes merged in.
    Merged { added: usize },
    /// Replace policy: store length after the remote snapshot replaced it.
    Replaced { total: usize },
    /// Fetch or decode failed; the store was left untouched.
    Failed { error: String },
}

/// Progress events emitted by the sync loop.
#[derive(Debug, Clone)]
pub enum SyncEvent {
    /// A tick started fetching from the named source.
    Fetching { source: String },
    /// A tick finished with the given outcome.
    Finished { source: String, outcome: SyncOutcome },
}

/// Run one sync tick against `remote`.
///
/// The store mutex is taken only after the fetch completes and is never
/// held across an await. Merge results are applied unconditionally on
/// arrival; the data model has no versioning to detect staleness. The store
/// is persisted whenever the tick mutated it.
pub async fn sync_once(
    store: &Mutex<QuoteStore>,
    storage: &Storage,
    remote: &dyn RemoteSource,
    client: &reqwest::Client,
    options: &SyncOptions,
) -> SyncOutcome {
    let incoming = match remote.fetch(client, options.timeout).await {
        Ok(incoming) => incoming,
        Err(e) => {
            tracing::warn!(source = remote.name(), error = %e, "fetch failed, skipping tick");
            return SyncOutcome::Failed {
                error: e.to_string(),
            };
        }
    };

    let (outcome, snapshot) = {
        let mut guard = store.lock().unwrap_or_else(|e| e.into_inner());
        let merged = guard.merge(incoming, options.policy);
        let outcome = match merged {
            MergeOutcome::Added(added) => SyncOutcome::Merged { added },
            MergeOutcome::Replaced(total) => SyncOutcome::Replaced { total },
        };
        let mutated = !matches!(outcome, SyncOutcome::Merged { added: 0 });
        (outcome, mutated.then(|| guard.quotes().to_vec()))
    };

    if let Some(quotes) = snapshot {
        if let Err(e) = storage.save_quotes(&quotes) {
            tracing::warn!(error = %e, "failed to persist sync result");
        }
    }
    outcome
}

/// Best-effort push of a newly added quote.
///
/// Failures are logged and otherwise ignored; the local store stays the
/// source of truth for anything the push does not affect.
pub async fn push_quote(
    remote: &dyn RemoteSource,
    client: &reqwest::Client,
    timeout: Duration,
    quote: &Quote,
) {
    if let Err(e) = remote.push(client, timeout, quote).await {
        tracing::warn!(source = remote.name(), error = %e, "push failed");
    }
}

/// Run the periodic sync loop until `cancel` fires.
///
/// The first tick runs immediately; missed ticks are skipped rather than
/// bursted. Progress is reported through `on_event`.
pub async fn run(
    store: Arc<Mutex<QuoteStore>>,
    storage: Arc<Storage>,
    remote: Arc<dyn RemoteSource>,
    options: SyncOptions,
    on_event: impl Fn(SyncEvent) + Send + Sync + 'static,
    cancel: CancellationToken,
) {
    let client = reqwest::Client::new();
    let mut tick = tokio::time::interval(options.interval);
    tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tick.tick() => {
                on_event(SyncEvent::Fetching {
                    source: remote.name().to_string(),
                });
                let outcome =
                    sync_once(&store, &storage, remote.as_ref(), &client, &options).await;
                on_event(SyncEvent::Finished {
                    source: remote.name().to_string(),
                    outcome,
                });
            }
        }
    }
}
