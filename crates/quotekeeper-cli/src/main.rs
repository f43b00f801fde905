use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use quotekeeper_core::QuoteManager;
use quotekeeper_core::config_file::{self, ConfigFile};
use quotekeeper_core::storage::Storage;
use quotekeeper_core::store::MergePolicy;
use quotekeeper_core::sync::http::{DEFAULT_REMOTE_URL, HttpRemoteSource};
use quotekeeper_core::sync::{self, RemoteSource, SyncOptions};

mod output;

use output::ColorMode;

/// Quote manager - keep, filter, and sync a local collection of quotes
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Override the data directory holding quotes.json and the filter slot
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a random quote from the saved category filter
    Show {
        /// Pick from this category instead of the saved filter
        #[arg(long)]
        category: Option<String>,

        /// Re-display the quote last shown in this session
        #[arg(long)]
        last: bool,
    },

    /// Add a new quote
    Add {
        text: String,
        category: String,

        /// Best-effort push of the new quote to the remote source
        #[arg(long)]
        push: bool,
    },

    /// List quotes, optionally restricted to one category
    List {
        #[arg(long)]
        category: Option<String>,
    },

    /// List the known categories
    Categories,

    /// Record the category filter used by `show`
    Filter { value: String },

    /// Import quotes from a JSON file (array of {text, category})
    Import { file: PathBuf },

    /// Export all quotes as pretty-printed JSON
    Export {
        /// Output path
        #[arg(short, long, default_value = "quotes.json")]
        output: PathBuf,
    },

    /// Run a single sync tick against the remote source
    Sync {
        /// Remote base URL
        #[arg(long)]
        remote_url: Option<String>,

        /// Merge stance: append | replace
        #[arg(long)]
        policy: Option<MergePolicy>,
    },

    /// Periodically sync against the remote source until Ctrl-C
    Watch {
        /// Remote base URL
        #[arg(long)]
        remote_url: Option<String>,

        /// Merge stance: append | replace
        #[arg(long)]
        policy: Option<MergePolicy>,

        /// Seconds between ticks
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let color = ColorMode(!cli.no_color);
    let config = config_file::load_config();
    let storage = open_storage(cli.data_dir, &config)?;

    match cli.command {
        Command::Show { category, last } => show(storage, &config, category, last, color),
        Command::Add {
            text,
            category,
            push,
        } => add(storage, &config, &text, &category, push, color).await,
        Command::List { category } => list(storage, &config, category, color),
        Command::Categories => categories(storage, &config, color),
        Command::Filter { value } => set_filter(storage, &config, &value, color),
        Command::Import { file } => import(storage, &config, &file, color),
        Command::Export { output } => export(storage, &config, &output, color),
        Command::Sync { remote_url, policy } => {
            sync_tick(storage, &config, remote_url, policy, color).await
        }
        Command::Watch {
            remote_url,
            policy,
            interval,
        } => watch(storage, &config, remote_url, policy, interval, color).await,
    }
}

/// Resolve the storage location: flag > env > config file > platform default.
fn open_storage(flag: Option<PathBuf>, config: &ConfigFile) -> anyhow::Result<Storage> {
    let data_dir = flag
        .or_else(|| std::env::var("QUOTEKEEPER_DATA_DIR").ok().map(PathBuf::from))
        .or_else(|| {
            config
                .storage
                .as_ref()
                .and_then(|s| s.data_dir.clone())
                .map(PathBuf::from)
        });

    match data_dir {
        Some(dir) => Ok(Storage::with_data_dir(dir)),
        None => Storage::open_default().context("could not determine a data directory"),
    }
}

/// Resolve the remote URL and sync options: flags > env vars > config file >
/// defaults.
fn resolve_sync(
    config: &ConfigFile,
    remote_url: Option<String>,
    policy: Option<MergePolicy>,
    interval: Option<u64>,
) -> (String, SyncOptions) {
    let sync_config = config.sync.as_ref();

    let url = remote_url
        .or_else(|| std::env::var("QUOTEKEEPER_REMOTE_URL").ok())
        .or_else(|| sync_config.and_then(|s| s.remote_url.clone()))
        .unwrap_or_else(|| DEFAULT_REMOTE_URL.to_string());

    let policy = policy
        .or_else(|| {
            std::env::var("QUOTEKEEPER_SYNC_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or_else(|| {
            sync_config
                .and_then(|s| s.policy.as_deref())
                .and_then(|v| v.parse().ok())
        });

    let defaults = SyncOptions::default();
    let options = SyncOptions {
        policy: policy.unwrap_or(defaults.policy),
        interval: interval
            .or_else(|| sync_config.and_then(|s| s.interval_secs))
            .map(Duration::from_secs)
            .unwrap_or(defaults.interval),
        timeout: sync_config
            .and_then(|s| s.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
        push: sync_config.and_then(|s| s.push).unwrap_or(defaults.push),
    };

    (url, options)
}

fn open_manager(storage: Storage, config: &ConfigFile) -> QuoteManager {
    let (_, options) = resolve_sync(config, None, None, None);
    QuoteManager::open(storage, options)
}

fn show(
    storage: Storage,
    config: &ConfigFile,
    category: Option<String>,
    last: bool,
    color: ColorMode,
) -> anyhow::Result<()> {
    let manager = open_manager(storage, config);
    let mut w = std::io::stdout();

    if last {
        match manager.last_shown() {
            Some(quote) => output::print_quote(&mut w, &quote, color)?,
            None => writeln!(w, "No quote shown yet this session.")?,
        }
        return Ok(());
    }

    let selection = category.unwrap_or_else(|| manager.current_filter());
    match manager.show_random_from(&selection) {
        Some(quote) => output::print_quote(&mut w, &quote, color)?,
        None => output::print_empty_state(&mut w, &selection, color)?,
    }
    Ok(())
}

async fn add(
    storage: Storage,
    config: &ConfigFile,
    text: &str,
    category: &str,
    push: bool,
    _color: ColorMode,
) -> anyhow::Result<()> {
    let (url, options) = resolve_sync(config, None, None, None);
    let push = push || options.push;
    let manager = QuoteManager::open(storage, options);
    manager
        .add_quote(text, category)
        .context("quote rejected")?;

    let mut w = std::io::stdout();
    writeln!(w, "Quote added ({} total).", manager.len())?;

    if push {
        let remote = HttpRemoteSource::new(url);
        let quote = quotekeeper_core::Quote::new(text.trim(), category.trim());
        manager.push_quote(&remote, &quote).await;
        writeln!(w, "Pushed to the remote source (best effort).")?;
    }
    Ok(())
}

fn list(
    storage: Storage,
    config: &ConfigFile,
    category: Option<String>,
    color: ColorMode,
) -> anyhow::Result<()> {
    let manager = open_manager(storage, config);
    let selection = category.unwrap_or_else(|| quotekeeper_core::ALL_CATEGORY.to_string());
    let quotes = manager.filtered(&selection);

    let mut w = std::io::stdout();
    if quotes.is_empty() {
        output::print_empty_state(&mut w, &selection, color)?;
    } else {
        output::print_quote_list(&mut w, &quotes, color)?;
    }
    Ok(())
}

fn categories(storage: Storage, config: &ConfigFile, color: ColorMode) -> anyhow::Result<()> {
    let manager = open_manager(storage, config);
    let mut w = std::io::stdout();
    output::print_categories(&mut w, &manager.categories(), &manager.current_filter(), color)?;
    Ok(())
}

fn set_filter(
    storage: Storage,
    config: &ConfigFile,
    value: &str,
    color: ColorMode,
) -> anyhow::Result<()> {
    let manager = open_manager(storage, config);
    manager.set_filter(value)?;

    let mut w = std::io::stdout();
    writeln!(w, "Filter set to '{}'.", value)?;
    if manager.filtered(value).is_empty() {
        output::print_empty_state(&mut w, value, color)?;
    }
    Ok(())
}

fn import(
    storage: Storage,
    config: &ConfigFile,
    file: &PathBuf,
    _color: ColorMode,
) -> anyhow::Result<()> {
    let manager = open_manager(storage, config);
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("could not read {}", file.display()))?;
    let count = manager
        .import_quotes(&raw)
        .context("import rejected, store unchanged")?;

    let mut w = std::io::stdout();
    writeln!(w, "Imported {} quote(s) ({} total).", count, manager.len())?;
    Ok(())
}

fn export(
    storage: Storage,
    config: &ConfigFile,
    output: &PathBuf,
    _color: ColorMode,
) -> anyhow::Result<()> {
    let manager = open_manager(storage, config);
    let document = manager.export_quotes()?;
    std::fs::write(output, document)
        .with_context(|| format!("could not write {}", output.display()))?;

    let mut w = std::io::stdout();
    writeln!(
        w,
        "Exported {} quote(s) to {}.",
        manager.len(),
        output.display()
    )?;
    Ok(())
}

async fn sync_tick(
    storage: Storage,
    config: &ConfigFile,
    remote_url: Option<String>,
    policy: Option<MergePolicy>,
    color: ColorMode,
) -> anyhow::Result<()> {
    let (url, options) = resolve_sync(config, remote_url, policy, None);
    let manager = QuoteManager::open(storage, options);
    let remote = HttpRemoteSource::new(url);

    let outcome = manager.trigger_sync(&remote).await;
    let mut w = std::io::stdout();
    output::print_outcome(&mut w, &outcome, color)?;
    Ok(())
}

async fn watch(
    storage: Storage,
    config: &ConfigFile,
    remote_url: Option<String>,
    policy: Option<MergePolicy>,
    interval: Option<u64>,
    color: ColorMode,
) -> anyhow::Result<()> {
    let (url, options) = resolve_sync(config, remote_url, policy, interval);
    let manager = QuoteManager::open(storage, options.clone());
    let remote: Arc<dyn RemoteSource> = Arc::new(HttpRemoteSource::new(url.clone()));

    let mut w = std::io::stdout();
    writeln!(
        w,
        "Syncing with {} every {}s ({}). Ctrl-C to stop.",
        url,
        options.interval.as_secs(),
        options.policy
    )?;

    let cancel = CancellationToken::new();
    let loop_handle = tokio::spawn(sync::run(
        manager.store_handle(),
        manager.storage_handle(),
        remote,
        options,
        move |event| {
            let mut w = std::io::stdout();
            let _ = output::print_sync_event(&mut w, &event, color);
        },
        cancel.clone(),
    ));

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl-C")?;
    cancel.cancel();
    let _ = loop_handle.await;

    manager.teardown();
    writeln!(w, "Session ended.")?;
    Ok(())
}
