use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub sync: Option<SyncConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncConfig {
    pub remote_url: Option<String>,
    pub interval_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    /// Merge stance: "append" or "replace".
    pub policy: Option<String>,
    pub push: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
}

/// Platform config directory path: `<config_dir>/quotekeeper/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("quotekeeper").join("config.toml"))
}

/// Load config by cascading CWD `.quotekeeper.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".quotekeeper.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        sync: Some(SyncConfig {
            remote_url: overlay
                .sync
                .as_ref()
                .and_then(|s| s.remote_url.clone())
                .or_else(|| base.sync.as_ref().and_then(|s| s.remote_url.clone())),
            interval_secs: overlay
                .sync
                .as_ref()
                .and_then(|s| s.interval_secs)
                .or_else(|| base.sync.as_ref().and_then(|s| s.interval_secs)),
            timeout_secs: overlay
                .sync
                .as_ref()
                .and_then(|s| s.timeout_secs)
                .or_else(|| base.sync.as_ref().and_then(|s| s.timeout_secs)),
            policy: overlay
                .sync
                .as_ref()
                .and_then(|s| s.policy.clone())
                .or_else(|| base.sync.as_ref().and_then(|s| s.policy.clone())),
            push: overlay
                .sync
                .as_ref()
                .and_then(|s| s.push)
                .or_else(|| base.sync.as_ref().and_then(|s| s.push)),
        }),
        storage: Some(StorageConfig {
            data_dir: overlay
                .storage
                .as_ref()
                .and_then(|s| s.data_dir.clone())
                .or_else(|| base.storage.as_ref().and_then(|s| s.data_dir.clone())),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}
