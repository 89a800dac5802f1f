//! # Chatmoji Configuration
//!
//! Settings for the emoji engine: which platform's images to prefer, where
//! the dataset lives and where each platform's images are served from.
//!
//! Configuration sources (in priority order):
//! 1. Environment variables (`CHATMOJI_EMOJI__PLATFORM=apple`)
//! 2. User config (~/.config/chatmoji/config.toml)
//! 3. Defaults

use chatmoji_core::{AssetSources, Platform};
use crossbeam_channel::Receiver;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use notify::{recommended_watcher, Event, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Get the configuration directory
pub fn config_dir() -> PathBuf {
    ProjectDirs::from("dev", "chatmoji", "Chatmoji")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config/chatmoji"))
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Emoji matching and rendering
    pub emoji: EmojiConfig,
    /// Image base URLs per platform
    pub assets: AssetConfig,
}

impl Config {
    /// Whether applying `other` requires re-resolving emoji handles
    pub fn handles_changed(&self, other: &Config) -> bool {
        self.emoji.platform != other.emoji.platform || self.assets != other.assets
    }
}

/// Emoji settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmojiConfig {
    /// Preferred image set
    pub platform: Platform,
    /// Path to `emoji.json`; defaults to `emoji.json` in the config directory
    pub dataset: Option<PathBuf>,
    /// Maximum number of shortcode completions
    pub completion_limit: usize,
}

impl Default for EmojiConfig {
    fn default() -> Self {
        Self {
            platform: Platform::Twitter,
            dataset: None,
            completion_limit: 10,
        }
    }
}

impl EmojiConfig {
    pub fn dataset_path(&self) -> PathBuf {
        self.dataset
            .clone()
            .unwrap_or_else(|| config_dir().join("emoji.json"))
    }
}

/// Base URLs the 64px images are fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub apple: String,
    pub google: String,
    pub twitter: String,
    pub facebook: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        let url = |platform: &str| format!("https://pajbot.com/static/emoji-v2/img/{platform}/64/");
        Self {
            apple: url("apple"),
            google: url("google"),
            twitter: url("twitter"),
            facebook: url("facebook"),
        }
    }
}

impl AssetConfig {
    /// Asset table for the core; blank URLs are left out and use the fallback
    pub fn to_sources(&self) -> AssetSources {
        [
            (Platform::Apple, &self.apple),
            (Platform::Google, &self.google),
            (Platform::Twitter, &self.twitter),
            (Platform::Facebook, &self.facebook),
        ]
        .into_iter()
        .filter(|(_, url)| !url.trim().is_empty())
        .fold(AssetSources::empty(), |sources, (platform, url)| {
            sources.with_base_url(platform, url.clone())
        })
    }
}

/// Configuration manager with hot-reloading
pub struct ConfigManager {
    config: Arc<RwLock<Config>>,
    config_path: PathBuf,
    watcher: Option<notify::RecommendedWatcher>,
}

impl ConfigManager {
    /// Create a new config manager using the default config file
    pub fn new() -> anyhow::Result<Self> {
        Self::with_path(config_dir().join("config.toml"))
    }

    /// Create a config manager for a specific file; it need not exist yet
    pub fn with_path(config_path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let config_path = config_path.into();
        let config = Self::load_from_file(&config_path)?;

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            config_path,
            watcher: None,
        })
    }

    /// Load configuration from file, environment and defaults
    fn load_from_file(path: &Path) -> anyhow::Result<Config> {
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("CHATMOJI_").split("__"));

        Ok(figment.extract()?)
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Get current configuration
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Update configuration
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Config),
    {
        let mut config = self.config.write();
        f(&mut config);
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        let config = self.config.read();
        let content = toml::to_string_pretty(&*config)?;

        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Enable hot-reloading of configuration.
    ///
    /// Every successful reload is sent on the returned channel; the receiver
    /// decides what to re-resolve.
    pub fn enable_hot_reload(&mut self) -> anyhow::Result<Receiver<Config>> {
        let config = Arc::clone(&self.config);
        let config_path = self.config_path.clone();
        let (tx, rx) = crossbeam_channel::unbounded();

        let mut watcher = recommended_watcher(move |res: Result<Event, _>| {
            if let Ok(event) = res {
                if event.kind.is_modify() {
                    match Self::load_from_file(&config_path) {
                        Ok(new_config) => {
                            *config.write() = new_config.clone();
                            tracing::info!("Configuration reloaded");
                            let _ = tx.send(new_config);
                        }
                        Err(err) => tracing::warn!("Ignoring invalid configuration: {}", err),
                    }
                }
            }
        })?;

        watcher.watch(&self.config_path, RecursiveMode::NonRecursive)?;
        self.watcher = Some(watcher);

        Ok(rx)
    }
}
