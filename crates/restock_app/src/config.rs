//! Config file loading and validation for the restock binary.
//!
//! The config is a ron document:
//!
//! ```ron
//! (
//!     state_dir: ".",
//!     targets: [
//!         (
//!             name: "widget",
//!             urls: ["https://shop.example/widget"],
//!             must_contain_any: ["add to cart"],
//!             out_of_stock_patterns: ["(?i)sold out"],
//!         ),
//!     ],
//!     channels: (
//!         telegram: Some((bot_token: "...", chat_id: "...")),
//!         webhook: Some((url: "https://hooks.example/x", secret: "...")),
//!     ),
//!     tunables: (
//!         timeout_ms: 12000,
//!         confirm_delay_ms: 8000,
//!         in_confirmations_required: 2,
//!         error_streak_notify_threshold: 5,
//!         error_notify_cooldown_secs: 3600,
//!         interval_secs: 300,
//!     ),
//! )
//! ```
//!
//! Every numeric tunable is clamped into a bounded range before it
//! reaches the core, so a typo in the file cannot produce a pathological
//! deployment (e.g. a zero fetch timeout or a week-long confirm delay).

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use restock_core::Thresholds;
use restock_engine::{
    Channel, FetchSettings, ProbeSettings, SignedWebhookChannel, TargetSpec, TargetSpecError,
    TelegramChannel,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config file: {0}")]
    Parse(String),
    #[error("duplicate target name '{0}'")]
    DuplicateTarget(String),
    #[error(transparent)]
    Target(#[from] TargetSpecError),
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    targets: Vec<TargetEntry>,
    #[serde(default)]
    channels: ChannelsEntry,
    #[serde(default)]
    tunables: TunablesEntry,
    #[serde(default = "default_state_dir")]
    state_dir: String,
}

#[derive(Debug, Deserialize)]
struct TargetEntry {
    name: String,
    urls: Vec<String>,
    #[serde(default)]
    must_contain_any: Vec<String>,
    #[serde(default)]
    out_of_stock_patterns: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelsEntry {
    #[serde(default)]
    telegram: Option<TelegramEntry>,
    #[serde(default)]
    webhook: Option<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
struct TelegramEntry {
    bot_token: String,
    chat_id: String,
}

#[derive(Debug, Deserialize)]
struct WebhookEntry {
    url: String,
    secret: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TunablesEntry {
    timeout_ms: u64,
    confirm_delay_ms: u64,
    in_confirmations_required: u32,
    error_streak_notify_threshold: u32,
    error_notify_cooldown_secs: i64,
    interval_secs: u64,
}

impl Default for TunablesEntry {
    fn default() -> Self {
        Self {
            timeout_ms: 12_000,
            confirm_delay_ms: 8_000,
            in_confirmations_required: 2,
            error_streak_notify_threshold: 5,
            error_notify_cooldown_secs: 3600,
            interval_secs: 300,
        }
    }
}

fn default_state_dir() -> String {
    ".".to_string()
}

/// Fully validated configuration, ready to build a `Monitor` from.
pub struct LoadedConfig {
    pub targets: Vec<TargetSpec>,
    pub channels: Vec<Arc<dyn Channel>>,
    pub fetch: FetchSettings,
    pub probe: ProbeSettings,
    pub thresholds: Thresholds,
    pub interval: Duration,
    pub state_dir: PathBuf,
}

pub fn load(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let file: ConfigFile =
        ron::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;

    let mut seen = BTreeSet::new();
    let mut targets = Vec::with_capacity(file.targets.len());
    for entry in file.targets {
        if !seen.insert(entry.name.clone()) {
            return Err(ConfigError::DuplicateTarget(entry.name));
        }
        targets.push(TargetSpec::compile(
            entry.name,
            entry.urls,
            entry.must_contain_any,
            &entry.out_of_stock_patterns,
        )?);
    }

    let mut channels: Vec<Arc<dyn Channel>> = Vec::new();
    if let Some(telegram) = file.channels.telegram {
        channels.push(Arc::new(TelegramChannel::new(
            telegram.bot_token,
            telegram.chat_id,
        )));
    }
    if let Some(webhook) = file.channels.webhook {
        channels.push(Arc::new(SignedWebhookChannel::new(
            webhook.url,
            webhook.secret,
        )));
    }

    let tunables = file.tunables;
    let timeout_ms = tunables.timeout_ms.clamp(1_000, 60_000);
    let confirm_delay_ms = tunables.confirm_delay_ms.clamp(0, 60_000);

    Ok(LoadedConfig {
        targets,
        channels,
        fetch: FetchSettings {
            request_timeout: Duration::from_millis(timeout_ms),
            ..FetchSettings::default()
        },
        probe: ProbeSettings {
            confirm_delay: Duration::from_millis(confirm_delay_ms),
        },
        thresholds: Thresholds {
            in_confirmations_required: tunables.in_confirmations_required.clamp(1, 10),
            error_streak_notify_threshold: tunables.error_streak_notify_threshold.clamp(1, 100),
            error_notify_cooldown_secs: tunables.error_notify_cooldown_secs.clamp(60, 86_400),
        },
        interval: Duration::from_secs(tunables.interval_secs.clamp(30, 86_400)),
        state_dir: PathBuf::from(file.state_dir),
    })
}
