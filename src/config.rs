use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::version::registries::github::DEFAULT_BASE_URL;
use crate::version::types::{SourceLocator, WatchedPackage};

// =============================================================================
// Time-related constants
// =============================================================================

/// Default hours between scheduled checks
pub const DEFAULT_INTERVAL_HOURS: f64 = 12.0;

/// Timeout for a single release lookup in milliseconds (10 seconds)
pub const FETCH_TIMEOUT_MS: u64 = 10_000;

/// How long `snooze` suppresses the detailed notification (2 hours)
pub const DEFAULT_SNOOZE_MINUTES: u64 = 120;

/// Upper bound of the random delay before a scheduled cycle, in seconds
pub const JITTER_SECONDS_MAX: u64 = 10;

/// Environment variable holding the tracing filter directive
pub const LOG_ENV: &str = "VERSION_MONITOR_LOG";

/// Monitor configuration structure
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct MonitorConfig {
    /// Scope key for persisted state
    pub installation: String,
    /// Interval used until one is persisted with `interval`
    pub check_interval_hours: f64,
    /// Bypass scheduling and show every watched package regardless of status
    pub diagnostic_mode: bool,
    pub fetch_timeout_ms: u64,
    pub snooze_minutes: u64,
    pub jitter_seconds_max: u64,
    /// Directory holding `<id>/module.json` for every installed package
    pub modules_dir: Option<PathBuf>,
    /// Installed packages that are currently disabled
    pub disabled_modules: Vec<String>,
    /// Users allowed to trigger checks; empty means everyone
    pub operators: Vec<String>,
    pub github_api_url: String,
    pub packages: Vec<WatchedPackage>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            installation: "default".to_string(),
            check_interval_hours: DEFAULT_INTERVAL_HOURS,
            diagnostic_mode: false,
            fetch_timeout_ms: FETCH_TIMEOUT_MS,
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            jitter_seconds_max: JITTER_SECONDS_MAX,
            modules_dir: None,
            disabled_modules: Vec::new(),
            operators: Vec::new(),
            github_api_url: DEFAULT_BASE_URL.to_string(),
            packages: default_watch_list(),
        }
    }
}

impl MonitorConfig {
    /// Load configuration from a JSON file. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if !self.check_interval_hours.is_finite() || self.check_interval_hours <= 0.0 {
            anyhow::bail!(
                "checkIntervalHours must be a positive number, got {}",
                self.check_interval_hours
            );
        }
        let mut seen = std::collections::HashSet::new();
        for package in &self.packages {
            if !seen.insert(package.id.as_str()) {
                anyhow::bail!("duplicate package id {:?}", package.id);
            }
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    pub fn snooze_duration(&self) -> Duration {
        Duration::from_secs(self.snooze_minutes.saturating_mul(60))
    }

    pub fn jitter_max(&self) -> Duration {
        Duration::from_secs(self.jitter_seconds_max)
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.modules_dir
            .clone()
            .unwrap_or_else(|| data_dir().join("modules"))
    }
}

/// Watch list used when the configuration does not name its own packages
pub fn default_watch_list() -> Vec<WatchedPackage> {
    [
        ("about-time-next", "About Time Next"),
        ("chat-pruner", "Chat Pruner"),
        ("find-and-replace", "Find and Replace"),
        ("window-controls-next", "Window Controls Next"),
    ]
    .into_iter()
    .map(|(id, display_name)| WatchedPackage {
        id: id.to_string(),
        display_name: display_name.to_string(),
        source_locator: SourceLocator::Manifest {
            url: format!(
                "https://github.com/paulcheeba/{}/releases/latest/download/module.json",
                id
            ),
        },
        release_page_url: format!("https://github.com/paulcheeba/{}/releases/latest", id),
    })
    .collect()
}

/// Returns the path to the data directory for version-monitor.
/// Uses $XDG_DATA_HOME/version-monitor if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/version-monitor,
/// or ./version-monitor if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the state database file.
pub fn db_path() -> PathBuf {
    data_dir().join("state.db")
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("version-monitor.log")
}

/// Returns the path of the default configuration file.
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("version-monitor")
}
