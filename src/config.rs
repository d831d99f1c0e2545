//! Settings
//!
//! Every knob has a default tuned against the live sites; a JSON file only
//! needs the fields it wants to change.
//!
//! ```json
//! { "browser": { "headless": false }, "momo": { "settle_ms": 5000 } }
//! ```

use crate::error::{Result, ShopError};
use crate::tools::fetch::{Pause, RetryPolicy};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub browser: BrowserSettings,
    pub retry: RetryPolicy,
    /// Pages with fewer raw listings than this are treated as the last page.
    pub full_page_listings: usize,
    pub momo: MomoSettings,
    pub pchome: PchomeSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            browser: BrowserSettings::default(),
            retry: RetryPolicy::default(),
            full_page_listings: 20,
            momo: MomoSettings::default(),
            pchome: PchomeSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub headless: bool,
    pub page_load_timeout_ms: u64,
    pub user_agent: String,
    pub window_size: String,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".into(),
            headless: true,
            page_load_timeout_ms: 30_000,
            user_agent: DEFAULT_USER_AGENT.into(),
            window_size: "1920,1080".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomoSettings {
    /// Wait after navigation before looking for listings.
    pub settle_ms: u64,
    /// How long the locator keeps polling the DOM for a listing selector.
    pub locate_wait_ms: u64,
    pub locate_poll_ms: u64,
    pub page_pause: Pause,
}

impl Default for MomoSettings {
    fn default() -> Self {
        Self {
            settle_ms: 3_000,
            locate_wait_ms: 15_000,
            locate_poll_ms: 500,
            page_pause: Pause::between(2_000, 3_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PchomeSettings {
    pub settle_ms: u64,
    pub page_pause: Pause,
    pub enrich: EnrichSettings,
}

impl Default for PchomeSettings {
    fn default() -> Self {
        Self {
            settle_ms: 1_000,
            page_pause: Pause::fixed(500),
            enrich: EnrichSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichSettings {
    pub enabled: bool,
    /// Detail pages opened side by side, one tab each.
    pub batch_size: usize,
    pub settle_ms: u64,
    pub batch_pause_ms: u64,
}

impl Default for EnrichSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            batch_size: 5,
            settle_ms: 3_000,
            batch_pause_ms: 1_000,
        }
    }
}

impl Settings {
    /// Load settings from `path`, or from the default location when it exists,
    /// falling back to built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let settings = match path {
            Some(p) => Self::from_file(p)?,
            None => match default_path() {
                Some(p) if p.exists() => Self::from_file(&p)?,
                _ => Self::default(),
            },
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let file = fs::File::open(path).map_err(|e| {
            ShopError::InvalidConfig(format!("cannot open {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.retry.max_attempts == 0 {
            return Err(ShopError::InvalidConfig("retry.max_attempts must be at least 1".into()));
        }
        let pauses = [
            ("retry.backoff", &self.retry.backoff),
            ("momo.page_pause", &self.momo.page_pause),
            ("pchome.page_pause", &self.pchome.page_pause),
        ];
        for (name, pause) in pauses {
            if pause.min_ms > pause.max_ms {
                return Err(ShopError::InvalidConfig(format!(
                    "{name}: min_ms ({}) exceeds max_ms ({})",
                    pause.min_ms, pause.max_ms
                )));
            }
        }
        if self.pchome.enrich.batch_size == 0 {
            return Err(ShopError::InvalidConfig("pchome.enrich.batch_size must be at least 1".into()));
        }
        if self.browser.webdriver_url.trim().is_empty() {
            return Err(ShopError::InvalidConfig("browser.webdriver_url is empty".into()));
        }
        Ok(())
    }
}

/// `<config dir>/shopcmp/settings.json`, if a home directory can be resolved.
pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("tw", "shopcmp", "shopcmp").map(|p| p.config_dir().join(SETTINGS_FILE))
}
