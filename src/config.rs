use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, Utc};
use chrono_tz::Tz;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::{DEFAULT_API_BASE, RetryConfig};
use crate::model::{ACTIVE_STATUS, TIMESTAMP_FORMAT};

const APP_DIR: &str = "objectives-cli";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Local .xlsx file
    #[default]
    Workbook,
    /// Google Sheets REST API
    Sheets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Defaults to `objectives.xlsx` in the data directory
    #[serde(default)]
    pub workbook_path: Option<PathBuf>,
    #[serde(default)]
    pub spreadsheet_id: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_access_token_env() -> String {
    "OBJECTIVES_SHEETS_TOKEN".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            workbook_path: None,
            spreadsheet_id: None,
            api_base_url: default_api_base_url(),
            access_token_env: default_access_token_env(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorksheetNames {
    #[serde(default = "default_objectives_sheet")]
    pub objectives: String,
    #[serde(default = "default_catalog_sheet")]
    pub catalog: String,
}

fn default_objectives_sheet() -> String {
    "estado".to_string()
}

fn default_catalog_sheet() -> String {
    "Areas_Agrupaciones".to_string()
}

impl Default for WorksheetNames {
    fn default() -> Self {
        Self {
            objectives: default_objectives_sheet(),
            catalog: default_catalog_sheet(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Growth factor between delays; 1.0 keeps them fixed
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Randomize each delay between 50% and 150%
    #[serde(default)]
    pub jitter: bool,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

fn default_max_delay_ms() -> u64 {
    30_000
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay_ms(),
            jitter: false,
        }
    }
}

impl RetrySettings {
    pub fn to_retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_millis(self.delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.delay_ms)),
            backoff_multiplier: self.backoff_multiplier.max(1.0),
            jitter: self.jitter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// IANA zone for submission timestamps; local time when unset
    #[serde(default)]
    pub timezone: Option<String>,
    /// Where downloads are written; current directory when unset
    #[serde(default)]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "default_status")]
    pub default_status: String,
    #[serde(default)]
    pub open_exports: bool,
}

fn default_status() -> String {
    ACTIVE_STATUS.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timezone: None,
            export_dir: None,
            default_status: default_status(),
            open_exports: false,
        }
    }
}

/// Names accepted by `settings get/set/reset`
pub const SETTING_KEYS: [&str; 16] = [
    "store.backend",
    "store.workbook_path",
    "store.spreadsheet_id",
    "store.api_base_url",
    "store.access_token_env",
    "worksheets.objectives",
    "worksheets.catalog",
    "retry.max_attempts",
    "retry.delay_ms",
    "retry.backoff_multiplier",
    "retry.max_delay_ms",
    "retry.jitter",
    "settings.timezone",
    "settings.export_dir",
    "settings.default_status",
    "settings.open_exports",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub worksheets: WorksheetNames,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub settings: Settings,
    #[serde(skip)]
    path: Option<PathBuf>,
}

impl Config {
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "linux") {
            dirs::config_dir()
                .context("Failed to get XDG config directory")?
                .join(APP_DIR)
        } else {
            dirs::home_dir()
                .context("Failed to get home directory")?
                .join(format!(".{}", APP_DIR))
        };

        Ok(config_dir.join("config.toml"))
    }

    /// File this config was loaded from or will be saved to
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        debug!("Loading config from: {:?}", config_path);

        if !config_path.exists() {
            info!("Config file doesn't exist, using defaults");
            return Ok(Self {
                path: Some(config_path.to_path_buf()),
                ..Self::default()
            });
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
        config.path = Some(config_path.to_path_buf());

        debug!("Loaded config with {:?} backend", config.store.backend);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = match &self.path {
            Some(path) => path.clone(),
            None => Self::get_config_path()?,
        };
        debug!("Saving config to: {:?}", config_path);

        if let Some(parent) = config_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
                info!("Created config directory: {:?}", parent);
            }
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        info!("Config saved successfully");
        Ok(())
    }

    pub fn workbook_path(&self) -> Result<PathBuf> {
        match &self.store.workbook_path {
            Some(path) => Ok(path.clone()),
            None => Ok(dirs::data_dir()
                .context("Failed to get data directory")?
                .join(APP_DIR)
                .join("objectives.xlsx")),
        }
    }

    pub fn export_dir(&self) -> PathBuf {
        self.settings
            .export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn timezone(&self) -> Result<Option<Tz>> {
        match self.settings.timezone.as_deref().filter(|tz| !tz.trim().is_empty()) {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map(Some)
                .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", name, e)),
            None => Ok(None),
        }
    }

    /// Current time in the configured zone, storage-formatted
    pub fn format_timestamp(&self, now: DateTime<Utc>) -> Result<String> {
        Ok(match self.timezone()? {
            Some(tz) => now.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string(),
            None => now.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
        })
    }

    pub fn get_setting(&self, name: &str) -> Result<String> {
        let value = match name {
            "store.backend" => match self.store.backend {
                BackendKind::Workbook => "workbook".to_string(),
                BackendKind::Sheets => "sheets".to_string(),
            },
            "store.workbook_path" => self.workbook_path()?.display().to_string(),
            "store.spreadsheet_id" => self.store.spreadsheet_id.clone().unwrap_or_default(),
            "store.api_base_url" => self.store.api_base_url.clone(),
            "store.access_token_env" => self.store.access_token_env.clone(),
            "worksheets.objectives" => self.worksheets.objectives.clone(),
            "worksheets.catalog" => self.worksheets.catalog.clone(),
            "retry.max_attempts" => self.retry.max_attempts.to_string(),
            "retry.delay_ms" => self.retry.delay_ms.to_string(),
            "retry.backoff_multiplier" => self.retry.backoff_multiplier.to_string(),
            "retry.max_delay_ms" => self.retry.max_delay_ms.to_string(),
            "retry.jitter" => self.retry.jitter.to_string(),
            "settings.timezone" => self.settings.timezone.clone().unwrap_or_default(),
            "settings.export_dir" => self.export_dir().display().to_string(),
            "settings.default_status" => self.settings.default_status.clone(),
            "settings.open_exports" => self.settings.open_exports.to_string(),
            _ => bail!("Unknown setting '{}'. Known settings: {}", name, SETTING_KEYS.join(", ")),
        };
        Ok(value)
    }

    /// Update a setting in memory; call `save` to persist
    pub fn set_setting(&mut self, name: &str, value: &str) -> Result<()> {
        let value = value.trim();
        let optional = |v: &str| if v.is_empty() { None } else { Some(v.to_string()) };

        match name {
            "store.backend" => {
                self.store.backend = match value.to_lowercase().as_str() {
                    "workbook" => BackendKind::Workbook,
                    "sheets" => BackendKind::Sheets,
                    other => bail!("Unknown backend '{}' (expected workbook or sheets)", other),
                }
            }
            "store.workbook_path" => self.store.workbook_path = optional(value).map(PathBuf::from),
            "store.spreadsheet_id" => self.store.spreadsheet_id = optional(value),
            "store.api_base_url" => self.store.api_base_url = value.to_string(),
            "store.access_token_env" => self.store.access_token_env = value.to_string(),
            "worksheets.objectives" => self.worksheets.objectives = non_empty(name, value)?,
            "worksheets.catalog" => self.worksheets.catalog = non_empty(name, value)?,
            "retry.max_attempts" => {
                let attempts: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid number for {}: '{}'", name, value))?;
                if attempts == 0 {
                    bail!("retry.max_attempts must be at least 1");
                }
                self.retry.max_attempts = attempts;
            }
            "retry.delay_ms" => {
                self.retry.delay_ms = value
                    .parse()
                    .with_context(|| format!("Invalid number for {}: '{}'", name, value))?
            }
            "retry.backoff_multiplier" => {
                let multiplier: f64 = value
                    .parse()
                    .with_context(|| format!("Invalid number for {}: '{}'", name, value))?;
                if !multiplier.is_finite() || multiplier < 1.0 {
                    bail!("retry.backoff_multiplier must be at least 1.0");
                }
                self.retry.backoff_multiplier = multiplier;
            }
            "retry.max_delay_ms" => {
                self.retry.max_delay_ms = value
                    .parse()
                    .with_context(|| format!("Invalid number for {}: '{}'", name, value))?
            }
            "retry.jitter" => self.retry.jitter = parse_bool(name, value)?,
            "settings.timezone" => {
                if let Some(tz) = optional(value) {
                    tz.parse::<Tz>()
                        .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", tz, e))?;
                    self.settings.timezone = Some(tz);
                } else {
                    self.settings.timezone = None;
                }
            }
            "settings.export_dir" => self.settings.export_dir = optional(value).map(PathBuf::from),
            "settings.default_status" => self.settings.default_status = non_empty(name, value)?,
            "settings.open_exports" => self.settings.open_exports = parse_bool(name, value)?,
            _ => bail!("Unknown setting '{}'. Known settings: {}", name, SETTING_KEYS.join(", ")),
        }

        info!("Updated setting {}", name);
        Ok(())
    }

    pub fn reset_setting(&mut self, name: &str) -> Result<()> {
        let defaults = Config::default();
        let default_value = match name {
            "store.workbook_path" | "store.spreadsheet_id" | "settings.timezone"
            | "settings.export_dir" => String::new(),
            _ => defaults.get_setting(name)?,
        };
        self.set_setting(name, &default_value)
    }

    pub fn reset_all(&mut self) {
        let path = self.path.take();
        *self = Config {
            path,
            ..Config::default()
        };
        info!("Reset all settings to defaults");
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        other => bail!("Invalid boolean for {}: '{}'", name, other),
    }
}

fn non_empty(name: &str, value: &str) -> Result<String> {
    if value.is_empty() {
        bail!("{} cannot be empty", name);
    }
    Ok(value.to_string())
}
