//! TOML-based configuration.
//!
//! Holds the organizational constants stamped onto ERP documents, the
//! calendar color table, the visit geolocation timeout, and where the CLI
//! finds a remote query catalog.
//!
//! Configuration is stored at `~/.config/erpcal/config.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Default timeout for a device position fix during a visit submission.
pub const DEFAULT_GEOLOCATION_TIMEOUT_SECS: u64 = 20;

/// Constants the ERP expects on every quotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationConfig {
    #[serde(default = "default_company")]
    pub company: String,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_price_list")]
    pub selling_price_list: String,
    /// Doctype a quotation party links to.
    #[serde(default = "default_quotation_to")]
    pub quotation_to: String,
}

/// Calendar display configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Color name forced onto a confirmed doctor visit.
    #[serde(default = "default_confirmed_color")]
    pub confirmed_color: String,
    /// Hex used when a color name is not in the table.
    #[serde(default = "default_color_hex")]
    pub default_color_hex: String,
    /// Extra or overriding color name to hex entries.
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
}

/// Visit submission configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitConfig {
    #[serde(default = "default_geolocation_timeout")]
    pub geolocation_timeout_secs: u64,
}

/// Query registry configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// JSON file the CLI reads as the remote catalog.
    #[serde(default)]
    pub catalog_path: Option<String>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/erpcal/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub organization: OrganizationConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub visit: VisitConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

fn default_company() -> String {
    "Default Company".into()
}
fn default_currency() -> String {
    "INR".into()
}
fn default_price_list() -> String {
    "Standard Selling".into()
}
fn default_quotation_to() -> String {
    "Lead".into()
}
fn default_confirmed_color() -> String {
    "green".into()
}
fn default_color_hex() -> String {
    "#3b82f6".into()
}
fn default_geolocation_timeout() -> u64 {
    DEFAULT_GEOLOCATION_TIMEOUT_SECS
}

impl Default for OrganizationConfig {
    fn default() -> Self {
        Self {
            company: default_company(),
            currency: default_currency(),
            selling_price_list: default_price_list(),
            quotation_to: default_quotation_to(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            confirmed_color: default_confirmed_color(),
            default_color_hex: default_color_hex(),
            colors: BTreeMap::new(),
        }
    }
}

impl Default for VisitConfig {
    fn default() -> Self {
        Self {
            geolocation_timeout_secs: DEFAULT_GEOLOCATION_TIMEOUT_SECS,
        }
    }
}

/// Returns `~/.config/erpcal[-dev]/` based on ERPCAL_ENV.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(".config");

    let env = std::env::var("ERPCAL_ENV").unwrap_or_else(|_| "production".to_string());
    let dir = if env == "dev" {
        base_dir.join("erpcal-dev")
    } else {
        base_dir.join("erpcal")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::SaveFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Number(_) => value
                    .parse::<u64>()
                    .map(|n| serde_json::Value::Number(n.into()))
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Bool(_) => value
                    .parse::<bool>()
                    .map(serde_json::Value::Bool)
                    .map_err(|e| invalid(e.to_string()))?,
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                // Optional strings are null until first set.
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default config file location.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(config_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        toml::from_str(&content).map_err(|e| load_failed(e.to_string()))
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, in memory only.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Geolocation timeout as a `Duration`.
    pub fn geolocation_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.visit.geolocation_timeout_secs)
    }
}
