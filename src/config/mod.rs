use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::condition::DEFAULT_LIMIT;

/// Paging and sort applied when a search does not set its own.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchDefaults {
    pub default_offset: usize,
    pub default_limit: usize,
    pub default_sort: String,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            default_offset: 0,
            default_limit: DEFAULT_LIMIT,
            default_sort: String::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

/// Top-level sqb config file structure.
#[derive(Debug, Deserialize, Serialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct SqbConfig {
    pub search: SearchDefaults,
    pub database: DatabaseConfig,
    /// Free-form application settings, read through the typed getters.
    pub settings: toml::Table,
}

impl SqbConfig {
    /// Load config from ~/.sqb/config.toml. Returns default if file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(SqbConfig::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Integer setting, or -1 when the key is missing or not an integer.
    pub fn get_as_int(&self, key: &str) -> i64 {
        self.settings
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(-1)
    }

    /// String setting. Non-string scalars are rendered as text.
    pub fn get_as_string(&self, key: &str) -> Option<String> {
        match self.settings.get(key)? {
            toml::Value::String(s) => Some(s.clone()),
            toml::Value::Integer(i) => Some(i.to_string()),
            toml::Value::Float(f) => Some(f.to_string()),
            toml::Value::Boolean(b) => Some(b.to_string()),
            toml::Value::Datetime(d) => Some(d.to_string()),
            toml::Value::Array(_) | toml::Value::Table(_) => None,
        }
    }

    /// List-of-strings setting. A single string becomes a one-element list.
    pub fn get_as_string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.settings.get(key)? {
            toml::Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            toml::Value::String(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }

    /// Deserialize a setting (usually a sub-table) into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.settings.get(key) else {
            return Ok(None);
        };
        let typed = value
            .clone()
            .try_into()
            .with_context(|| format!("Setting \"{key}\" has an unexpected shape"))?;
        Ok(Some(typed))
    }

    /// Render as TOML for `sqb config show`.
    pub fn display(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Path to the config file: ~/.sqb/config.toml
pub fn config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".sqb").join("config.toml"))
}

/// Default config template content.
pub fn default_config_template() -> &'static str {
    r#"# ~/.sqb/config.toml

[search]
default_offset = 0
default_limit = 100
# Sort applied when --sort is not given, e.g. "created_at:desc,id"
default_sort = ""

[database]
# path = "/path/to/data.db"

[settings]
# Free-form keys, readable with `sqb config get <key>`
# session_timeout_page = "/timeout"
"#
}

/// Create the default config file if it doesn't already exist.
pub fn init_config() -> Result<bool> {
    init_config_at(&config_path()?)
}

pub fn init_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    std::fs::write(path, default_config_template())
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(true)
}
