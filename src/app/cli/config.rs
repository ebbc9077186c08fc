//! Configuration file handling
//!
//! Settings come from three layers, lowest first: built-in defaults, the TOML
//! configuration file, and the command line. The file is optional unless it
//! was named explicitly with `--config-file`.
//!
//! ```toml
//! table = "sprinkler"
//! store = "/var/lib/sprinkler/store.json"
//! log-level = "debug"
//! log-format = "ext"
//! timeout = 30
//!
//! [[destination]]
//! name = "primary"
//!
//! [[destination]]
//! name = "audit"
//! status-attribute = "audit-state"
//! status-index = "audit-state-index"
//! ```

use crate::app::cli::args::Args;
use crate::core::logging::LogFormat;
use crate::schema::{
    Attributes, Destination, DestinationRegistry, QueueConfig, SchemaError, DEFAULT_TABLE_NAME,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

const APP_DIR: &str = "Sprinkler";
const CONFIG_FILE: &str = "sprinkler.toml";
const STORE_FILE: &str = "store.json";

/// Store location value selecting the in-memory store
pub const MEMORY_STORE: &str = "memory";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Cannot read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse configuration file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration value for '{key}': {message}")]
    Validation { key: String, message: String },

    #[error("Invalid queue configuration: {0}")]
    Schema(#[from] SchemaError),
}

impl ConfigError {
    fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Where records are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

/// Effective settings after merging file and command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub table: Option<String>,
    pub store: Option<String>,
    pub log_level: Option<String>,
    pub log_format: LogFormat,
    pub log_file: Option<PathBuf>,
    pub color: Option<bool>,
    pub timeout: Option<Duration>,
    pub destinations: Option<Vec<Destination>>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply values found in a parsed configuration file
    pub fn apply_toml_values(&mut self, config: &toml::Table) -> Result<(), ConfigError> {
        if let Some(table) = string_value(config, "table")? {
            if table.trim().is_empty() {
                return Err(ConfigError::invalid("table", "must not be empty"));
            }
            self.table = Some(table.trim().to_string());
        }
        if let Some(store) = string_value(config, "store")? {
            self.store = Some(store.to_string());
        }
        if let Some(log_level) = string_value(config, "log-level")? {
            self.log_level = Some(log_level.to_string());
        }
        if let Some(log_format) = string_value(config, "log-format")? {
            self.log_format = LogFormat::from_str(log_format).map_err(|_| {
                ConfigError::invalid("log-format", format!("unknown format '{}'", log_format))
            })?;
        }
        if let Some(log_file) = string_value(config, "log-file")? {
            self.log_file = log_file_path(log_file);
        }
        if let Some(value) = config.get("color") {
            let color = value
                .as_bool()
                .ok_or_else(|| ConfigError::invalid("color", "expected true or false"))?;
            self.color = Some(color);
        }
        if let Some(value) = config.get("timeout") {
            let seconds = value
                .as_integer()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::invalid("timeout", "expected a positive integer"))?;
            self.timeout = Some(Duration::from_secs(seconds as u64));
        }
        if let Some(value) = config.get("destination") {
            self.destinations = Some(parse_destinations(value)?);
        }
        Ok(())
    }

    /// Apply command-line values over whatever the file provided
    pub fn apply_args(&mut self, args: &Args) -> Result<(), ConfigError> {
        if let Some(table) = &args.table {
            self.table = Some(table.clone());
        }
        if let Some(store) = &args.store {
            self.store = Some(store.clone());
        }
        if let Some(log_format) = &args.log_format {
            self.log_format = LogFormat::from_str(log_format).map_err(|_| {
                ConfigError::invalid("--log-format", format!("unknown format '{}'", log_format))
            })?;
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = log_file_path(&log_file.to_string_lossy());
        }
        if args.color {
            self.color = Some(true);
        } else if args.no_color {
            self.color = Some(false);
        }
        if let Some(seconds) = args.timeout {
            if seconds == 0 {
                return Err(ConfigError::invalid("--timeout", "must be greater than 0"));
            }
            self.timeout = Some(Duration::from_secs(seconds));
        }
        self.log_level = Some(args.effective_log_level(self.log_level.as_deref()));
        Ok(())
    }

    /// Queue configuration from the table name and destinations
    pub fn queue_config(&self) -> Result<QueueConfig, ConfigError> {
        let destinations = match &self.destinations {
            Some(list) => DestinationRegistry::new(list.clone())?,
            None => DestinationRegistry::default(),
        };
        let table = self.table.as_deref().unwrap_or(DEFAULT_TABLE_NAME);
        Ok(QueueConfig::new(table, Attributes::default(), destinations)?)
    }

    /// Store location, defaulting to a file in the user's data directory
    pub fn store_location(&self) -> StoreLocation {
        match self.store.as_deref() {
            Some(MEMORY_STORE) => StoreLocation::Memory,
            Some(path) => StoreLocation::File(PathBuf::from(path)),
            None => StoreLocation::File(
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_DIR)
                    .join(STORE_FILE),
            ),
        }
    }

    /// Colour when forced, otherwise when stdout is a terminal and NO_COLOR is unset
    pub fn use_color(&self) -> bool {
        match self.color {
            Some(color) => color,
            None => std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

fn string_value<'a>(config: &'a toml::Table, key: &str) -> Result<Option<&'a str>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(Some)
            .ok_or_else(|| ConfigError::invalid(key, "expected a string")),
    }
}

fn log_file_path(value: &str) -> Option<PathBuf> {
    match value {
        "none" | "-" => None,
        path => Some(PathBuf::from(path)),
    }
}

fn parse_destinations(value: &toml::Value) -> Result<Vec<Destination>, ConfigError> {
    let entries = value
        .as_array()
        .ok_or_else(|| ConfigError::invalid("destination", "expected [[destination]] tables"))?;

    entries
        .iter()
        .enumerate()
        .map(|(position, entry)| {
            let key = format!("destination[{}]", position);
            let table = entry
                .as_table()
                .ok_or_else(|| ConfigError::invalid(&key, "expected a table"))?;
            let name = string_value(table, "name")?
                .ok_or_else(|| ConfigError::invalid(&key, "missing 'name'"))?;

            let conventional = Destination::named(name);
            let status_attribute = string_value(table, "status-attribute")?
                .map(str::to_string)
                .unwrap_or(conventional.status_attribute);
            let status_index = string_value(table, "status-index")?
                .map(str::to_string)
                .unwrap_or(conventional.status_index);
            Ok(Destination::new(name, status_attribute, status_index))
        })
        .collect()
}

/// Default configuration file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE))
}

/// Load and parse the configuration file
///
/// An explicitly named file must exist. The default file is used only when
/// present.
pub async fn load_config_file(explicit: Option<&Path>) -> Result<Option<toml::Table>, ConfigError> {
    let path = match explicit {
        Some(path) => {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                });
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if tokio::fs::try_exists(&path).await.unwrap_or(false) => path,
            _ => {
                log::debug!("No configuration file found, using defaults");
                return Ok(None);
            }
        },
    };

    log::debug!("Loading configuration from {}", path.display());
    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
    let table = toml::from_str::<toml::Table>(&contents)
        .map_err(|source| ConfigError::Parse { path, source })?;
    Ok(Some(table))
}
