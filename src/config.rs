//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides; the CLI
//! applies its own flags on top.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::data::{DEFAULT_GEOJSON_URL, DEFAULT_VALUE_COLUMN};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub geo: GeoConfig,

    #[serde(default = "ServerConfig::cases")]
    pub cases: ServerConfig,

    #[serde(default = "ServerConfig::hospital")]
    pub hospital: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Location of the CSV datasets
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,

    #[serde(default = "default_total_cases")]
    pub total_cases: String,

    #[serde(default = "default_total_deaths")]
    pub total_deaths: String,

    #[serde(default = "default_weekly_cases")]
    pub weekly_cases: String,

    #[serde(default = "default_weekly_deaths")]
    pub weekly_deaths: String,

    #[serde(default = "default_hospital_admissions")]
    pub hospital_admissions: String,

    #[serde(default = "default_admissions_column")]
    pub admissions_column: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_total_cases() -> String {
    "total_cases.csv".to_string()
}

fn default_total_deaths() -> String {
    "total_deaths.csv".to_string()
}

fn default_weekly_cases() -> String {
    "weekly_cases.csv".to_string()
}

fn default_weekly_deaths() -> String {
    "weekly_deaths.csv".to_string()
}

fn default_hospital_admissions() -> String {
    "weekly-hospital-admissions-covid.csv".to_string()
}

fn default_admissions_column() -> String {
    DEFAULT_VALUE_COLUMN.to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            total_cases: default_total_cases(),
            total_deaths: default_total_deaths(),
            weekly_cases: default_weekly_cases(),
            weekly_deaths: default_weekly_deaths(),
            hospital_admissions: default_hospital_admissions(),
            admissions_column: default_admissions_column(),
        }
    }
}

impl DataConfig {
    /// Resolve a dataset file name against the data directory
    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

/// Where the world boundary document comes from
#[derive(Debug, Clone, Deserialize)]
pub struct GeoConfig {
    #[serde(default = "default_geo_url")]
    pub url: String,

    /// Local copy; takes precedence over `url` when set
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_geo_url() -> String {
    DEFAULT_GEOJSON_URL.to_string()
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            url: default_geo_url(),
            path: None,
        }
    }
}

/// HTTP server configuration for one dashboard process
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

impl ServerConfig {
    /// Default for the cases dashboard
    pub fn cases() -> Self {
        Self {
            host: default_host(),
            port: 8050,
        }
    }

    /// Default for the hospital admissions dashboard
    pub fn hospital() -> Self {
        Self {
            host: default_host(),
            port: 8051,
        }
    }

    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            geo: GeoConfig::default(),
            cases: ServerConfig::cases(),
            hospital: ServerConfig::hospital(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// Falls back to defaults only when no config file exists; a file that
    /// exists but cannot be read or parsed is an error.
    pub fn load_default() -> Result<Self, ConfigError> {
        let candidates = [
            dirs::config_dir().map(|p| p.join("covidboard").join("config.toml")),
            Some(PathBuf::from("./covidboard.toml")),
        ];

        Self::load_first_existing(candidates.into_iter().flatten())
    }

    /// Load the first existing file among `candidates`, else defaults
    fn load_first_existing(
        candidates: impl IntoIterator<Item = PathBuf>,
    ) -> Result<Self, ConfigError> {
        match candidates.into_iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(&path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup (the environment, in production)
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Data overrides
        if let Some(dir) = lookup("COVIDBOARD_DATA_DIR") {
            self.data.dir = PathBuf::from(dir);
        }

        // Geo overrides
        if let Some(url) = lookup("COVIDBOARD_GEO_URL") {
            self.geo.url = url;
        }
        if let Some(path) = lookup("COVIDBOARD_GEO_PATH") {
            self.geo.path = Some(PathBuf::from(path));
        }

        // Server overrides
        if let Some(host) = lookup("COVIDBOARD_HOST") {
            self.cases.host = host.clone();
            self.hospital.host = host;
        }
        if let Some(port) = lookup("COVIDBOARD_CASES_PORT").and_then(|p| p.parse().ok()) {
            self.cases.port = port;
        }
        if let Some(port) = lookup("COVIDBOARD_HOSPITAL_PORT").and_then(|p| p.parse().ok()) {
            self.hospital.port = port;
        }

        // Logging overrides
        if let Some(level) = lookup("COVIDBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("COVIDBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    format!(
        r#"# covidboard configuration
#
# Environment variables override these settings:
# - COVIDBOARD_DATA_DIR
# - COVIDBOARD_GEO_URL / COVIDBOARD_GEO_PATH
# - COVIDBOARD_HOST
# - COVIDBOARD_CASES_PORT / COVIDBOARD_HOSPITAL_PORT
# - COVIDBOARD_LOG_LEVEL / COVIDBOARD_LOG_FORMAT

[data]
# Directory holding the CSV files
dir = "."

total_cases = "total_cases.csv"
total_deaths = "total_deaths.csv"
weekly_cases = "weekly_cases.csv"
weekly_deaths = "weekly_deaths.csv"
hospital_admissions = "weekly-hospital-admissions-covid.csv"

# Numeric column of the admissions table
admissions_column = "{admissions_column}"

[geo]
# World boundaries, fetched once at startup
url = "{geo_url}"

# Use a local copy instead of fetching
# path = "countries.geo.json"

[cases]
host = "127.0.0.1"
port = 8050

[hospital]
host = "127.0.0.1"
port = 8051

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        admissions_column = DEFAULT_VALUE_COLUMN,
        geo_url = DEFAULT_GEOJSON_URL,
    )
}
