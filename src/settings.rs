//! Settings
//!
//! Process-level settings for the binaries: where the site lives, where local
//! storage is kept, how the server listens and how logging is set up. Loaded
//! from a TOML file with `FOLIO_*` environment overrides.
//!
//! These are distinct from the site configuration document (`config.json`),
//! which is fetched at boot and held by [`ConfigStore`](crate::config::ConfigStore).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::CONFIG_PATH;
use crate::fetch::DEFAULT_TIMEOUT_MS;

/// Environment variables read by [`Settings::apply_env_overrides`]
pub const ENV_VARS: &[&str] = &[
    "FOLIO_SITE_ROOT",
    "FOLIO_CONFIG_PATH",
    "FOLIO_STORAGE_DIR",
    "FOLIO_EPHEMERAL",
    "FOLIO_HOST",
    "FOLIO_PORT",
    "FOLIO_LOG_LEVEL",
    "FOLIO_LOG_FORMAT",
];

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub site: SiteSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where site documents are fetched from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSettings {
    /// Directory, or an `http(s)://` base URL
    #[serde(default = "default_site_root")]
    pub root: String,

    /// Configuration document, relative to the root
    #[serde(default = "default_config_path")]
    pub config_path: String,

    /// Timeout for HTTP fetches
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_site_root() -> String {
    "./site".to_string()
}

fn default_config_path() -> String {
    CONFIG_PATH.to_string()
}

fn default_request_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            root: default_site_root(),
            config_path: default_config_path(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl SiteSettings {
    pub fn is_remote(&self) -> bool {
        self.root.starts_with("http://") || self.root.starts_with("https://")
    }
}

/// Local storage location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_storage_dir")]
    pub dir: String,

    /// Keep local storage in memory only
    #[serde(default)]
    pub ephemeral: bool,
}

fn default_storage_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("folio").to_string_lossy().to_string())
        .unwrap_or_else(|| "./folio_data".to_string())
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
            ephemeral: false,
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Settings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            SettingsError::Parse { error, .. } => SettingsError::Parse {
                path: path.to_path_buf(),
                error,
            },
            other => other,
        })
    }

    /// Parse settings from TOML text
    pub fn parse(content: &str) -> Result<Self, SettingsError> {
        toml::from_str(content).map_err(|e| SettingsError::Parse {
            path: PathBuf::new(),
            error: e.to_string(),
        })
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut settings = Settings::default();
        settings.apply_env_overrides();
        settings
    }

    /// Load settings with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, SettingsError> {
        let mut settings = Self::load(path)?;
        settings.apply_env_overrides();
        Ok(settings)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let settings_paths = [
            dirs::config_dir().map(|p| p.join("folio").join("folio.toml")),
            Some(PathBuf::from("./folio.toml")),
        ];

        for path in settings_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(settings) => {
                        tracing::info!(path = ?path, "Loaded settings");
                        return settings;
                    }
                    Err(e) => {
                        tracing::warn!(path = ?path, error = %e, "Failed to load settings");
                    }
                }
            }
        }

        tracing::info!("Using default settings with environment overrides");
        Self::from_env()
    }

    /// Apply `FOLIO_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from any variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(root) = lookup("FOLIO_SITE_ROOT") {
            self.site.root = root;
        }
        if let Some(path) = lookup("FOLIO_CONFIG_PATH") {
            self.site.config_path = path;
        }

        if let Some(dir) = lookup("FOLIO_STORAGE_DIR") {
            self.storage.dir = dir;
        }
        if let Some(flag) = lookup("FOLIO_EPHEMERAL") {
            self.storage.ephemeral = matches!(flag.as_str(), "1" | "true" | "yes");
        }

        if let Some(host) = lookup("FOLIO_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("FOLIO_PORT") {
            match port.parse() {
                Ok(p) => self.server.port = p,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid FOLIO_PORT"),
            }
        }

        if let Some(level) = lookup("FOLIO_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("FOLIO_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse settings file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default settings file
pub fn generate_default_settings() -> String {
    format!(
        r#"# Folio Settings
#
# Environment variables override these settings:
# - FOLIO_SITE_ROOT
# - FOLIO_CONFIG_PATH
# - FOLIO_STORAGE_DIR
# - FOLIO_EPHEMERAL
# - FOLIO_HOST
# - FOLIO_PORT
# - FOLIO_LOG_LEVEL
# - FOLIO_LOG_FORMAT

[site]
# Site directory, or an http(s):// base URL
root = "./site"

# Configuration document, relative to the site root
config_path = "{config_path}"

# Timeout for HTTP fetches (ms)
request_timeout_ms = {timeout}

[storage]
# Directory holding local_storage.json
dir = "~/.local/share/folio"

# Keep local storage in memory only
ephemeral = false

[server]
host = "127.0.0.1"
port = 8090

# Allowed CORS origins (empty allows any)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#,
        config_path = CONFIG_PATH,
        timeout = DEFAULT_TIMEOUT_MS,
    )
}
