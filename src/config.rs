use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::types::Coordinates;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub wizard: WizardConfig,
    pub paths: PathsConfig,
    #[serde(default)]
    pub location: LocationConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub rest_api: RestApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Timesheet backend connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the timesheet backend (e.g. "https://time.example.com")
    #[serde(default)]
    pub base_url: String,
    /// Optional request timeout; unset means requests may wait indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    format!("timeclock/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

/// Business rules of the clock-in wizard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardConfig {
    /// Hours after a session's end time before it is discarded (default: 4)
    #[serde(default = "default_session_expiry_hours")]
    pub session_expiry_hours: i64,
    /// Cost code every mechanic timesheet is booked against
    #[serde(default = "default_mechanic_cost_code")]
    pub mechanic_cost_code: String,
    /// Where the caller is sent after a successful clock-in
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,
    /// Seconds dropdown reference data stays cached (default: 300)
    #[serde(default = "default_catalog_ttl")]
    pub catalog_ttl_secs: u64,
}

fn default_session_expiry_hours() -> i64 {
    4
}

fn default_mechanic_cost_code() -> String {
    "#00.50 Mechanics".to_string()
}

fn default_dashboard_path() -> String {
    "/dashboard".to_string()
}

fn default_catalog_ttl() -> u64 {
    300 // 5 minutes
}

impl WizardConfig {
    /// Session expiry as a chrono duration
    pub fn session_expiry(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_expiry_hours)
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            session_expiry_hours: default_session_expiry_hours(),
            mechanic_cost_code: default_mechanic_cost_code(),
            dashboard_path: default_dashboard_path(),
            catalog_ttl_secs: default_catalog_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding sessions.json, preferences.json and logs/
    pub state: String,
}

/// Device location used by the CLI (a browser would supply this itself)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    #[serde(default = "default_permission_granted")]
    pub permission_granted: bool,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

fn default_permission_granted() -> bool {
    true
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            permission_granted: default_permission_granted(),
            lat: None,
            lng: None,
        }
    }
}

impl LocationConfig {
    /// Configured coordinates, if both halves are present
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_notifications_enabled")]
    pub enabled: bool,
    /// Optional webhook receiving switch-job notifications
    #[serde(default)]
    pub webhook: Option<WebhookConfig>,
}

fn default_notifications_enabled() -> bool {
    true
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: default_notifications_enabled(),
            webhook: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    pub url: String,
    /// Name of the environment variable holding a bearer token
    #[serde(default)]
    pub bearer_token_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestApiConfig {
    #[serde(default = "default_rest_port")]
    pub port: u16,
}

fn default_rest_port() -> u16 {
    7010
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            port: default_rest_port(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to log to a file under the state directory instead of stderr
    #[serde(default)]
    pub to_file: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            to_file: false,
        }
    }
}

impl Config {
    /// Project-local config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from("timeclock.toml")
    }

    pub fn load(config_path: Option<&str>) -> Result<Self> {
        // Start with embedded defaults so timeclock works without config files
        let defaults = Config::default();
        let defaults_json =
            serde_json::to_string(&defaults).context("Failed to serialize default config")?;

        let mut builder = config::Config::builder().add_source(config::File::from_str(
            &defaults_json,
            config::FileFormat::Json,
        ));

        let local_config = Self::local_config_path();
        if local_config.exists() {
            builder = builder.add_source(config::File::from(local_config));
        }

        // User config in ~/.config/timeclock/ (optional global overrides)
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("timeclock").join("config.toml");
            if user_config.exists() {
                builder = builder.add_source(config::File::from(user_config));
            }
        }

        // Explicit config file (CLI override)
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        }

        // Environment variables with TIMECLOCK_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("TIMECLOCK")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to load configuration")?;
        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Save config to ./timeclock.toml
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::local_config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }

        let toml_str =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;
        std::fs::write(path, toml_str).context("Failed to write config file")?;

        Ok(())
    }

    /// Get absolute path to state directory
    pub fn state_path(&self) -> PathBuf {
        let path = PathBuf::from(&self.paths.state);
        if path.is_absolute() {
            path
        } else {
            std::env::current_dir().unwrap_or_default().join(path)
        }
    }

    /// Get absolute path to logs directory
    pub fn logs_path(&self) -> PathBuf {
        self.state_path().join("logs")
    }

    pub fn sessions_file(&self) -> PathBuf {
        self.state_path().join("sessions.json")
    }

    pub fn preferences_file(&self) -> PathBuf {
        self.state_path().join("preferences.json")
    }

    /// Session expiry as a chrono duration
    pub fn session_expiry(&self) -> chrono::Duration {
        self.wizard.session_expiry()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            wizard: WizardConfig::default(),
            paths: PathsConfig {
                state: ".timeclock".to_string(), // Relative to cwd
            },
            location: LocationConfig::default(),
            notifications: NotificationsConfig::default(),
            rest_api: RestApiConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
