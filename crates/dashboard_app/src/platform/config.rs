use std::fs;
use std::path::Path;
use std::time::Duration;

use dashboard_client::{ApiSettings, PollSettings, ServiceError};
use dashboard_logging::{dash_info, dash_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const CONFIG_FILENAME: &str = "dashboard.ron";
pub(crate) const API_URL_ENV: &str = "DASHBOARD_API_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct DashboardConfig {
    pub api_url: String,
    pub poll_interval_ms: u64,
    pub max_poll_failures: u32,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".to_string(),
            poll_interval_ms: 1000,
            max_poll_failures: 5,
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("api_url is not usable: {0}")]
    ApiUrl(#[from] ServiceError),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

impl DashboardConfig {
    pub(crate) fn api_settings(&self) -> Result<ApiSettings, ConfigError> {
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                field: "request_timeout_secs",
            });
        }
        if self.connect_timeout_secs == 0 {
            return Err(ConfigError::Zero {
                field: "connect_timeout_secs",
            });
        }
        let mut settings = ApiSettings::parse(&self.api_url)?;
        settings.request_timeout = Duration::from_secs(self.request_timeout_secs);
        settings.connect_timeout = Duration::from_secs(self.connect_timeout_secs);
        Ok(settings)
    }

    pub(crate) fn poll_settings(&self) -> Result<PollSettings, ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Zero {
                field: "poll_interval_ms",
            });
        }
        if self.max_poll_failures == 0 {
            return Err(ConfigError::Zero {
                field: "max_poll_failures",
            });
        }
        Ok(PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_consecutive_failures: self.max_poll_failures,
        })
    }
}

/// Reads the configuration once at startup from the working directory and
/// the environment.
pub(crate) fn load_from_environment() -> DashboardConfig {
    let dir = std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
    load(&dir, std::env::var(API_URL_ENV).ok())
}

/// `{dir}/dashboard.ron` if present, else defaults; a non-empty
/// `api_url_override` wins over both.
pub(crate) fn load(dir: &Path, api_url_override: Option<String>) -> DashboardConfig {
    let mut config = read_file(dir);
    if let Some(url) = api_url_override.filter(|url| !url.trim().is_empty()) {
        dash_info!("{} overrides api_url", API_URL_ENV);
        config.api_url = url.trim().to_string();
    }
    config
}

fn read_file(dir: &Path) -> DashboardConfig {
    let path = dir.join(CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return DashboardConfig::default();
        }
        Err(err) => {
            dash_warn!("Failed to read config from {:?}: {}", path, err);
            return DashboardConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            dash_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            dash_warn!("Failed to parse config from {:?}: {}", path, err);
            DashboardConfig::default()
        }
    }
}
