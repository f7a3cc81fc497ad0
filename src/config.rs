use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:5179";
pub const DEFAULT_PROPERTIES_PATH: &str = "/api/properties";
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Build mode; non-production builds fall back to sample data on transport errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

/// Backend and UI timing configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub properties_path: String,
    pub environment: Environment,
    pub debounce: Duration,
    /// No timeout unless explicitly configured
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            properties_path: DEFAULT_PROPERTIES_PATH.to_string(),
            environment: Environment::Production,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            request_timeout: None,
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, missing keys take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = non_empty(lookup("PROPERTY_API_BASE_URL")) {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(path) = non_empty(lookup("PROPERTY_API_PATH")) {
            config.properties_path = if path.starts_with('/') {
                path
            } else {
                format!("/{}", path)
            };
        }

        if let Some(env) = non_empty(lookup("APP_ENV")) {
            config.environment = match env.to_ascii_lowercase().as_str() {
                "production" | "prod" => Environment::Production,
                "development" | "dev" | "test" => Environment::Development,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "APP_ENV",
                        value: env,
                    })
                }
            };
        }

        if let Some(ms) = non_empty(lookup("FILTER_DEBOUNCE_MS")) {
            let parsed = ms.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "FILTER_DEBOUNCE_MS",
                value: ms.clone(),
            })?;
            config.debounce = Duration::from_millis(parsed);
        }

        if let Some(secs) = non_empty(lookup("HTTP_TIMEOUT_SECS")) {
            let parsed = secs
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: "HTTP_TIMEOUT_SECS",
                    value: secs.clone(),
                })?;
            config.request_timeout = Some(Duration::from_secs(parsed));
        }

        Ok(config)
    }

    pub fn properties_url(&self) -> String {
        format!("{}{}", self.base_url, self.properties_path)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
