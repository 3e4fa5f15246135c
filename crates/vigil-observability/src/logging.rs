//! Structured logging

use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use vigil_core::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,

    /// Let sqlx log every statement
    #[serde(default)]
    pub log_sql_queries: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            log_sql_queries: false,
        }
    }
}

impl LoggingConfig {
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn with_sql_queries(mut self, enabled: bool) -> Self {
        self.log_sql_queries = enabled;
        self
    }

    /// Override settings from `VIGIL_LOG_LEVEL` and `VIGIL_LOG_JSON`.
    pub fn merge_env(&mut self) {
        if let Ok(level) = std::env::var("VIGIL_LOG_LEVEL") {
            self.level = level;
        }

        if let Ok(val) = std::env::var("VIGIL_LOG_JSON") {
            self.json = val.parse().unwrap_or(self.json);
        }
    }

    /// Unrecognized levels fall back to INFO.
    pub fn level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Build the filter for `config`.
///
/// sqlx is held at WARN unless SQL logging is enabled.
pub fn build_filter(config: &LoggingConfig) -> EnvFilter {
    let mut filter = EnvFilter::new(format!("{}", config.level()));

    if !config.log_sql_queries {
        match "sqlx=warn".parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => tracing::warn!("Failed to set sqlx log filter: {}", e),
        }
    }

    filter
}

/// Install the global subscriber.
///
/// # Errors
/// - `Error::Config` if a global subscriber is already installed
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(config);
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))
}
