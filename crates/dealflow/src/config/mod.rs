use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for a pipeline run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
    pub load: LoadConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_rows = env::var("APP_MAX_ROWS")
            .unwrap_or_else(|_| LoadConfig::DEFAULT_MAX_ROWS.to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidMaxRows)?;

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
            load: LoadConfig { max_rows },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Bounds applied while reading an input table.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Maximum number of data rows read from an input file; 0 means uncapped.
    pub max_rows: usize,
}

impl LoadConfig {
    pub const DEFAULT_MAX_ROWS: usize = 5_000;

    pub fn uncapped() -> Self {
        Self { max_rows: 0 }
    }

    pub(crate) fn row_budget(&self) -> usize {
        if self.max_rows == 0 {
            usize::MAX
        } else {
            self.max_rows
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_rows: Self::DEFAULT_MAX_ROWS,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidMaxRows,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidMaxRows => {
                write!(f, "APP_MAX_ROWS must be a non-negative integer")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("APP_MAX_ROWS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.load.max_rows, LoadConfig::DEFAULT_MAX_ROWS);
    }

    #[test]
    fn load_rejects_non_numeric_row_cap() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MAX_ROWS", "plenty");
        let error = AppConfig::load().expect_err("invalid cap rejected");
        assert!(matches!(error, ConfigError::InvalidMaxRows));
        reset_env();
    }

    #[test]
    fn zero_row_cap_means_uncapped() {
        let config = LoadConfig { max_rows: 0 };
        assert_eq!(config.row_budget(), usize::MAX);
        assert_eq!(LoadConfig::default().row_budget(), 5_000);
    }

    #[test]
    fn environment_recognizes_aliases() {
        assert_eq!(AppEnvironment::from_str("PROD"), AppEnvironment::Production);
        assert_eq!(AppEnvironment::from_str("ci"), AppEnvironment::Test);
        assert_eq!(
            AppEnvironment::from_str("anything-else"),
            AppEnvironment::Development
        );
    }
}
