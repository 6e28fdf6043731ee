use crate::constants;
use crate::error::{AppError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: BrowserConfig,
    pub sources: SourcesConfig,
    pub mars: MarsConfig,
    pub climate: ClimateConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserEngine {
    /// Headless Chromium driven over DevTools; runs page scripts.
    Chromium,
    /// Plain GET requests; server-rendered markup only.
    Http,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub engine: BrowserEngine,
    /// Chromium executable; looked up on PATH when unset
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    pub settle_delay_ms: u64,
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            engine: BrowserEngine::Chromium,
            chrome_path: None,
            headless: true,
            settle_delay_ms: constants::DEFAULT_SETTLE_DELAY_MS,
            navigation_timeout_ms: constants::DEFAULT_NAVIGATION_TIMEOUT_MS,
        }
    }
}

impl BrowserConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub news_url: String,
    pub jpl_url: String,
    pub jpl_base_url: String,
    pub facts_url: String,
    pub hemispheres_url: String,
    pub astrogeology_base_url: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            news_url: constants::NEWS_URL.to_string(),
            jpl_url: constants::JPL_URL.to_string(),
            jpl_base_url: constants::JPL_BASE_URL.to_string(),
            facts_url: constants::FACTS_URL.to_string(),
            hemispheres_url: constants::HEMISPHERES_URL.to_string(),
            astrogeology_base_url: constants::ASTROGEOLOGY_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarsConfig {
    pub db_path: PathBuf,
    pub port: u16,
}

impl Default for MarsConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(constants::DEFAULT_MARS_DB_PATH),
            port: constants::DEFAULT_MARS_PORT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    pub db_path: PathBuf,
    pub port: u16,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(constants::DEFAULT_CLIMATE_DB_PATH),
            port: constants::DEFAULT_CLIMATE_PORT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    Hourly,
    Daily,
    Never,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory for the JSON log file; no file layer when unset
    pub dir: Option<PathBuf>,
    pub file_prefix: String,
    pub rotation: LogRotation,
    /// `EnvFilter` directives used when `RUST_LOG` is not set
    pub filter: String,
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: Some(PathBuf::from(constants::DEFAULT_LOG_DIR)),
            file_prefix: constants::DEFAULT_LOG_FILE_PREFIX.to_string(),
            rotation: LogRotation::Daily,
            filter: constants::DEFAULT_LOG_FILTER.to_string(),
            console: true,
        }
    }
}

impl Config {
    /// Loads `config.toml` (or the given path) and applies environment overrides.
    ///
    /// A missing default file is not an error; an explicitly named one is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.unwrap_or_else(|| Path::new("config.toml"));
        let mut config = if config_path.exists() {
            let config_content = fs::read_to_string(config_path).map_err(|e| {
                AppError::Config(format!(
                    "Failed to read config file '{}': {}",
                    config_path.display(),
                    e
                ))
            })?;
            Self::from_toml(&config_content)?
        } else if path.is_some() {
            return Err(AppError::Config(format!(
                "Config file '{}' does not exist",
                config_path.display()
            )));
        } else {
            Config::default()
        };

        config.apply_env()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(v) = env::var("MARS_DB_PATH") {
            self.mars.db_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("CLIMATE_DB_PATH") {
            self.climate.db_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("LOG_DIR") {
            self.logging.dir = (!v.trim().is_empty()).then(|| PathBuf::from(v));
        }
        if let Ok(v) = env::var("CHROME_PATH") {
            self.browser.chrome_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("BROWSER_HEADLESS") {
            self.browser.headless = parse_bool(&v).ok_or_else(|| {
                AppError::Config(format!("BROWSER_HEADLESS must be true or false, got '{v}'"))
            })?;
        }
        if let Ok(v) = env::var("BROWSER_ENGINE") {
            self.browser.engine = match v.trim().to_lowercase().as_str() {
                "chromium" => BrowserEngine::Chromium,
                "http" => BrowserEngine::Http,
                other => {
                    return Err(AppError::Config(format!("Unknown BROWSER_ENGINE '{other}'")))
                }
            };
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.browser.engine, BrowserEngine::Chromium);
        assert!(config.browser.headless);
        assert_eq!(config.browser.settle_delay_ms, 5_000);
        assert_eq!(config.sources.news_url, constants::NEWS_URL);
        assert_eq!(config.climate.port, constants::DEFAULT_CLIMATE_PORT);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::from_toml(
            r#"
            [browser]
            engine = "http"
            settle_delay_ms = 0

            [climate]
            db_path = "/tmp/hawaii.sqlite"
            "#,
        )
        .unwrap();

        assert_eq!(config.browser.engine, BrowserEngine::Http);
        assert_eq!(config.browser.settle_delay(), Duration::ZERO);
        assert_eq!(config.browser.navigation_timeout_ms, 60_000);
        assert_eq!(config.climate.db_path, PathBuf::from("/tmp/hawaii.sqlite"));
        assert_eq!(config.climate.port, constants::DEFAULT_CLIMATE_PORT);
    }

    #[test]
    fn logging_defaults_and_overrides() {
        let defaults = Config::from_toml("").unwrap().logging;
        assert_eq!(defaults.dir, Some(PathBuf::from("logs")));
        assert_eq!(defaults.rotation, LogRotation::Daily);
        assert_eq!(defaults.filter, "mars_climate=debug,info");
        assert!(defaults.console);

        let config = Config::from_toml(
            r#"
            [logging]
            dir = "/var/log/mars"
            rotation = "never"
            filter = "warn"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.dir, Some(PathBuf::from("/var/log/mars")));
        assert_eq!(config.logging.rotation, LogRotation::Never);
        assert_eq!(config.logging.filter, "warn");
        assert_eq!(config.logging.file_prefix, "mars_climate.log");
    }

    #[test]
    fn unknown_engine_is_rejected() {
        assert!(Config::from_toml("[browser]\nengine = \"gecko\"").is_err());
    }

    #[test]
    fn parses_boolean_flags() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
