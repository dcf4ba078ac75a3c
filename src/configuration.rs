use std::{path::Path, time::Duration};

use config::ConfigError;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub webdriver: WebDriverSettings,
    pub scraper: ScraperSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebDriverSettings {
    pub server_url: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScraperSettings {
    pub categories: Vec<String>,
    #[serde(default = "default_card_marker")]
    pub card_marker: String,
    #[serde(
        default = "default_readiness_timeout_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub readiness_timeout_secs: u64,
    #[serde(
        default = "default_poll_interval_millis",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub poll_interval_millis: u64,
    #[serde(
        default = "default_inter_category_pause_secs",
        deserialize_with = "deserialize_number_from_string"
    )]
    pub inter_category_pause_secs: u64,
}

fn default_headless() -> bool {
    true
}

fn default_card_marker() -> String {
    "ADD".to_string()
}

fn default_readiness_timeout_secs() -> u64 {
    5
}

fn default_poll_interval_millis() -> u64 {
    500
}

fn default_inter_category_pause_secs() -> u64 {
    3
}

impl ScraperSettings {
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_millis)
    }

    pub fn inter_category_pause(&self) -> Duration {
        Duration::from_secs(self.inter_category_pause_secs)
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.webdriver.server_url).map_err(|e| {
            ConfigError::Message(format!(
                "Invalid webdriver server url {}: {}",
                self.webdriver.server_url, e
            ))
        })?;

        for category in self.scraper.categories.iter() {
            let url = Url::parse(category).map_err(|e| {
                ConfigError::Message(format!("Invalid category url {}: {}", category, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(ConfigError::Message(format!(
                    "Category url {} is not http(s)",
                    category
                )));
            }
        }

        if self.scraper.card_marker.trim().is_empty() {
            return Err(ConfigError::Message("Card marker is empty".to_string()));
        }
        // XPath string literal is single-quoted
        if self.scraper.card_marker.contains('\'') {
            return Err(ConfigError::Message(
                "Card marker cannot contain a single quote".to_string(),
            ));
        }

        if self.scraper.poll_interval_millis == 0 {
            return Err(ConfigError::Message(
                "Poll interval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

/// Reads `configuration/base.yaml`, then the file for `APP_ENVIRONMENT`
/// (default `local`), then `APP_`-prefixed environment variables
/// such as `APP_WEBDRIVER__HEADLESS=false`.
pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to read current directory: {}", e)))?;

    get_configuration_from(&base_path.join("configuration"))
}

pub fn get_configuration_from(configuration_directory: &Path) -> Result<Settings, ConfigError> {
    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(
            config::File::from(configuration_directory.join(environment_filename))
                .required(false),
        )
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    let settings: Settings = settings.try_deserialize()?;
    settings.validate()?;

    Ok(settings)
}
