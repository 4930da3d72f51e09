use serde::Deserialize;
use crate::errors::ConfigError;
use crate::logging::setup_logging;

const CONFIG_ENV: &str = "WEATHERWATCH_CONFIG";
const CONFIG_FILE: &str = "weatherwatch.toml";

#[derive(Deserialize)]
pub struct Config {
    pub web_server: WebServerConfig,
    pub db: DbConfig,
    pub weather_api: WeatherApiConfig,
    pub email_api: EmailApiConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    pub log: LogConfig,
}

#[derive(Deserialize)]
pub struct WebServerConfig {
    pub bind_address: String,
    pub bind_port: u16,
}

#[derive(Deserialize)]
pub struct DbConfig {
    pub db_path: String,
}

#[derive(Deserialize)]
pub struct WeatherApiConfig {
    #[serde(default = "default_weather_api_url")]
    pub api_url: String,
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct EmailApiConfig {
    #[serde(default = "default_email_api_url")]
    pub api_url: String,
    pub service_id: String,
    pub template_id: String,
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        PollerConfig {
            cities: default_cities(),
            interval_minutes: default_interval_minutes(),
        }
    }
}

#[derive(Deserialize)]
pub struct LogConfig {
    pub log_path: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_weather_api_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_email_api_url() -> String {
    "https://api.emailjs.com/api/v1.0/email/send".to_string()
}

fn default_cities() -> Vec<String> {
    ["Delhi", "Mumbai", "Chennai", "Bangalore", "Kolkata", "Hyderabad"]
        .iter()
        .map(|c| c.to_string())
        .collect()
}

fn default_interval_minutes() -> u64 { 5 }

fn default_log_level() -> String { "info".to_string() }

/// Loads the application configuration and sets up logging
///
/// The config file path is taken from the WEATHERWATCH_CONFIG environment
/// variable, falling back to weatherwatch.toml in the working directory.
pub fn config() -> Result<Config, ConfigError> {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| CONFIG_FILE.to_string());
    let raw = std::fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&raw)?;

    setup_logging(&config.log.log_path, &config.log.log_level)?;

    Ok(config)
}
