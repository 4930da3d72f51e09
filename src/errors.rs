use std::fmt;
use std::fmt::Formatter;
use log4rs::config::runtime::ConfigErrors;
use log::SetLoggerError;
use crate::manager_db::errors::DBError;
use crate::manager_weather::errors::WeatherApiError;

/// Error representing an unrecoverable error that will halt the application
///
#[derive(Debug)]
pub struct UnrecoverableError(pub String);
impl fmt::Display for UnrecoverableError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "UnrecoverableError: {}", self.0)
    }
}
impl From<std::io::Error> for UnrecoverableError {
    fn from(e: std::io::Error) -> Self { UnrecoverableError(e.to_string()) }
}
impl From<ConfigError> for UnrecoverableError {
    fn from(e: ConfigError) -> Self {
        UnrecoverableError(e.to_string())
    }
}
impl From<DBError> for UnrecoverableError {
    fn from(e: DBError) -> Self { UnrecoverableError(e.to_string()) }
}
impl From<WeatherApiError> for UnrecoverableError {
    fn from(e: WeatherApiError) -> Self { UnrecoverableError(e.to_string()) }
}
impl From<DispatchError> for UnrecoverableError {
    fn from(e: DispatchError) -> Self { UnrecoverableError(e.to_string()) }
}

/// Errors while managing configuration
///
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}
impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self { ConfigError(e.to_string()) }
}
impl From<SetLoggerError> for ConfigError {
    fn from(e: SetLoggerError) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<ConfigErrors> for ConfigError {
    fn from(e: ConfigErrors) -> Self {
        ConfigError(e.to_string())
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError(e.to_string())
    }
}

/// Errors while dispatching an alert mail
///
#[derive(Debug)]
pub enum DispatchError {
    InvalidEmail(String),
    Send(String),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::InvalidEmail(e) => write!(f, "DispatchError::InvalidEmail: {}", e),
            DispatchError::Send(e) => write!(f, "DispatchError::Send: {}", e),
        }
    }
}
impl From<reqwest::Error> for DispatchError {
    fn from(e: reqwest::Error) -> Self { DispatchError::Send(e.to_string()) }
}
