use std::fmt;

#[derive(Debug)]
pub enum WeatherApiError {
    Api(String),
    Document(String),
}

impl fmt::Display for WeatherApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            WeatherApiError::Api(e) => write!(f, "WeatherApiError::Api: {}", e),
            WeatherApiError::Document(e) => write!(f, "WeatherApiError::Document: {}", e),
        }
    }
}
impl From<reqwest::Error> for WeatherApiError {
    fn from(e: reqwest::Error) -> Self {
        WeatherApiError::Api(e.to_string())
    }
}
impl From<serde_json::Error> for WeatherApiError {
    fn from(e: serde_json::Error) -> Self {
        WeatherApiError::Document(e.to_string())
    }
}
