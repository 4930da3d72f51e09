pub mod errors;
pub mod models;

use std::time::Duration;
use reqwest::Client;
use crate::manager_weather::errors::WeatherApiError;
use crate::manager_weather::models::{CityWeather, CurrentResponse};
use crate::unit_conversion::Units;

/// A single city or coordinate lookup
#[derive(Debug, Clone)]
pub enum WeatherQuery {
    City(String),
    Coord { lat: f64, lon: f64 },
}

/// Struct for managing current weather lookups against the provider API
pub struct WeatherApi {
    client: Client,
    api_url: String,
    api_key: String,
}

impl WeatherApi {
    /// Returns a WeatherApi struct ready for fetching current weather
    ///
    /// # Arguments
    ///
    /// * 'api_url' - base url of the provider API
    /// * 'api_key' - API key to authenticate with
    pub fn new(api_url: &str, api_key: &str) -> Result<WeatherApi, WeatherApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Retrieves current weather for one city or coordinate pair and maps the
    /// raw provider document into a normalized record.
    ///
    /// # Arguments
    ///
    /// * 'query' - city name or lat/lon pair to look up
    /// * 'units' - unit system the provider should report temperatures in
    pub async fn current(&self, query: &WeatherQuery, units: Units) -> Result<CityWeather, WeatherApiError> {
        let url = format!("{}/weather", self.api_url);

        let req = match query {
            WeatherQuery::City(city) => self.client.get(url).query(&[("q", city.as_str())]),
            WeatherQuery::Coord { lat, lon } => self
                .client
                .get(url)
                .query(&[("lat", lat.to_string()), ("lon", lon.to_string())]),
        };

        let resp = req
            .query(&[("units", units.query_value()), ("appid", self.api_key.as_str())])
            .send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(WeatherApiError::Api(format!("Error while fetching current weather: {}", status)));
        }

        let json = resp.text().await?;
        let raw: CurrentResponse = serde_json::from_str(&json)?;

        Ok(CityWeather::from(raw))
    }
}
