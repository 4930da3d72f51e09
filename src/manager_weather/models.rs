use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, TimestampSeconds};

const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

#[derive(Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Deserialize)]
pub struct Main {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
}

#[derive(Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

#[derive(Deserialize)]
pub struct Condition {
    pub main: String,
    pub icon: String,
}

#[derive(Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// Raw current weather document as returned by the provider
#[derive(Deserialize)]
pub struct CurrentResponse {
    pub coord: Coord,
    pub main: Main,
    pub sys: Sys,
    pub weather: Vec<Condition>,
    pub wind: Wind,
    pub timezone: i32,
    pub dt: i64,
    pub name: String,
}

/// Normalized current weather for one city, immutable once built
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityWeather {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: String,
    pub icon: String,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub observed: DateTime<Utc>,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub sunrise: DateTime<Utc>,
    #[serde_as(as = "TimestampSeconds<i64>")]
    pub sunset: DateTime<Utc>,
    pub utc_offset: i32,
}

impl From<CurrentResponse> for CityWeather {
    fn from(raw: CurrentResponse) -> Self {
        // The weather array can be empty for some stations
        let (condition, icon) = raw
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        CityWeather {
            city: raw.name,
            country: raw.sys.country,
            lat: raw.coord.lat,
            lon: raw.coord.lon,
            temp: raw.main.temp,
            feels_like: raw.main.feels_like,
            temp_min: raw.main.temp_min,
            temp_max: raw.main.temp_max,
            humidity: raw.main.humidity,
            wind_speed: raw.wind.speed,
            condition,
            icon,
            observed: DateTime::from_timestamp(raw.dt, 0).unwrap_or_default(),
            sunrise: DateTime::from_timestamp(raw.sys.sunrise, 0).unwrap_or_default(),
            sunset: DateTime::from_timestamp(raw.sys.sunset, 0).unwrap_or_default(),
            utc_offset: raw.timezone,
        }
    }
}

impl CityWeather {
    fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
    }

    /// Observation time shifted into the city's local timezone
    pub fn local_time(&self) -> DateTime<FixedOffset> {
        self.observed.with_timezone(&self.offset())
    }

    /// Provider URL for the condition icon
    pub fn icon_url(&self) -> String {
        format!("{}/{}@2x.png", ICON_BASE_URL, self.icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELHI_RESPONSE: &str = r#"{
        "coord": {"lon": 77.2167, "lat": 28.6667},
        "weather": [{"id": 721, "main": "Haze", "description": "haze", "icon": "50d"}],
        "main": {"temp": 38.05, "feels_like": 37.43, "temp_min": 38.05, "temp_max": 38.05, "pressure": 1002, "humidity": 20},
        "wind": {"speed": 3.09, "deg": 290},
        "dt": 1717851600,
        "sys": {"country": "IN", "sunrise": 1717805136, "sunset": 1717855474},
        "timezone": 19800,
        "name": "Delhi"
    }"#;

    #[test]
    fn test_raw_document_maps_to_city_weather() {
        let raw: CurrentResponse = serde_json::from_str(DELHI_RESPONSE).expect("document should parse");
        let record = CityWeather::from(raw);

        assert_eq!(record.city, "Delhi");
        assert_eq!(record.country, "IN");
        assert_eq!(record.condition, "Haze");
        assert_eq!(record.icon, "50d");
        assert_eq!(record.humidity, 20);
        assert_eq!(record.utc_offset, 19800);
        assert_eq!(record.observed.timestamp(), 1717851600);
        assert_eq!(record.sunrise.timestamp(), 1717805136);
    }

    #[test]
    fn test_empty_weather_array_falls_back_to_unknown() {
        let raw: CurrentResponse = serde_json::from_str(
            &DELHI_RESPONSE.replace(
                r#"[{"id": 721, "main": "Haze", "description": "haze", "icon": "50d"}]"#,
                "[]",
            ),
        )
        .expect("document should parse");
        let record = CityWeather::from(raw);

        assert_eq!(record.condition, "Unknown");
        assert!(record.icon.is_empty());
    }

    #[test]
    fn test_local_time_applies_utc_offset() {
        let raw: CurrentResponse = serde_json::from_str(DELHI_RESPONSE).expect("document should parse");
        let record = CityWeather::from(raw);

        // 19800 seconds is UTC+5:30
        let local = record.local_time();
        assert_eq!(local.offset().local_minus_utc(), 19800);
        assert_eq!(local.timestamp(), record.observed.timestamp());
    }

    #[test]
    fn test_icon_url_embeds_icon_code() {
        let raw: CurrentResponse = serde_json::from_str(DELHI_RESPONSE).expect("document should parse");
        let record = CityWeather::from(raw);
        assert_eq!(record.icon_url(), "https://openweathermap.org/img/wn/50d@2x.png");
    }

    #[test]
    fn test_city_weather_serializes_timestamps_as_epoch_seconds() {
        let raw: CurrentResponse = serde_json::from_str(DELHI_RESPONSE).expect("document should parse");
        let record = CityWeather::from(raw);

        let json = serde_json::to_string(&record).expect("record should serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json should parse");
        assert_eq!(value["observed"], serde_json::json!(1717851600));
        assert_eq!(value["sunset"], serde_json::json!(1717855474));
    }
}
