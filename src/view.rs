use std::collections::BTreeMap;
use serde::Serialize;
use crate::manager_weather::models::CityWeather;

/// The currently displayed weather selection.
///
/// A batch poll replaces the view with one record per polled city, while an
/// on-demand query for a single city or coordinate replaces it with just that
/// record. Keeping the two shapes as explicit variants means consumers never
/// have to guess which city in an unkeyed collection is "the" record.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "lowercase")]
pub enum WeatherView {
    Single(CityWeather),
    Multi(BTreeMap<String, CityWeather>),
}

impl Default for WeatherView {
    fn default() -> Self {
        WeatherView::Multi(BTreeMap::new())
    }
}

impl WeatherView {
    /// Returns the records in the view, one per displayed city
    pub fn records(&self) -> Vec<CityWeather> {
        match self {
            WeatherView::Single(record) => vec![record.clone()],
            WeatherView::Multi(map) => map.values().cloned().collect(),
        }
    }
}
