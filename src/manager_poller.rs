use std::collections::BTreeMap;
use std::sync::Arc;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinSet;
use crate::manager_db::DB;
use crate::manager_email::Emailer;
use crate::manager_summary;
use crate::manager_weather::errors::WeatherApiError;
use crate::manager_weather::models::CityWeather;
use crate::manager_weather::{WeatherApi, WeatherQuery};
use crate::unit_conversion::Units;
use crate::view::WeatherView;

pub const MIN_INTERVAL_MINUTES: u64 = 1;

/// Runtime poll settings, adjustable while the service is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollSettings {
    pub units: Units,
    pub interval_minutes: u64,
}

impl PollSettings {
    /// Returns settings with the interval clamped to the one minute floor
    pub fn new(units: Units, interval_minutes: u64) -> Self {
        PollSettings {
            units,
            interval_minutes: interval_minutes.max(MIN_INTERVAL_MINUTES),
        }
    }
}

/// Batch polling loop
///
/// Fetches all configured cities immediately on startup and then once per
/// interval. A change to the poll settings (unit system or interval) wakes
/// the loop for an immediate refetch. Every completed batch replaces the
/// shared view and runs threshold evaluation; when evaluation escalates, an
/// alert mail is dispatched.
///
/// # Arguments
///
/// * 'db' - persisted state store
/// * 'weather' - weather API manager
/// * 'emailer' - alert mail manager
/// * 'view' - shared display selection to replace after each batch
/// * 'cities' - city names to poll
/// * 'settings_rx' - receiver for runtime poll settings
pub async fn run_polling(
    db: Arc<Mutex<DB>>,
    weather: Arc<WeatherApi>,
    emailer: Arc<Emailer>,
    view: Arc<Mutex<WeatherView>>,
    cities: Vec<String>,
    mut settings_rx: watch::Receiver<PollSettings>,
) {
    loop {
        let settings = *settings_rx.borrow_and_update();
        let batch = fetch_batch(&weather, &cities, settings.units).await;

        if batch.is_empty() {
            warn!("no city could be fetched this round");
        } else {
            let mut map = BTreeMap::new();
            for record in &batch {
                map.insert(record.city.clone(), record.clone());
            }
            *view.lock().await = WeatherView::Multi(map);

            let outcome = {
                let db = db.lock().await;
                manager_summary::process_batch(&*db, &batch, settings.units)
            };

            match outcome {
                Ok(outcome) if outcome.notify => {
                    if let Err(e) = emailer.send(&outcome.email, &outcome.breaching).await {
                        warn!("failed to send alert mail: {}", e);
                    }
                }
                Ok(_) => {}
                Err(e) => error!("error while processing weather batch: {}", e),
            }
        }

        let interval = tokio::time::Duration::from_secs(settings.interval_minutes * 60);
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            changed = settings_rx.changed() => {
                if changed.is_err() {
                    return;
                }
                info!("poll settings changed, refetching immediately");
            }
        }
    }
}

/// Fetches all cities in parallel, skipping the ones that fail
async fn fetch_batch(weather: &Arc<WeatherApi>, cities: &[String], units: Units) -> Vec<CityWeather> {
    let mut set: JoinSet<Result<CityWeather, WeatherApiError>> = JoinSet::new();

    for city in cities.iter() {
        let api = Arc::clone(weather);
        let query = WeatherQuery::City(city.clone());
        set.spawn(async move { api.current(&query, units).await });
    }

    let mut batch: Vec<CityWeather> = Vec::new();
    for result in set.join_all().await {
        match result {
            Ok(record) => batch.push(record),
            Err(e) => error!("error while fetching city weather: {}", e),
        }
    }

    info!("fetched weather for {} of {} cities", batch.len(), cities.len());
    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_floor_is_one_minute() {
        let settings = PollSettings::new(Units::Metric, 0);
        assert_eq!(settings.interval_minutes, 1);
    }

    #[test]
    fn test_interval_above_floor_is_kept() {
        let settings = PollSettings::new(Units::Imperial, 5);
        assert_eq!(settings.interval_minutes, 5);
        assert_eq!(settings.units, Units::Imperial);
    }
}
